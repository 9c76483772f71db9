//! URL and destination path derivation for TIGER/Line SLD archives.
//!
//! The Census host serves paths case-sensitively: the directory segment uses
//! the uppercase chamber code (`SLDL`), the file name the lowercase one
//! (`sldl`).

use std::path::{Path, PathBuf};

use crate::types::{Chamber, DownloadTask, Jurisdiction, SldError, SldResult};

/// Default archive host.
pub const DEFAULT_BASE_URL: &str = "https://www2.census.gov";

/// Default local output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// TIGER/Line vintage.
pub const TIGER_YEAR: u16 = 2018;

/// Where archives come from and where they land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTemplate {
    base_url: String,
    output_dir: PathBuf,
}

impl Default for SourceTemplate {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl SourceTemplate {
    /// Create a template rooted at `base_url`, writing into `output_dir`.
    ///
    /// The base URL must be an absolute http(s) URL; a trailing slash is
    /// ignored.
    pub fn new(base_url: &str, output_dir: impl Into<PathBuf>) -> SldResult<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| SldError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SldError::InvalidBaseUrl(format!(
                "{base_url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(SldError::InvalidBaseUrl(format!("{base_url}: missing host")));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            output_dir: output_dir.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Archive file name, e.g. `tl_2018_06_sldl.zip`.
    pub fn file_name(fips: &str, chamber: Chamber) -> String {
        format!("tl_{TIGER_YEAR}_{fips}_sld{}.zip", chamber.code())
    }

    /// Source URL for one archive.
    pub fn url(&self, fips: &str, chamber: Chamber) -> String {
        format!(
            "{}/geo/tiger/TIGER{TIGER_YEAR}/SLD{}/{}",
            self.base_url,
            chamber.upper_code(),
            Self::file_name(fips, chamber)
        )
    }

    /// Local destination for one archive.
    pub fn destination(&self, fips: &str, chamber: Chamber) -> PathBuf {
        self.output_dir.join(Self::file_name(fips, chamber))
    }

    /// Derive the task for one pair.
    pub fn task(&self, jurisdiction: &Jurisdiction, chamber: Chamber) -> DownloadTask {
        DownloadTask {
            jurisdiction: *jurisdiction,
            chamber,
            url: self.url(jurisdiction.fips, chamber),
            destination: self.destination(jurisdiction.fips, chamber),
        }
    }

    /// All tasks, jurisdictions outer and chambers inner.
    pub fn plan(&self, jurisdictions: &[Jurisdiction], chambers: &[Chamber]) -> Vec<DownloadTask> {
        jurisdictions
            .iter()
            .flat_map(|j| chambers.iter().map(move |&c| self.task(j, c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdictions::JURISDICTIONS;
    use std::collections::HashSet;

    #[test]
    fn test_california_lower() {
        let src = SourceTemplate::default();
        assert_eq!(
            src.url("06", Chamber::Lower),
            "https://www2.census.gov/geo/tiger/TIGER2018/SLDL/tl_2018_06_sldl.zip"
        );
        assert_eq!(
            src.destination("06", Chamber::Lower),
            PathBuf::from("./data/tl_2018_06_sldl.zip")
        );
        assert_eq!(
            src.destination("06", Chamber::Lower).display().to_string(),
            "./data/tl_2018_06_sldl.zip"
        );
    }

    #[test]
    fn test_upper_uses_sldu() {
        let src = SourceTemplate::default();
        assert_eq!(
            src.url("72", Chamber::Upper),
            "https://www2.census.gov/geo/tiger/TIGER2018/SLDU/tl_2018_72_sldu.zip"
        );
    }

    #[test]
    fn test_full_plan_shape() {
        let src = SourceTemplate::default();
        let tasks = src.plan(&JURISDICTIONS, &Chamber::ALL);
        assert_eq!(tasks.len(), 104);

        for pair in tasks.chunks(2) {
            assert_eq!(pair[0].jurisdiction, pair[1].jurisdiction);
            assert_eq!(pair[0].chamber, Chamber::Lower);
            assert_eq!(pair[1].chamber, Chamber::Upper);
        }

        for t in &tasks {
            let fips = t.jurisdiction.fips;
            let (upper, lower) = match t.chamber {
                Chamber::Lower => ("L", "l"),
                Chamber::Upper => ("U", "u"),
            };
            assert_eq!(
                t.url,
                format!("https://www2.census.gov/geo/tiger/TIGER2018/SLD{upper}/tl_2018_{fips}_sld{lower}.zip")
            );
            assert_eq!(
                t.destination,
                PathBuf::from(format!("./data/tl_2018_{fips}_sld{lower}.zip"))
            );
        }

        let unique: HashSet<_> = tasks.iter().map(|t| t.destination.clone()).collect();
        assert_eq!(unique.len(), 104);
    }

    #[test]
    fn test_custom_base_trims_slash() {
        let src = SourceTemplate::new("http://127.0.0.1:8080/", "/tmp/out").unwrap();
        assert_eq!(src.base_url(), "http://127.0.0.1:8080");
        assert_eq!(src.output_dir(), Path::new("/tmp/out"));
        assert_eq!(
            src.url("01", Chamber::Upper),
            "http://127.0.0.1:8080/geo/tiger/TIGER2018/SLDU/tl_2018_01_sldu.zip"
        );
        assert_eq!(
            src.destination("01", Chamber::Upper),
            PathBuf::from("/tmp/out/tl_2018_01_sldu.zip")
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(matches!(
            SourceTemplate::new("not a url", "data"),
            Err(SldError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            SourceTemplate::new("ftp://www2.census.gov", "data"),
            Err(SldError::InvalidBaseUrl(_))
        ));
    }
}
