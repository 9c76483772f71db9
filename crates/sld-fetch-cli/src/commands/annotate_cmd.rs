//! `sld-fetch annotate` — attach OCD-IDs to the combined SLD GeoJSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sld_fetch::{annotate_file, AnnotateStats, OcdIdIndex};

use crate::output::print_json;

pub const DEFAULT_GEOJSON: &str = "sld.geojson";
pub const DEFAULT_SLDU_CSV: &str = "sldu-ocdid.csv";
pub const DEFAULT_SLDL_CSV: &str = "sldl-ocdid.csv";
pub const DEFAULT_OUTPUT: &str = "sld-with-ocdid.geojson";

/// Input and output locations for one annotation pass.
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    pub geojson: PathBuf,
    pub sldu_csv: PathBuf,
    pub sldl_csv: PathBuf,
    pub output: PathBuf,
}

impl AnnotateOptions {
    /// Fill unset paths with the conventional file names under `data_dir`.
    pub fn resolve(
        data_dir: &Path,
        geojson: Option<PathBuf>,
        sldu_csv: Option<PathBuf>,
        sldl_csv: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Self {
        Self {
            geojson: geojson.unwrap_or_else(|| data_dir.join(DEFAULT_GEOJSON)),
            sldu_csv: sldu_csv.unwrap_or_else(|| data_dir.join(DEFAULT_SLDU_CSV)),
            sldl_csv: sldl_csv.unwrap_or_else(|| data_dir.join(DEFAULT_SLDL_CSV)),
            output: output.unwrap_or_else(|| data_dir.join(DEFAULT_OUTPUT)),
        }
    }
}

pub fn run(opts: &AnnotateOptions, json: bool) -> Result<AnnotateStats> {
    let index = OcdIdIndex::from_paths(&opts.sldu_csv, &opts.sldl_csv)
        .context("loading OCD-ID lookup tables")?;
    tracing::info!(entries = index.len(), "loaded OCD-ID lookup");

    let stats = annotate_file(&opts.geojson, &index, &opts.output)
        .with_context(|| format!("annotating {}", opts.geojson.display()))?;

    if json {
        print_json(&stats)?;
    } else {
        println!(
            "Annotated {} feature(s), {} with an OCD-ID -> {}",
            stats.features,
            stats.matched,
            opts.output.display()
        );
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_under_data_dir() {
        let opts = AnnotateOptions::resolve(Path::new("./data"), None, None, None, None);
        assert_eq!(opts.geojson, PathBuf::from("./data/sld.geojson"));
        assert_eq!(opts.sldu_csv, PathBuf::from("./data/sldu-ocdid.csv"));
        assert_eq!(opts.sldl_csv, PathBuf::from("./data/sldl-ocdid.csv"));
        assert_eq!(opts.output, PathBuf::from("./data/sld-with-ocdid.geojson"));
    }

    #[test]
    fn test_resolve_explicit_paths() {
        let opts = AnnotateOptions::resolve(
            Path::new("./data"),
            Some(PathBuf::from("/in.geojson")),
            None,
            None,
            Some(PathBuf::from("/out.geojson")),
        );
        assert_eq!(opts.geojson, PathBuf::from("/in.geojson"));
        assert_eq!(opts.output, PathBuf::from("/out.geojson"));
    }
}
