//! Core data types for jurisdictions, chambers, download tasks, and run reports.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

/// A state or territory with the identifiers used to build archive names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Jurisdiction {
    pub name: &'static str,
    /// USPS postal abbreviation, uppercase.
    pub abbr: &'static str,
    /// Two-digit, zero-padded FIPS code.
    pub fips: &'static str,
}

/// A legislative chamber. Each has its own SLD dataset on the TIGER host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chamber {
    Lower,
    Upper,
}

impl Chamber {
    /// Both chambers, in enumeration order.
    pub const ALL: [Chamber; 2] = [Chamber::Lower, Chamber::Upper];

    /// Lowercase code used in archive file names (`sldl`, `sldu`).
    pub fn code(self) -> char {
        match self {
            Chamber::Lower => 'l',
            Chamber::Upper => 'u',
        }
    }

    /// Uppercase code used in the URL directory segment (`SLDL`, `SLDU`).
    pub fn upper_code(self) -> char {
        self.code().to_ascii_uppercase()
    }

    /// Census feature class code for districts of this chamber.
    pub fn mtfcc(self) -> &'static str {
        match self {
            Chamber::Lower => "G5220",
            Chamber::Upper => "G5210",
        }
    }

    /// Short dataset label, `sldl` or `sldu`.
    pub fn label(self) -> &'static str {
        match self {
            Chamber::Lower => "sldl",
            Chamber::Upper => "sldu",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chamber::Lower => f.write_str("lower"),
            Chamber::Upper => f.write_str("upper"),
        }
    }
}

impl FromStr for Chamber {
    type Err = SldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lower" | "l" | "sldl" => Ok(Chamber::Lower),
            "upper" | "u" | "sldu" => Ok(Chamber::Upper),
            _ => Err(SldError::InvalidChamber(s.to_string())),
        }
    }
}

/// One (jurisdiction, chamber) pair with its derived source and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadTask {
    pub jurisdiction: Jurisdiction,
    pub chamber: Chamber,
    pub url: String,
    pub destination: PathBuf,
}

/// What happened to a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskResult {
    Written { bytes: u64 },
    Skipped,
    Failed { reason: String },
}

/// A task paired with its result.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub task: DownloadTask,
    #[serde(flatten)]
    pub result: TaskResult,
}

impl TaskOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.result, TaskResult::Failed { .. })
    }

    /// A failure for a pair the host never publishes, such as Nebraska's
    /// lower chamber.
    pub fn is_expected_miss(&self) -> bool {
        self.is_failure()
            && !crate::jurisdictions::has_archive(&self.task.jurisdiction, self.task.chamber)
    }
}

/// Ordered outcomes of one enumeration run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchReport {
    pub outcomes: Vec<TaskOutcome>,
    /// True when the run stopped early on a failure.
    pub aborted: bool,
}

impl FetchReport {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, TaskResult::Written { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, TaskResult::Skipped))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Failed outcomes, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Failures for archives the host does not publish. Still counted as
    /// failures.
    pub fn expected_misses(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| o.is_expected_miss())
    }

    pub fn is_success(&self) -> bool {
        !self.aborted && self.failed() == 0
    }

    /// One-line human summary of the run.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Fetched {} archive(s), skipped {}, failed {}",
            self.written(),
            self.skipped(),
            self.failed()
        );
        let expected = self.expected_misses().count();
        if expected > 0 {
            line.push_str(&format!(
                " ({expected} expected: not published for unicameral legislatures)"
            ));
        }
        line
    }
}

/// Errors that can occur while planning, fetching, writing, or annotating.
#[derive(thiserror::Error, Debug)]
pub enum SldError {
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Unknown jurisdiction: {0}")]
    UnknownJurisdiction(String),

    #[error("Invalid chamber: {0} (expected lower or upper)")]
    InvalidChamber(String),

    #[error("Unknown FIPS code: {0}")]
    UnknownFips(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV is missing required column: {0}")]
    MissingColumn(String),

    #[error("Malformed GeoJSON: {0}")]
    GeoJson(String),
}

impl SldError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        SldError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Convenience result type.
pub type SldResult<T> = Result<T, SldError>;
