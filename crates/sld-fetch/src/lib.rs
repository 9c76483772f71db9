//! sld-fetch — enumerate, download, and annotate TIGER/Line 2018 state
//! legislative district archives.

pub mod annotate;
pub mod enumerator;
pub mod fetch;
pub mod jurisdictions;
pub mod source;
pub mod storage;
pub mod types;

pub use annotate::{annotate, annotate_file, AnnotateStats, OcdIdIndex};
pub use enumerator::{fetch_all, progress_line, FailurePolicy, FetchEnumerator};
pub use fetch::{Fetcher, HttpFetcher};
pub use jurisdictions::{JURISDICTIONS, JURISDICTION_COUNT};
pub use source::{SourceTemplate, DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR, TIGER_YEAR};
pub use storage::{ArchiveWriter, FsArchiveWriter};
pub use types::*;
