//! Archive writers.
//!
//! `FsArchiveWriter` replaces the destination atomically: the body goes to a
//! `.part` sibling first and is renamed into place only after the write and
//! flush succeed. A failed write never leaves a truncated archive behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::types::{SldError, SldResult};

/// Suffix for in-flight files.
const PART_SUFFIX: &str = ".part";

/// Persists a fetched archive body.
#[async_trait]
pub trait ArchiveWriter: Send + Sync {
    /// Write `body` verbatim to `path`, replacing any existing file.
    async fn write(&self, path: &Path, body: Vec<u8>) -> SldResult<()>;

    /// Whether a finished archive already exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Filesystem writer. Does not create the output directory unless asked.
#[derive(Debug, Clone, Default)]
pub struct FsArchiveWriter {
    create_dirs: bool,
}

impl FsArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create missing parent directories before writing.
    pub fn create_dirs(mut self, yes: bool) -> Self {
        self.create_dirs = yes;
        self
    }

    /// Blocking form of [`ArchiveWriter::write`].
    pub fn write_blocking(&self, path: &Path, body: &[u8]) -> SldResult<()> {
        if self.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| SldError::io(parent, e))?;
            }
        }
        replace_file(path, |file| {
            file.write_all(body).map_err(|e| SldError::io(path, e))
        })
    }
}

#[async_trait]
impl ArchiveWriter for FsArchiveWriter {
    async fn write(&self, path: &Path, body: Vec<u8>) -> SldResult<()> {
        let writer = self.clone();
        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || writer.write_blocking(&target, &body))
            .await
            .map_err(|e| SldError::io(path, io::Error::other(e)))?
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// `<path>.part`, the in-flight sibling of `path`.
pub(crate) fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Fill a `.part` sibling through `fill`, sync it, and rename it over `path`.
/// On any failure the `.part` file is removed and `path` is left as it was.
pub(crate) fn replace_file<T, F>(path: &Path, fill: F) -> SldResult<T>
where
    F: FnOnce(&mut fs::File) -> SldResult<T>,
{
    let part = part_path(path);
    let result = write_and_sync(&part, fill).and_then(|out| {
        fs::rename(&part, path).map_err(|e| SldError::io(path, e))?;
        Ok(out)
    });

    if result.is_err() {
        // Best effort; the write error is what gets reported.
        let _ = fs::remove_file(&part);
    }
    result
}

fn write_and_sync<T, F>(path: &Path, fill: F) -> SldResult<T>
where
    F: FnOnce(&mut fs::File) -> SldResult<T>,
{
    let mut file = fs::File::create(path).map_err(|e| SldError::io(path, e))?;
    let out = fill(&mut file)?;
    file.sync_all().map_err(|e| SldError::io(path, e))?;
    Ok(out)
}
