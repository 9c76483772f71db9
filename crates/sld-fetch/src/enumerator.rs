//! The fetch enumerator: walks every (jurisdiction, chamber) pair in order,
//! fetches the archive, and hands the body to the writer.
//!
//! Tasks run strictly one after another. Under `FailurePolicy::Abort` the
//! first failure ends the run and nothing after it is attempted; under
//! `FailurePolicy::Continue` each failure is recorded and the walk goes on.

use std::path::PathBuf;

use crate::fetch::{Fetcher, HttpFetcher};
use crate::source::SourceTemplate;
use crate::storage::{ArchiveWriter, FsArchiveWriter};
use crate::types::{
    Chamber, DownloadTask, FetchReport, Jurisdiction, SldResult, TaskOutcome, TaskResult,
};

/// What to do when a task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    Abort,
    /// Record the failure and keep going.
    #[default]
    Continue,
}

type ProgressHook = Box<dyn FnMut(&Jurisdiction) + Send + Sync>;

/// The line announced before a jurisdiction's fetches begin.
pub fn progress_line(jurisdiction: &Jurisdiction) -> String {
    format!("Fetching shapefiles for {}", jurisdiction.name)
}

/// Sequential download driver over injectable fetch and write collaborators.
pub struct FetchEnumerator<F, W> {
    source: SourceTemplate,
    fetcher: F,
    writer: W,
    policy: FailurePolicy,
    skip_existing: bool,
    progress: ProgressHook,
}

impl<F: Fetcher, W: ArchiveWriter> FetchEnumerator<F, W> {
    /// Create an enumerator that announces progress on stdout.
    pub fn new(source: SourceTemplate, fetcher: F, writer: W) -> Self {
        Self {
            source,
            fetcher,
            writer,
            policy: FailurePolicy::default(),
            skip_existing: false,
            progress: Box::new(|j: &Jurisdiction| println!("{}", progress_line(j))),
        }
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Leave destinations that already exist untouched.
    pub fn skip_existing(mut self, yes: bool) -> Self {
        self.skip_existing = yes;
        self
    }

    /// Replace the progress announcement.
    pub fn on_jurisdiction(
        mut self,
        hook: impl FnMut(&Jurisdiction) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Box::new(hook);
        self
    }

    pub fn source(&self) -> &SourceTemplate {
        &self.source
    }

    /// Run every task for `jurisdictions` × `chambers`.
    pub async fn run(
        &mut self,
        jurisdictions: &[Jurisdiction],
        chambers: &[Chamber],
    ) -> FetchReport {
        let mut report = FetchReport::default();

        'outer: for jurisdiction in jurisdictions {
            (self.progress)(jurisdiction);

            for &chamber in chambers {
                let task = self.source.task(jurisdiction, chamber);
                let result = match self.execute(&task).await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::warn!(url = %task.url, error = %e, "fetch failed");
                        TaskResult::Failed {
                            reason: e.to_string(),
                        }
                    }
                };

                let failed = matches!(result, TaskResult::Failed { .. });
                report.outcomes.push(TaskOutcome { task, result });

                if failed && self.policy == FailurePolicy::Abort {
                    report.aborted = true;
                    break 'outer;
                }
            }
        }

        report
    }

    async fn execute(&self, task: &DownloadTask) -> SldResult<TaskResult> {
        if self.skip_existing && self.writer.exists(&task.destination) {
            tracing::info!(path = %task.destination.display(), "already present, skipping");
            return Ok(TaskResult::Skipped);
        }

        let body = self.fetcher.fetch(&task.url).await?;
        let bytes = body.len() as u64;
        self.writer.write(&task.destination, body).await?;

        tracing::info!(path = %task.destination.display(), bytes, "archive written");
        Ok(TaskResult::Written { bytes })
    }
}

/// Fetch both chambers for `jurisdictions` from the archive host at
/// `base_url` (normally [`DEFAULT_BASE_URL`](crate::source::DEFAULT_BASE_URL))
/// into `output_dir`, continuing past failures. Progress goes to stdout.
pub async fn fetch_all(
    base_url: &str,
    jurisdictions: &[Jurisdiction],
    output_dir: impl Into<PathBuf>,
) -> SldResult<FetchReport> {
    let source = SourceTemplate::new(base_url, output_dir)?;
    let fetcher = HttpFetcher::new(None)?;
    let mut enumerator = FetchEnumerator::new(source, fetcher, FsArchiveWriter::new());
    Ok(enumerator.run(jurisdictions, &Chamber::ALL).await)
}
