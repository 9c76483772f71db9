//! `sld-fetch fetch` — download the archives.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use sld_fetch::jurisdictions;
use sld_fetch::{
    progress_line, Chamber, FailurePolicy, FetchEnumerator, FetchReport, FsArchiveWriter,
    HttpFetcher, SourceTemplate, TaskResult,
};

use super::selected_chambers;
use crate::output::print_json;

/// Resolved settings for one fetch run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub output_dir: PathBuf,
    pub base_url: String,
    /// Names, abbreviations, or FIPS codes; empty means all.
    pub states: Vec<String>,
    /// Empty means both.
    pub chambers: Vec<Chamber>,
    pub fail_fast: bool,
    pub skip_existing: bool,
    pub create_dir: bool,
    pub timeout: Option<Duration>,
}

/// Run the download. The report is returned so the caller can pick the exit
/// code; only setup problems are errors.
pub async fn run(opts: &FetchOptions, json: bool) -> Result<FetchReport> {
    let selected = jurisdictions::select(&opts.states)?;
    let chambers = selected_chambers(&opts.chambers);
    let source = SourceTemplate::new(&opts.base_url, &opts.output_dir)?;

    if !opts.create_dir && !opts.output_dir.is_dir() {
        tracing::warn!(
            dir = %opts.output_dir.display(),
            "output directory does not exist; pass --create-dir to create it"
        );
    }

    let policy = if opts.fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Continue
    };

    let fetcher = HttpFetcher::new(opts.timeout)?;
    let writer = FsArchiveWriter::new().create_dirs(opts.create_dir);
    let mut enumerator = FetchEnumerator::new(source, fetcher, writer)
        .policy(policy)
        .skip_existing(opts.skip_existing);
    if json {
        // Keep stdout a single JSON document.
        enumerator = enumerator.on_jurisdiction(|j| tracing::info!("{}", progress_line(j)));
    }

    tracing::info!(
        jurisdictions = selected.len(),
        tasks = selected.len() * chambers.len(),
        base_url = %enumerator.source().base_url(),
        output = %enumerator.source().output_dir().display(),
        "starting fetch"
    );

    let report = enumerator.run(&selected, &chambers).await;

    if json {
        print_json(&report)?;
    } else {
        println!("{}", report.summary());
        for failure in report.failures() {
            if let TaskResult::Failed { reason } = &failure.result {
                let label = if failure.is_expected_miss() {
                    "not published"
                } else {
                    "failed"
                };
                eprintln!("  {label}: {} ({reason})", failure.task.destination.display());
            }
        }
        if report.aborted {
            eprintln!("  aborted after first failure (--fail-fast)");
        }
    }

    Ok(report)
}
