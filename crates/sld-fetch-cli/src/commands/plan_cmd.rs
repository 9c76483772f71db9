//! `sld-fetch plan` — show what a fetch would do without touching the network.

use anyhow::Result;

use sld_fetch::{Chamber, DownloadTask, Jurisdiction, SourceTemplate};

use crate::output::print_json;

pub fn run(
    source: &SourceTemplate,
    jurisdictions: &[Jurisdiction],
    chambers: &[Chamber],
    json: bool,
) -> Result<Vec<DownloadTask>> {
    let tasks = source.plan(jurisdictions, chambers);

    if json {
        print_json(&tasks)?;
    } else {
        for task in &tasks {
            println!("{} -> {}", task.url, task.destination.display());
        }
        println!("{} task(s)", tasks.len());
    }

    Ok(tasks)
}
