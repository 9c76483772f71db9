//! Subcommand implementations for the `sld-fetch` binary.

pub mod annotate_cmd;
pub mod fetch_cmd;
pub mod jurisdictions_cmd;
pub mod plan_cmd;

use sld_fetch::Chamber;

/// Requested chambers in enumeration order; empty means both.
pub fn selected_chambers(requested: &[Chamber]) -> Vec<Chamber> {
    if requested.is_empty() {
        return Chamber::ALL.to_vec();
    }
    Chamber::ALL
        .into_iter()
        .filter(|c| requested.contains(c))
        .collect()
}
