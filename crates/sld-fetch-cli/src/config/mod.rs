//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit flag, then environment variable,
//! then built-in default.

use std::path::PathBuf;
use std::time::Duration;

use sld_fetch::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR};

/// Output directory override.
pub const DATA_DIR_ENV: &str = "SLD_FETCH_DATA_DIR";
/// Archive host override.
pub const BASE_URL_ENV: &str = "SLD_FETCH_BASE_URL";
/// Request timeout override, in seconds.
pub const TIMEOUT_ENV: &str = "SLD_FETCH_TIMEOUT_SECS";

/// Resolve the directory archives are written to (and annotation inputs
/// are read from).
pub fn resolve_output_dir(explicit: Option<&str>) -> PathBuf {
    resolve_with(explicit, std::env::var(DATA_DIR_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

/// Resolve the archive host.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    resolve_with(explicit, std::env::var(BASE_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Resolve the per-request timeout. No timeout unless one is configured.
pub fn resolve_timeout(explicit: Option<u64>) -> anyhow::Result<Option<Duration>> {
    if let Some(secs) = explicit {
        return Ok(Some(Duration::from_secs(secs)));
    }

    match std::env::var(TIMEOUT_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("{TIMEOUT_ENV}={raw:?} is not a number of seconds: {e}"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        _ => Ok(None),
    }
}

fn resolve_with(explicit: Option<&str>, env: Option<String>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| env.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        assert_eq!(
            resolve_with(Some("/flag"), Some("/env".to_string())),
            Some("/flag".to_string())
        );
    }

    #[test]
    fn test_env_fallback() {
        assert_eq!(
            resolve_with(None, Some("/env".to_string())),
            Some("/env".to_string())
        );
    }

    #[test]
    fn test_blank_env_ignored() {
        assert_eq!(resolve_with(None, Some("  ".to_string())), None);
        assert_eq!(resolve_with(None, None), None);
    }

    #[test]
    fn test_explicit_output_dir() {
        assert_eq!(resolve_output_dir(Some("out")), PathBuf::from("out"));
    }

    #[test]
    fn test_explicit_timeout() {
        assert_eq!(
            resolve_timeout(Some(30)).unwrap(),
            Some(Duration::from_secs(30))
        );
    }
}
