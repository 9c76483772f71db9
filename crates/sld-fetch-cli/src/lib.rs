//! sld-fetch command-line front end.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{resolve_base_url, resolve_output_dir, resolve_timeout};
