//! Project path functions - single source of truth for file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! This allows keeping several isolated stores side by side:
//! ```bash
//! DATA_DIR=data/alice srs stats
//! DATA_DIR=data/scratch srs ingest cards.json
//! ```

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
  DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// Default SQLite store path
pub fn db_path() -> String {
  format!("{}/srs.db", data_dir())
}

/// Default config file, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";
