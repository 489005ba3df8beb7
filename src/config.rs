//! Engine configuration.
//!
//! Values come from `config.toml` when present, then from the environment,
//! then from the defaults below. Binaries call [`load_env_file`] before
//! anything reads the environment.

use chrono::{Duration, FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::paths;
use crate::srs::SchedulerParams;

// ==================== Defaults ====================

/// Maximum number of review events kept per user
pub const REVIEW_LOG_CAP: usize = 500;

/// Delay before a card answered "again" is due, in minutes
pub const RELEARN_DELAY_MINUTES: i64 = crate::srs::scheduler::RELEARN_DELAY_MINUTES;

/// Offset from UTC used to decide calendar days for streaks (0 = UTC)
pub const DAY_OFFSET_MINUTES: i32 = 0;

/// Largest accepted day offset (18 hours either way)
const MAX_DAY_OFFSET_MINUTES: i32 = 18 * 60;

/// Failed cards must come back within the same day
const MAX_RELEARN_DELAY_MINUTES: i64 = 24 * 60;

// ==================== File Format ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
  database: Option<DatabaseConfig>,
  engine: Option<EngineSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
  path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EngineSection {
  review_log_cap: Option<usize>,
  relearn_delay_minutes: Option<i64>,
  day_offset_minutes: Option<i32>,
}

// ==================== Engine Configuration ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  pub review_log_cap: usize,
  pub relearn_delay_minutes: i64,
  pub day_offset_minutes: i32,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      review_log_cap: REVIEW_LOG_CAP,
      relearn_delay_minutes: RELEARN_DELAY_MINUTES,
      day_offset_minutes: DAY_OFFSET_MINUTES,
    }
  }
}

impl EngineConfig {
  /// Parse the `[engine]` table of a TOML document; missing keys keep defaults
  pub fn from_toml_str(contents: &str) -> Result<Self> {
    let file: AppConfig =
      toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))?;
    let section = file.engine.unwrap_or_default();
    let defaults = Self::default();

    let config = Self {
      review_log_cap: section.review_log_cap.unwrap_or(defaults.review_log_cap),
      relearn_delay_minutes: section
        .relearn_delay_minutes
        .unwrap_or(defaults.relearn_delay_minutes),
      day_offset_minutes: section
        .day_offset_minutes
        .unwrap_or(defaults.day_offset_minutes),
    };
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.review_log_cap == 0 {
      return Err(EngineError::Config("review_log_cap must be at least 1".into()));
    }
    if !(0..MAX_RELEARN_DELAY_MINUTES).contains(&self.relearn_delay_minutes) {
      return Err(EngineError::Config(format!(
        "relearn_delay_minutes must be within 0..{}",
        MAX_RELEARN_DELAY_MINUTES
      )));
    }
    if self.day_offset_minutes.abs() > MAX_DAY_OFFSET_MINUTES {
      return Err(EngineError::Config(format!(
        "day_offset_minutes must be within +/-{}",
        MAX_DAY_OFFSET_MINUTES
      )));
    }
    Ok(())
  }

  pub fn scheduler_params(&self) -> SchedulerParams {
    SchedulerParams {
      relearn_delay: Duration::minutes(self.relearn_delay_minutes),
    }
  }

  /// Offset used for calendar-day boundaries
  pub fn day_offset(&self) -> FixedOffset {
    FixedOffset::east_opt(self.day_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
  }
}

/// Load engine settings from a config file; a missing file yields defaults
pub fn load_engine_config(config_path: &Path) -> Result<EngineConfig> {
  match std::fs::read_to_string(config_path) {
    Ok(contents) => {
      let config = EngineConfig::from_toml_str(&contents)?;
      tracing::info!("Loaded engine config from {}", config_path.display());
      Ok(config)
    }
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EngineConfig::default()),
    Err(e) => Err(e.into()),
  }
}

// ==================== Environment ====================

/// Load variables from a `.env` file into the process environment.
/// Variables already set win. Returns false when the file is absent.
pub fn load_env_file(path: &Path) -> bool {
  match dotenvy::from_path(path) {
    Ok(()) => true,
    Err(e) if e.not_found() => false,
    Err(e) => {
      tracing::warn!("Could not load {}: {}", path.display(), e);
      false
    }
  }
}

// ==================== Database Configuration ====================

/// Load database path with priority: config.toml > DATABASE_PATH > default
pub fn load_database_path(config_path: &Path) -> PathBuf {
  // Priority 1: config.toml
  if let Ok(contents) = std::fs::read_to_string(config_path) {
    if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
      if let Some(path) = config.database.and_then(|db| db.path) {
        tracing::info!("Using database from {}: {}", config_path.display(), path);
        return PathBuf::from(path);
      }
    }
  }

  // Priority 2: .env DATABASE_PATH
  if let Ok(path) = std::env::var("DATABASE_PATH") {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }

  // Default
  let default = PathBuf::from(paths::db_path());
  tracing::info!("Using default database path: {}", default.display());
  default
}
