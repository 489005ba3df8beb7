use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
  #[error("Storage unavailable: {0}")]
  StorageUnavailable(String),

  #[error("Database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("Corrupt value under '{key}': {source}")]
  Corrupt {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid configuration: {0}")]
  Config(String),

  #[error("Unknown outcome '{0}' (expected again, hard or easy)")]
  UnknownOutcome(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }
}
