pub mod memory;
pub mod repository;
pub mod schema;
pub mod sqlite;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{EngineError, Result};

pub use memory::MemoryStore;
pub use schema::run_migrations;
pub use sqlite::SqliteStore;

pub type DbPool = Arc<Mutex<Connection>>;

/// Durable string key-value store the engine persists into.
///
/// Values are opaque strings (JSON documents in practice).
pub trait KvStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Write every pair or none of them
  fn set_many(&self, entries: &[(String, String)]) -> Result<()>;

  fn set(&self, key: &str, value: String) -> Result<()> {
    self.set_many(&[(key.to_string(), value)])
  }
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
  fn get(&self, key: &str) -> Result<Option<String>> {
    (**self).get(key)
  }

  fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
    (**self).set_many(entries)
  }
}

/// Acquire a mutex, mapping poisoning to `StorageUnavailable`
pub fn try_lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
  mutex.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("{} mutex poisoned - a thread panicked while holding the lock", what);
    EngineError::StorageUnavailable(format!("{} lock poisoned", what))
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}
