//! Test utilities: a manual clock, stores and a ready-made engine.

use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::db::{KvStore, MemoryStore, SqliteStore};
use crate::domain::Flashcard;
use crate::engine::Engine;
use crate::error::{EngineError, Result};

/// Parse an RFC 3339 timestamp
pub fn at(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s)
    .expect("valid RFC 3339 timestamp")
    .with_timezone(&Utc)
}

/// Clock that only moves when told to
pub struct ManualClock {
  now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Arc<Self> {
    Arc::new(Self {
      now: Mutex::new(start),
    })
  }

  pub fn set(&self, now: DateTime<Utc>) {
    *self.now.lock().unwrap() = now;
  }

  pub fn advance(&self, by: Duration) {
    let mut now = self.now.lock().unwrap();
    *now += by;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap()
  }
}

/// Memory store whose writes can be switched off
#[derive(Default)]
pub struct FailingStore {
  inner: MemoryStore,
  fail_writes: AtomicBool,
}

impl FailingStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  fn check(&self) -> Result<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      Err(EngineError::StorageUnavailable("writes disabled".into()))
    } else {
      Ok(())
    }
  }
}

impl KvStore for FailingStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    self.inner.get(key)
  }

  fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
    self.check()?;
    self.inner.set_many(entries)
  }
}

/// Three cards across two subjects
pub fn sample_cards() -> Vec<Flashcard> {
  vec![
    Flashcard::new("c1", "bio", "cells", "What powers the cell?", "Mitochondria"),
    Flashcard::new("c2", "bio", "genes", "DNA base pairs with A?", "T").with_tags(&["basics"]),
    Flashcard::new("c3", "chem", "atoms", "Symbol for sodium?", "Na"),
  ]
}

/// Engine over an in-memory store with a manual clock
pub fn memory_engine(start: DateTime<Utc>) -> (Engine<MemoryStore>, Arc<ManualClock>) {
  let clock = ManualClock::new(start);
  let engine = Engine::with_clock(MemoryStore::new(), EngineConfig::default(), clock.clone())
    .expect("default config is valid");
  (engine, clock)
}

/// Engine over a SQLite file in a temporary directory.
///
/// The directory is removed when the environment is dropped.
pub struct TestEnv {
  /// Temporary directory (kept alive for database file persistence)
  pub temp: TempDir,
  pub clock: Arc<ManualClock>,
  pub engine: Engine<SqliteStore>,
}

impl TestEnv {
  pub fn new(start: DateTime<Utc>) -> Result<Self> {
    let temp = TempDir::new()?;
    let clock = ManualClock::new(start);
    let store = SqliteStore::open(&temp.path().join("srs.db"))?;
    let engine = Engine::with_clock(store, EngineConfig::default(), clock.clone())?;
    Ok(Self {
      temp,
      clock,
      engine,
    })
  }

  pub fn db_path(&self) -> PathBuf {
    self.temp.path().join("srs.db")
  }

  /// A second engine over the same database file, as after a restart
  pub fn reopen(&self) -> Result<Engine<SqliteStore>> {
    let store = SqliteStore::open(&self.db_path())?;
    Engine::with_clock(store, EngineConfig::default(), self.clock.clone())
  }
}
