//! Volatile store, used for tests and embedding without a database file

use std::collections::HashMap;
use std::sync::Mutex;

use super::{try_lock, KvStore};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KvStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(try_lock(&self.entries, "memory store")?.get(key).cloned())
  }

  fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
    // Single lock scope keeps the batch atomic for readers
    let mut map = try_lock(&self.entries, "memory store")?;
    for (key, value) in entries {
      map.insert(key.clone(), value.clone());
    }
    Ok(())
  }
}
