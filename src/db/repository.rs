//! Typed access to the persisted layout:
//!
//! ```text
//! cards               shared catalog, Vec<Flashcard>
//! schedule:{user_id}  card id -> ScheduleEntry
//! reviews:{user_id}   bounded ReviewEvent list, most recent first
//! streak:{user_id}    StreakState
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KvStore;
use crate::domain::{Flashcard, ReviewLog, Schedule, StreakState};
use crate::error::{EngineError, Result};

pub const CARDS_KEY: &str = "cards";

pub fn schedule_key(user_id: &str) -> String {
  format!("schedule:{}", user_id)
}

pub fn reviews_key(user_id: &str) -> String {
  format!("reviews:{}", user_id)
}

pub fn streak_key(user_id: &str) -> String {
  format!("streak:{}", user_id)
}

fn load<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>> {
  match store.get(key)? {
    Some(raw) => serde_json::from_str(&raw)
      .map(Some)
      .map_err(|source| EngineError::Corrupt {
        key: key.to_string(),
        source,
      }),
    None => Ok(None),
  }
}

/// Serialize a value into a (key, value) pair ready for `KvStore::set_many`
pub fn encode<T: Serialize>(key: String, value: &T) -> Result<(String, String)> {
  Ok((key, serde_json::to_string(value)?))
}

pub fn load_catalog(store: &dyn KvStore) -> Result<Vec<Flashcard>> {
  Ok(load(store, CARDS_KEY)?.unwrap_or_default())
}

pub fn save_catalog(store: &dyn KvStore, cards: &[Flashcard]) -> Result<()> {
  let (key, value) = encode(CARDS_KEY.to_string(), &cards)?;
  store.set(&key, value)
}

pub fn load_schedule(store: &dyn KvStore, user_id: &str) -> Result<Schedule> {
  Ok(load(store, &schedule_key(user_id))?.unwrap_or_default())
}

pub fn load_reviews(store: &dyn KvStore, user_id: &str) -> Result<ReviewLog> {
  Ok(load(store, &reviews_key(user_id))?.unwrap_or_default())
}

pub fn load_streak(store: &dyn KvStore, user_id: &str) -> Result<Option<StreakState>> {
  load(store, &streak_key(user_id))
}
