pub mod clock;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod paths;
pub mod srs;

#[cfg(test)]
pub mod testing;

pub use clock::{Clock, SystemClock};
pub use config::EngineConfig;
pub use db::{KvStore, MemoryStore, SqliteStore};
pub use domain::{Flashcard, Outcome, ScheduleEntry, Stats};
pub use engine::Engine;
pub use error::{EngineError, Result};
