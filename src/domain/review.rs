use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::schedule::ScheduleEntry;

/// One recorded review; only used for statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
  pub card_id: String,
  pub timestamp: DateTime<Utc>,
}

impl ReviewEvent {
  pub fn new(card_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
    Self {
      card_id: card_id.into(),
      timestamp,
    }
  }
}

/// Bounded review history, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewLog {
  events: VecDeque<ReviewEvent>,
}

impl ReviewLog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Prepend an event, evicting the oldest ones beyond `cap`
  pub fn push(&mut self, event: ReviewEvent, cap: usize) {
    self.events.push_front(event);
    self.events.truncate(cap);
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ReviewEvent> {
    self.events.iter()
  }

  pub fn latest(&self) -> Option<&ReviewEvent> {
    self.events.front()
  }
}

/// Consecutive-day review streak.
///
/// Incremented on the write path; may be stale when read and is audited then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
  pub last_review_day: NaiveDate,
  pub streak: u32,
}

/// Progress summary for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  /// Index 6 is today, index 0 is six days ago
  pub weekly_reviews: [u32; 7],
  pub streak: u32,
  pub total_due: usize,
}

/// Result of `Engine::record_review`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedReview {
  pub entry: ScheduleEntry,
  /// The card id was not in the catalog when the review was written
  pub orphan: bool,
}

/// What each outcome would produce if submitted now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomePreview {
  pub again: ScheduleEntry,
  pub hard: ScheduleEntry,
  pub easy: ScheduleEntry,
}
