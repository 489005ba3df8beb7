use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lower bound for the ease factor
pub const MIN_EASE: f64 = 1.3;

/// Upper bound for the ease factor
pub const MAX_EASE: f64 = 2.8;

/// Ease assigned to a card before its first review
pub const DEFAULT_EASE: f64 = 2.5;

/// Interval (in days) assigned to a card before its first review
pub const DEFAULT_INTERVAL_DAYS: f64 = 1.0;

/// Longest interval a card can reach, roughly a century
pub const MAX_INTERVAL_DAYS: f64 = 36_500.0;

/// Per-user schedule: card id -> entry
pub type Schedule = BTreeMap<String, ScheduleEntry>;

/// Learner's answer for one card in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Again,
  Hard,
  Easy,
}

impl Outcome {
  pub const ALL: [Outcome; 3] = [Self::Again, Self::Hard, Self::Easy];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Easy => "easy",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "again" => Some(Self::Again),
      "hard" => Some(Self::Hard),
      "easy" => Some(Self::Easy),
      _ => None,
    }
  }
}

/// Scheduling state for one (user, card) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
  pub next_due_at: DateTime<Utc>,
  /// Spacing in days, fractional allowed
  pub interval: f64,
  pub ease: f64,
}

impl ScheduleEntry {
  /// The state an unseen card is scheduled from
  pub fn initial(now: DateTime<Utc>) -> Self {
    Self {
      next_due_at: now,
      interval: DEFAULT_INTERVAL_DAYS,
      ease: DEFAULT_EASE,
    }
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_due_at <= now
  }

  /// Ease within [MIN_EASE, MAX_EASE], interval within [1, MAX_INTERVAL_DAYS]
  pub fn is_valid(&self) -> bool {
    (MIN_EASE..=MAX_EASE).contains(&self.ease)
      && (1.0..=MAX_INTERVAL_DAYS).contains(&self.interval)
  }
}
