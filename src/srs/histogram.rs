use chrono::{DateTime, Utc};

use crate::domain::ReviewLog;

const MILLIS_PER_DAY: i64 = 86_400_000;

pub const WEEK_DAYS: usize = 7;

/// Trailing 7-day review counts.
///
/// Events are bucketed by whole 24h periods before `now`: index 6 holds the
/// last 24 hours, index 0 the period six days back. Older and future events
/// are not counted.
pub fn weekly_reviews(log: &ReviewLog, now: DateTime<Utc>) -> [u32; WEEK_DAYS] {
  let mut buckets = [0u32; WEEK_DAYS];

  for event in log.iter() {
    let age_ms = (now - event.timestamp).num_milliseconds();
    if age_ms < 0 {
      continue;
    }
    let days_ago = (age_ms / MILLIS_PER_DAY) as usize;
    if days_ago < WEEK_DAYS {
      buckets[WEEK_DAYS - 1 - days_ago] += 1;
    }
  }

  buckets
}
