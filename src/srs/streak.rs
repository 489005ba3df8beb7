//! Daily streak bookkeeping.
//!
//! The streak is advanced when a review is written and audited when it is
//! read. Nothing fires on a day without reviews, so a lapsed streak is only
//! noticed by the audit.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::domain::StreakState;

/// Gap (in days) at which a stored streak is considered broken on read
const LAPSE_DAYS: i64 = 2;

/// Calendar date of `now` in the given fixed offset
pub fn calendar_day(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
  now.with_timezone(&offset).date_naive()
}

/// Write path: fold a review made on `today` into the stored streak
pub fn advance(state: Option<StreakState>, today: NaiveDate) -> StreakState {
  let Some(state) = state else {
    return StreakState {
      last_review_day: today,
      streak: 1,
    };
  };

  match (today - state.last_review_day).num_days() {
    // Same day, or the clock moved backwards: keep what we have
    gap if gap <= 0 => state,
    1 => StreakState {
      last_review_day: today,
      streak: state.streak + 1,
    },
    _ => StreakState {
      last_review_day: today,
      streak: 1,
    },
  }
}

/// Read path: the streak as it should be reported on `today`.
///
/// Returns the corrected state and whether it differs from what was stored.
pub fn audit(state: Option<StreakState>, today: NaiveDate) -> (Option<StreakState>, bool) {
  match state {
    Some(s) if s.streak > 0 && (today - s.last_review_day).num_days() >= LAPSE_DAYS => {
      (Some(StreakState { streak: 0, ..s }), true)
    }
    other => (other, false),
  }
}

/// Audited streak count
pub fn reported(state: Option<StreakState>, today: NaiveDate) -> u32 {
  audit(state, today).0.map_or(0, |s| s.streak)
}
