//! Two-speed interval/ease scheduler.
//!
//! Failed cards come back after a short relearn delay measured in minutes.
//! Successful cards are pushed out by a whole number of days:
//! - Again: interval resets to 1, ease -0.20, due after the relearn delay
//! - Hard: interval * 1.2 (floored), ease -0.15
//! - Easy: interval * ease (floored, using the ease before the update), ease +0.10
//!
//! Ease is clamped to [1.3, 2.8] and the interval to [1, MAX_INTERVAL_DAYS] days.

use chrono::{DateTime, Duration, Utc};

use crate::domain::schedule::{MAX_EASE, MAX_INTERVAL_DAYS, MIN_EASE};
use crate::domain::{Outcome, OutcomePreview, ScheduleEntry};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const HARD_MULTIPLIER: f64 = 1.2;
const AGAIN_EASE_PENALTY: f64 = 0.20;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.10;

/// Default delay before a failed card is due again
pub const RELEARN_DELAY_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerParams {
  pub relearn_delay: Duration,
}

impl Default for SchedulerParams {
  fn default() -> Self {
    Self {
      relearn_delay: Duration::minutes(RELEARN_DELAY_MINUTES),
    }
  }
}

/// Schedule with the default parameters
pub fn apply_outcome(
  entry: Option<&ScheduleEntry>,
  outcome: Outcome,
  now: DateTime<Utc>,
) -> ScheduleEntry {
  apply_outcome_with(&SchedulerParams::default(), entry, outcome, now)
}

/// Compute the entry that follows `outcome`. `None` means the card was never reviewed.
pub fn apply_outcome_with(
  params: &SchedulerParams,
  entry: Option<&ScheduleEntry>,
  outcome: Outcome,
  now: DateTime<Utc>,
) -> ScheduleEntry {
  let current = entry.cloned().unwrap_or_else(|| ScheduleEntry::initial(now));

  let next = match outcome {
    Outcome::Again => ScheduleEntry {
      next_due_at: now + params.relearn_delay,
      interval: 1.0,
      ease: clamp_ease(current.ease - AGAIN_EASE_PENALTY),
    },
    Outcome::Hard => {
      let interval = clamp_interval(current.interval * HARD_MULTIPLIER);
      ScheduleEntry {
        next_due_at: due_after(now, interval),
        interval,
        ease: clamp_ease(current.ease - HARD_EASE_PENALTY),
      }
    }
    Outcome::Easy => {
      let interval = clamp_interval(current.interval * current.ease);
      ScheduleEntry {
        next_due_at: due_after(now, interval),
        interval,
        ease: clamp_ease(current.ease + EASY_EASE_BONUS),
      }
    }
  };

  debug_assert!(next.is_valid(), "schedule entry out of range: {:?}", next);
  next
}

/// Entries each outcome would produce, without committing any of them
pub fn preview_outcomes(
  params: &SchedulerParams,
  entry: Option<&ScheduleEntry>,
  now: DateTime<Utc>,
) -> OutcomePreview {
  OutcomePreview {
    again: apply_outcome_with(params, entry, Outcome::Again, now),
    hard: apply_outcome_with(params, entry, Outcome::Hard, now),
    easy: apply_outcome_with(params, entry, Outcome::Easy, now),
  }
}

fn clamp_ease(ease: f64) -> f64 {
  ease.clamp(MIN_EASE, MAX_EASE)
}

/// Whole days within [1, MAX_INTERVAL_DAYS]; a non-finite product lands on the cap
fn clamp_interval(days: f64) -> f64 {
  if days.is_nan() {
    return MAX_INTERVAL_DAYS;
  }
  days.floor().clamp(1.0, MAX_INTERVAL_DAYS)
}

/// `now + interval days`, saturating at the far end of the calendar
fn due_after(now: DateTime<Utc>, interval: f64) -> DateTime<Utc> {
  Duration::try_milliseconds((interval * MILLIS_PER_DAY).round() as i64)
    .and_then(|d| now.checked_add_signed(d))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
