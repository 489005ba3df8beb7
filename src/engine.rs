//! Engine facade: the operations review sessions and content sources call.
//!
//! Every user-scoped operation runs under that user's lock, so reviews for
//! one user are applied in submission order. A review write touches the
//! schedule, the review log and the streak in a single `set_many` call.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::db::repository::{
  self, encode, load_catalog, load_reviews, load_schedule, load_streak, reviews_key,
  schedule_key, streak_key,
};
use crate::db::{try_lock, KvStore};
use crate::domain::{
  Flashcard, Outcome, OutcomePreview, RecordedReview, ReviewEvent, ScheduleEntry, Stats,
};
use crate::error::{LogOnError, Result};
use crate::srs::{self, streak, SchedulerParams};

pub struct Engine<S: KvStore> {
  store: S,
  clock: Arc<dyn Clock>,
  config: EngineConfig,
  params: SchedulerParams,
  user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
  catalog_lock: Mutex<()>,
}

impl<S: KvStore> Engine<S> {
  pub fn new(store: S, config: EngineConfig) -> Result<Self> {
    Self::with_clock(store, config, Arc::new(SystemClock))
  }

  pub fn with_clock(store: S, config: EngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      store,
      clock,
      params: config.scheduler_params(),
      config,
      user_locks: Mutex::new(HashMap::new()),
      catalog_lock: Mutex::new(()),
    })
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Lock handle for `user_id`. Handles nobody else holds are dropped from
  /// the table, so it only keeps users with operations in flight.
  fn user_lock(&self, user_id: &str) -> Result<Arc<Mutex<()>>> {
    let mut locks = try_lock(&self.user_locks, "user lock table")?;
    locks.retain(|id, lock| id == user_id || Arc::strong_count(lock) > 1);
    Ok(Arc::clone(locks.entry(user_id.to_string()).or_default()))
  }

  fn today(&self, now: DateTime<Utc>) -> NaiveDate {
    streak::calendar_day(now, self.config.day_offset())
  }

  // ==================== Catalog ====================

  /// Add cards to the shared catalog. Re-ingesting a known id replaces its
  /// content in place; identical cards are skipped. Returns how many ids were new.
  pub fn ingest_cards(&self, cards: &[Flashcard]) -> Result<usize> {
    let _guard = try_lock(&self.catalog_lock, "catalog")?;
    let mut catalog = load_catalog(&self.store)?;
    let mut positions: HashMap<String, usize> = catalog
      .iter()
      .enumerate()
      .map(|(i, card)| (card.id.clone(), i))
      .collect();

    let mut added = 0;
    let mut changed = false;
    for card in cards {
      match positions.get(&card.id) {
        Some(&i) if catalog[i] == *card => {}
        Some(&i) => {
          tracing::debug!("Replacing content of card {}", card.id);
          catalog[i] = card.clone();
          changed = true;
        }
        None => {
          positions.insert(card.id.clone(), catalog.len());
          catalog.push(card.clone());
          added += 1;
          changed = true;
        }
      }
    }

    if changed {
      repository::save_catalog(&self.store, &catalog)?;
    }
    tracing::info!("Ingested {} cards ({} new, catalog size {})", cards.len(), added, catalog.len());
    Ok(added)
  }

  /// Delete cards whose source content is gone. Returns how many were removed.
  pub fn remove_cards(&self, card_ids: &[&str]) -> Result<usize> {
    let _guard = try_lock(&self.catalog_lock, "catalog")?;
    let doomed: HashSet<&str> = card_ids.iter().copied().collect();
    let mut catalog = load_catalog(&self.store)?;

    let before = catalog.len();
    catalog.retain(|card| !doomed.contains(card.id.as_str()));
    let removed = before - catalog.len();

    if removed > 0 {
      repository::save_catalog(&self.store, &catalog)?;
      tracing::info!("Removed {} cards from catalog", removed);
    }
    Ok(removed)
  }

  pub fn catalog(&self) -> Result<Vec<Flashcard>> {
    load_catalog(&self.store)
  }

  // ==================== Due queue ====================

  /// Cards due now for `user_id`, in catalog order
  pub fn get_due_cards(&self, user_id: &str, subject_id: Option<&str>) -> Result<Vec<Flashcard>> {
    let lock = self.user_lock(user_id)?;
    let _guard = try_lock(&*lock, "user")?;

    let now = self.clock.now();
    let catalog = load_catalog(&self.store)?;
    let schedule = load_schedule(&self.store, user_id)?;

    Ok(srs::due_cards(&catalog, &schedule, now, subject_id).cloned().collect())
  }

  pub fn due_count(&self, user_id: &str, subject_id: Option<&str>) -> Result<usize> {
    let lock = self.user_lock(user_id)?;
    let _guard = try_lock(&*lock, "user")?;
    self.due_count_locked(user_id, subject_id, self.clock.now())
  }

  fn due_count_locked(
    &self,
    user_id: &str,
    subject_id: Option<&str>,
    now: DateTime<Utc>,
  ) -> Result<usize> {
    let catalog = load_catalog(&self.store)?;
    let schedule = load_schedule(&self.store, user_id)?;
    Ok(srs::due_cards(&catalog, &schedule, now, subject_id).count())
  }

  /// Earliest upcoming due time among cards not yet due
  pub fn next_review_at(
    &self,
    user_id: &str,
    subject_id: Option<&str>,
  ) -> Result<Option<DateTime<Utc>>> {
    let lock = self.user_lock(user_id)?;
    let _guard = try_lock(&*lock, "user")?;

    let now = self.clock.now();
    let catalog = load_catalog(&self.store)?;
    let schedule = load_schedule(&self.store, user_id)?;
    Ok(srs::next_due_at(&catalog, &schedule, now, subject_id))
  }

  // ==================== Reviews ====================

  /// Apply one review outcome: reschedule the card, append to the review log
  /// and advance the streak, all in one store write.
  ///
  /// Card ids missing from the catalog are still scheduled; the result is
  /// flagged as an orphan so the caller can report it.
  pub fn record_review(
    &self,
    user_id: &str,
    card_id: &str,
    outcome: Outcome,
  ) -> Result<RecordedReview> {
    let lock = self.user_lock(user_id)?;
    let _guard = try_lock(&*lock, "user")?;

    let now = self.clock.now();
    let orphan = !load_catalog(&self.store)?.iter().any(|card| card.id == card_id);
    if orphan {
      tracing::warn!("Review for unknown card {} (user {})", card_id, user_id);
    }

    let mut schedule = load_schedule(&self.store, user_id)?;
    let mut reviews = load_reviews(&self.store, user_id)?;
    let stored_streak = load_streak(&self.store, user_id)?;

    let entry = srs::apply_outcome_with(&self.params, schedule.get(card_id), outcome, now);
    schedule.insert(card_id.to_string(), entry.clone());
    reviews.push(ReviewEvent::new(card_id, now), self.config.review_log_cap);
    let new_streak = streak::advance(stored_streak, self.today(now));

    self.store.set_many(&[
      encode(schedule_key(user_id), &schedule)?,
      encode(reviews_key(user_id), &reviews)?,
      encode(streak_key(user_id), &new_streak)?,
    ])?;

    tracing::debug!(
      "User {} reviewed {} as {}: interval {} ease {:.2} due {}",
      user_id,
      card_id,
      outcome.as_str(),
      entry.interval,
      entry.ease,
      entry.next_due_at.to_rfc3339()
    );

    Ok(RecordedReview { entry, orphan })
  }

  pub fn schedule_entry(&self, user_id: &str, card_id: &str) -> Result<Option<ScheduleEntry>> {
    Ok(load_schedule(&self.store, user_id)?.remove(card_id))
  }

  /// What each outcome would do to the card right now; nothing is written
  pub fn preview(&self, user_id: &str, card_id: &str) -> Result<OutcomePreview> {
    let entry = self.schedule_entry(user_id, card_id)?;
    Ok(srs::preview_outcomes(&self.params, entry.as_ref(), self.clock.now()))
  }

  /// Make every scheduled card due now, keeping interval and ease
  pub fn make_all_due(&self, user_id: &str) -> Result<usize> {
    let lock = self.user_lock(user_id)?;
    let _guard = try_lock(&*lock, "user")?;

    let now = self.clock.now();
    let mut schedule = load_schedule(&self.store, user_id)?;
    let mut updated = 0;
    for entry in schedule.values_mut() {
      if entry.next_due_at > now {
        entry.next_due_at = now;
        updated += 1;
      }
    }

    if updated > 0 {
      self.store.set_many(&[encode(schedule_key(user_id), &schedule)?])?;
    }
    tracing::info!("Made {} cards due for user {}", updated, user_id);
    Ok(updated)
  }

  // ==================== Stats ====================

  /// Weekly histogram, audited streak and due count.
  ///
  /// A lapsed streak is reported as 0 and the correction is written back.
  pub fn get_stats(&self, user_id: &str) -> Result<Stats> {
    let lock = self.user_lock(user_id)?;
    let _guard = try_lock(&*lock, "user")?;

    let now = self.clock.now();
    let reviews = load_reviews(&self.store, user_id)?;
    let stored_streak = load_streak(&self.store, user_id)?;

    let today = self.today(now);
    let (audited, corrected) = streak::audit(stored_streak, today);
    if let (Some(state), true) = (audited, corrected) {
      tracing::debug!("Streak for user {} lapsed, resetting", user_id);
      encode(streak_key(user_id), &state)
        .and_then(|pair| self.store.set_many(&[pair]))
        .log_warn("Failed to persist streak correction");
    }

    Ok(Stats {
      weekly_reviews: srs::weekly_reviews(&reviews, now),
      streak: streak::reported(audited, today),
      total_due: self.due_count_locked(user_id, None, now)?,
    })
  }
}
