//! Due-queue selection over the catalog and one user's schedule.

use chrono::{DateTime, Utc};

use crate::domain::{Flashcard, Schedule};

/// A card is due when it was never reviewed or its due time has passed
pub fn is_due(schedule: &Schedule, card_id: &str, now: DateTime<Utc>) -> bool {
  schedule.get(card_id).is_none_or(|entry| entry.is_due(now))
}

/// Cards due at `now`, in catalog order, optionally restricted to one subject.
///
/// The iterator borrows its inputs and is recomputed on every call.
pub fn due_cards<'a>(
  catalog: &'a [Flashcard],
  schedule: &'a Schedule,
  now: DateTime<Utc>,
  subject_id: Option<&'a str>,
) -> impl Iterator<Item = &'a Flashcard> + 'a {
  catalog
    .iter()
    .filter(move |card| card.in_subject(subject_id))
    .filter(move |card| is_due(schedule, &card.id, now))
}

/// Earliest due time strictly after `now` among catalog cards
pub fn next_due_at(
  catalog: &[Flashcard],
  schedule: &Schedule,
  now: DateTime<Utc>,
  subject_id: Option<&str>,
) -> Option<DateTime<Utc>> {
  catalog
    .iter()
    .filter(|card| card.in_subject(subject_id))
    .filter_map(|card| schedule.get(&card.id))
    .map(|entry| entry.next_due_at)
    .filter(|due| *due > now)
    .min()
}
