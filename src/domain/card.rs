use serde::{Deserialize, Serialize};

/// A single reviewable front/back unit.
///
/// Cards are immutable once ingested. Scheduling state lives elsewhere,
/// keyed by `id`, so a card never points at its own schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
  pub id: String,
  pub subject_id: String,
  pub topic_id: String,
  pub front: String,
  pub back: String,
  #[serde(default)]
  pub tags: Vec<String>,
}

impl Flashcard {
  pub fn new(
    id: impl Into<String>,
    subject_id: impl Into<String>,
    topic_id: impl Into<String>,
    front: impl Into<String>,
    back: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      subject_id: subject_id.into(),
      topic_id: topic_id.into(),
      front: front.into(),
      back: back.into(),
      tags: Vec::new(),
    }
  }

  pub fn with_tags(mut self, tags: &[&str]) -> Self {
    self.tags = tags.iter().map(|t| t.to_string()).collect();
    self
  }

  pub fn in_subject(&self, subject_id: Option<&str>) -> bool {
    subject_id.is_none_or(|s| self.subject_id == s)
  }
}
