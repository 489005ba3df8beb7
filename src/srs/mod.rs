pub mod due_queue;
pub mod histogram;
pub mod scheduler;
pub mod streak;

pub use due_queue::{due_cards, is_due, next_due_at};
pub use histogram::weekly_reviews;
pub use scheduler::{apply_outcome, apply_outcome_with, preview_outcomes, SchedulerParams};
