pub mod card;
pub mod review;
pub mod schedule;

pub use card::Flashcard;
pub use review::{OutcomePreview, RecordedReview, ReviewEvent, ReviewLog, Stats, StreakState};
pub use schedule::{Outcome, Schedule, ScheduleEntry};
