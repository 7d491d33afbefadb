use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-user scoring aggregate.
///
/// Only the scoring step mutates it, and always as a whole: the store swaps the
/// full row guarded by `version`, so the additive counters can never be applied
/// halfway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub total_lessons_completed: u64,
    pub total_points: u64,
    pub current_streak: u32,
    pub best_streak: u32,
    /// UTC day of the last scored completion
    pub last_activity_day: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped by every successful swap
    pub version: u64,
}

impl Profile {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            total_lessons_completed: 0,
            total_points: 0,
            current_streak: 0,
            best_streak: 0,
            last_activity_day: None,
            created_at,
            version: 0,
        }
    }
}
