use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lesson::{Difficulty, Language};

/// One persisted completion of a lesson by a user.
///
/// At most one exists per (user, lesson); a later completion replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub lesson_id: String,
    pub completed_at: DateTime<Utc>,
    /// Always >= 1
    pub attempts: u32,
    pub hints_used: u32,
    pub time_taken_secs: Option<u64>,
}

/// A progress record joined with the lesson metadata the aggregations need
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub record: ProgressRecord,
    pub language: Language,
    pub difficulty: Difficulty,
    pub points: u32,
}

/// Result of writing a progress record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// First completion of this lesson by this user
    Inserted,
    /// An earlier completion was overwritten
    Replaced,
    /// An earlier completion was overwritten, but it was never scored
    Unscored,
}
