//! Streak tracking
//!
//! A streak counts completions that keep landing inside the qualifying window:
//! the same UTC calendar day as the last activity, or the day right after it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::time_bucket::days_between;

/// How completions inside the window extend a streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakMode {
    /// Every completion in the window adds one
    #[default]
    PerCompletion,
    /// Only the first completion of the following day adds one
    PerDay,
}

impl StreakMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerCompletion => "per_completion",
            Self::PerDay => "per_day",
        }
    }
}

/// Streak counters after a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakInfo {
    pub current: u32,
    pub best: u32,
    pub last_activity_day: NaiveDate,
}

impl StreakInfo {
    /// Still alive on `today` (activity today or yesterday)
    pub fn is_active(&self, today: NaiveDate) -> bool {
        days_between(self.last_activity_day, today) <= 1
    }
}

/// Compute the streak after a completion on `day`.
///
/// A completion dated before the last activity (clock skew, replayed history)
/// counts as same-day.
pub fn advance(
    current: u32,
    best: u32,
    last_activity_day: Option<NaiveDate>,
    day: NaiveDate,
    mode: StreakMode,
) -> StreakInfo {
    let (new_current, last_day) = match last_activity_day {
        None => (1, day),
        Some(last) => {
            let days_since = days_between(last, day).max(0);
            let next = match (days_since, mode) {
                (0, StreakMode::PerCompletion) | (1, _) => current + 1,
                (0, StreakMode::PerDay) => current.max(1),
                _ => 1,
            };
            (next, last.max(day))
        }
    };

    StreakInfo {
        current: new_current,
        best: best.max(new_current),
        last_activity_day: last_day,
    }
}
