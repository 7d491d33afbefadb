//! Per-user statistics over the completion history

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::time_bucket::day_bucket;
use crate::domain::{Difficulty, Language, Profile, ProgressEntry};
use crate::error::{EngineError, EngineResult};
use crate::scoring::StreakInfo;
use crate::store::{ProfileStore, ProgressStore};

/// How many distinct active days the daily breakdown keeps
pub const RECENT_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub completions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_id: String,
    pub total_completions: u64,
    /// Languages with no completions are absent
    pub by_language: BTreeMap<Language, u64>,
    /// Difficulties with no completions are absent
    pub by_difficulty: BTreeMap<Difficulty, u64>,
    /// Most recent active days, oldest first
    pub daily: Vec<DailyCount>,
    pub average_attempts: f64,
    pub average_hints: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Whether the current streak can still be extended today
    pub streak_active: bool,
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

fn recent_daily_counts(history: &[ProgressEntry]) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for entry in history {
        *per_day.entry(day_bucket(entry.record.completed_at)).or_default() += 1;
    }

    let skip = per_day.len().saturating_sub(RECENT_DAYS);
    per_day
        .into_iter()
        .skip(skip)
        .map(|(day, completions)| DailyCount { day, completions })
        .collect()
}

/// Fold a user's history (and profile, when there is one) into [`UserStats`].
pub fn compute_user_stats(
    user_id: &str,
    profile: Option<&Profile>,
    history: &[ProgressEntry],
    today: NaiveDate,
) -> UserStats {
    let mut by_language = BTreeMap::new();
    let mut by_difficulty = BTreeMap::new();
    let mut attempts = 0u64;
    let mut hints = 0u64;

    for entry in history {
        *by_language.entry(entry.language).or_insert(0u64) += 1;
        *by_difficulty.entry(entry.difficulty).or_insert(0u64) += 1;
        attempts += u64::from(entry.record.attempts);
        hints += u64::from(entry.record.hints_used);
    }

    let total = history.len() as u64;
    let streak = profile.and_then(|p| {
        p.last_activity_day.map(|day| StreakInfo {
            current: p.current_streak,
            best: p.best_streak,
            last_activity_day: day,
        })
    });

    UserStats {
        user_id: user_id.to_string(),
        total_completions: total,
        by_language,
        by_difficulty,
        daily: recent_daily_counts(history),
        average_attempts: average(attempts, total),
        average_hints: average(hints, total),
        current_streak: streak.map_or(0, |s| s.current),
        best_streak: streak.map_or(0, |s| s.best),
        streak_active: streak.is_some_and(|s| s.current > 0 && s.is_active(today)),
    }
}

/// Load and aggregate. An unknown user with no history is `NotFound`.
pub fn user_stats<S>(store: &S, user_id: &str, today: NaiveDate) -> EngineResult<UserStats>
where
    S: ProfileStore + ProgressStore + ?Sized,
{
    let profile = store.get_profile(user_id)?;
    let history = store.list_progress(user_id)?;
    if profile.is_none() && history.is_empty() {
        return Err(EngineError::profile_not_found(user_id));
    }
    Ok(compute_user_stats(user_id, profile.as_ref(), &history, today))
}
