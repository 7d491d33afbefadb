//! Points and streak bookkeeping for completed lessons
//!
//! The profile update is a read-compute-swap loop: the new aggregate is derived
//! from the row that was read and written back only if nobody changed it in
//! between, so concurrent completions never lose points.

mod streak;

pub use streak::{advance as advance_streak, StreakInfo, StreakMode};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Profile, UpsertOutcome};
use crate::error::{EngineError, EngineResult};
use crate::stats::time_bucket::day_bucket;
use crate::store::ProfileStore;

/// What happens when a user solves a lesson they already completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescorePolicy {
    /// Only the first completion awards points
    #[default]
    FirstCompletion,
    /// Every completion awards points again
    EveryCompletion,
}

impl RescorePolicy {
    pub fn should_score(&self, outcome: UpsertOutcome) -> bool {
        match self {
            Self::FirstCompletion => outcome != UpsertOutcome::Replaced,
            Self::EveryCompletion => true,
        }
    }
}

/// Knobs for [`score_completion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub streak_mode: StreakMode,
    /// Swap attempts before giving up with [`EngineError::Conflict`]
    pub conflict_retries: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            streak_mode: StreakMode::default(),
            conflict_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringResult {
    pub points_awarded: u32,
    pub streak_extended: bool,
    pub profile: Profile,
}

/// Pure profile transition for one scored completion
pub fn apply_completion(profile: &Profile, points: u32, completed_at: DateTime<Utc>, mode: StreakMode) -> Profile {
    let streak = advance_streak(
        profile.current_streak,
        profile.best_streak,
        profile.last_activity_day,
        day_bucket(completed_at),
        mode,
    );

    Profile {
        total_points: profile.total_points + u64::from(points),
        total_lessons_completed: profile.total_lessons_completed + 1,
        current_streak: streak.current,
        best_streak: streak.best,
        last_activity_day: Some(streak.last_activity_day),
        version: profile.version + 1,
        ..profile.clone()
    }
}

/// Award `points` to `user_id` and advance their streak atomically
pub fn score_completion<S>(
    store: &S,
    user_id: &str,
    points: u32,
    completed_at: DateTime<Utc>,
    rules: ScoringRules,
) -> EngineResult<ScoringResult>
where
    S: ProfileStore + ?Sized,
{
    let tries = rules.conflict_retries.max(1);

    for attempt in 1..=tries {
        let current = store
            .get_profile(user_id)?
            .ok_or_else(|| EngineError::profile_not_found(user_id))?;
        let next = apply_completion(&current, points, completed_at, rules.streak_mode);

        if store.compare_and_swap(&current, &next)? {
            tracing::info!(
                user = user_id,
                points,
                total_points = next.total_points,
                streak = next.current_streak,
                "completion scored"
            );
            return Ok(ScoringResult {
                points_awarded: points,
                streak_extended: next.current_streak > current.current_streak,
                profile: next,
            });
        }

        tracing::warn!(user = user_id, attempt, "profile changed concurrently, retrying");
    }

    Err(EngineError::Conflict(format!(
        "profile {user_id} kept changing after {tries} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Profile store where another writer wins the first `races` swaps
    struct RacingProfiles {
        profile: Mutex<Profile>,
        races: Mutex<u32>,
    }

    impl RacingProfiles {
        fn new(races: u32) -> Self {
            Self {
                profile: Mutex::new(profile()),
                races: Mutex::new(races),
            }
        }
    }

    impl ProfileStore for RacingProfiles {
        fn get_profile(&self, _: &str) -> EngineResult<Option<Profile>> {
            Ok(Some(self.profile.lock().unwrap().clone()))
        }

        fn create_profile(&self, _: &str, _: &str, _: DateTime<Utc>) -> EngineResult<Profile> {
            Ok(self.profile.lock().unwrap().clone())
        }

        fn compare_and_swap(&self, current: &Profile, next: &Profile) -> EngineResult<bool> {
            let mut stored = self.profile.lock().unwrap();
            let mut races = self.races.lock().unwrap();
            if *races > 0 {
                *races -= 1;
                stored.total_points += 5;
                stored.version += 1;
                return Ok(false);
            }
            if stored.version != current.version {
                return Ok(false);
            }
            *stored = next.clone();
            Ok(true)
        }

        fn list_profiles(&self) -> EngineResult<Vec<Profile>> {
            Ok(vec![self.profile.lock().unwrap().clone()])
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap()
    }

    fn profile() -> Profile {
        Profile::new("bob", "Bob", at(1, 8))
    }

    #[test]
    fn test_apply_completion_adds_points_and_count() {
        let next = apply_completion(&profile(), 25, at(1, 9), StreakMode::PerCompletion);
        assert_eq!(next.total_points, 25);
        assert_eq!(next.total_lessons_completed, 1);
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.best_streak, 1);
        assert_eq!(next.version, 1);
        assert_eq!(next.last_activity_day, Some(at(1, 9).date_naive()));
    }

    #[test]
    fn test_streak_nine_becomes_ten() {
        let mut p = profile();
        p.current_streak = 9;
        p.best_streak = 9;
        p.last_activity_day = Some(at(3, 0).date_naive());

        let next = apply_completion(&p, 10, at(4, 12), StreakMode::PerCompletion);
        assert_eq!(next.current_streak, 10);
        assert_eq!(next.best_streak, 10);
    }

    #[test]
    fn test_streak_reset_keeps_best() {
        let mut p = profile();
        p.current_streak = 6;
        p.best_streak = 8;
        p.last_activity_day = Some(at(1, 0).date_naive());

        let next = apply_completion(&p, 10, at(5, 12), StreakMode::PerCompletion);
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.best_streak, 8);
    }

    #[test]
    fn test_lost_swap_rereads_and_retries() {
        let store = RacingProfiles::new(2);
        let result = score_completion(&store, "bob", 10, at(1, 9), ScoringRules::default()).unwrap();

        // Both concurrent +5 writes survive next to ours
        assert_eq!(result.points_awarded, 10);
        assert_eq!(result.profile.total_points, 20);
        assert_eq!(result.profile.total_lessons_completed, 1);
        assert_eq!(store.get_profile("bob").unwrap().unwrap(), result.profile);
    }

    #[test]
    fn test_conflict_after_retries_run_out() {
        let store = RacingProfiles::new(3);
        let err = score_completion(&store, "bob", 10, at(1, 9), ScoringRules::default()).unwrap_err();

        assert!(matches!(err, EngineError::Conflict(_)));
        assert!(err.is_retryable());
        let stored = store.get_profile("bob").unwrap().unwrap();
        assert_eq!(stored.total_points, 15);
        assert_eq!(stored.total_lessons_completed, 0);
    }

    #[test]
    fn test_rescore_policy() {
        assert!(RescorePolicy::FirstCompletion.should_score(UpsertOutcome::Inserted));
        assert!(!RescorePolicy::FirstCompletion.should_score(UpsertOutcome::Replaced));
        assert!(RescorePolicy::FirstCompletion.should_score(UpsertOutcome::Unscored));
        assert!(RescorePolicy::EveryCompletion.should_score(UpsertOutcome::Replaced));
    }
}
