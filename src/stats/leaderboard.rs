//! Global ranking by total points

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::Profile;
use crate::error::EngineResult;
use crate::store::ProfileStore;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub points: u64,
    pub completions: u64,
}

/// Points descending, then earliest profile, then user id.
fn ranking_order(a: &Profile, b: &Profile) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Rank `profiles` and keep the top `limit`.
pub fn rank_profiles(mut profiles: Vec<Profile>, limit: usize) -> Vec<LeaderboardEntry> {
    profiles.sort_by(ranking_order);
    profiles
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i + 1,
            user_id: p.user_id,
            display_name: p.display_name,
            points: p.total_points,
            completions: p.total_lessons_completed,
        })
        .collect()
}

pub fn leaderboard<S: ProfileStore + ?Sized>(store: &S, limit: usize) -> EngineResult<Vec<LeaderboardEntry>> {
    let profiles = store.list_profiles()?;
    Ok(rank_profiles(profiles, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap()
    }

    fn profile(id: &str, points: u64, created: u32) -> Profile {
        let mut p = Profile::new(id, id.to_uppercase(), at(created));
        p.total_points = points;
        p.total_lessons_completed = points / 10;
        p
    }

    #[test]
    fn test_ties_go_to_earliest_profile() {
        let ranked = rank_profiles(vec![profile("late", 100, 5), profile("early", 100, 1)], 50);
        assert_eq!(ranked[0].user_id, "early");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].user_id, "late");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_points_first() {
        let ranked = rank_profiles(
            vec![profile("a", 10, 0), profile("b", 300, 9), profile("c", 120, 3)],
            50,
        );
        let ids: Vec<_> = ranked.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(ranked[0].completions, 30);
        assert_eq!(ranked[0].display_name, "B");
    }

    #[test]
    fn test_identical_creation_time_falls_back_to_user_id() {
        let ranked = rank_profiles(vec![profile("zed", 50, 1), profile("amy", 50, 1)], 50);
        assert_eq!(ranked[0].user_id, "amy");
    }

    #[test]
    fn test_limit() {
        let profiles: Vec<_> = (0..10).map(|i| profile(&format!("u{i}"), i * 10, 0)).collect();
        let ranked = rank_profiles(profiles.clone(), 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[2].rank, 3);

        assert!(rank_profiles(profiles, 0).is_empty());
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let profiles = vec![profile("x", 5, 2), profile("y", 5, 1), profile("z", 9, 3)];
        let mut reversed = profiles.clone();
        reversed.reverse();
        assert_eq!(rank_profiles(profiles, 50), rank_profiles(reversed, 50));
    }
}
