//! Badge predicates
//!
//! Each badge type has one predicate over the user's current aggregates.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::{Badge, BadgeType, Language, Profile, ProgressEntry};

/// Everything the predicates look at
pub struct BadgeContext<'a> {
    pub profile: &'a Profile,
    pub history: &'a [ProgressEntry],
    /// Catalog size per language track
    pub lesson_counts: &'a BTreeMap<Language, u64>,
}

impl BadgeContext<'_> {
    fn hint_free_completions(&self) -> u64 {
        self.history
            .iter()
            .filter(|e| e.record.hints_used == 0)
            .count() as u64
    }

    fn fastest_completion_secs(&self) -> Option<u64> {
        self.history
            .iter()
            .filter_map(|e| e.record.time_taken_secs)
            .min()
    }

    /// Languages whose whole track has been completed
    pub fn mastered_languages(&self) -> Vec<Language> {
        let mut completed: BTreeMap<Language, BTreeSet<&str>> = BTreeMap::new();
        for entry in self.history {
            completed
                .entry(entry.language)
                .or_default()
                .insert(entry.record.lesson_id.as_str());
        }

        self.lesson_counts
            .iter()
            .filter(|(_, total)| **total > 0)
            .filter(|(lang, total)| {
                completed
                    .get(*lang)
                    .is_some_and(|done| done.len() as u64 >= **total)
            })
            .map(|(lang, _)| *lang)
            .collect()
    }
}

/// Whether `badge`'s requirement holds for the current aggregates
pub fn is_satisfied(badge: &Badge, ctx: &BadgeContext<'_>) -> bool {
    let requirement = u64::from(badge.requirement_value);
    match badge.badge_type {
        BadgeType::FirstDebug => ctx.profile.total_lessons_completed >= 1,
        BadgeType::ConsecutiveSolves => u64::from(ctx.profile.current_streak) >= requirement,
        BadgeType::LanguageMaster => !ctx.mastered_languages().is_empty(),
        BadgeType::SpeedDemon => ctx
            .fastest_completion_secs()
            .is_some_and(|secs| secs <= requirement),
        BadgeType::AccuracyAce => ctx.hint_free_completions() >= requirement,
    }
}

/// Catalog badges not in `owned` whose requirement is now met
pub fn newly_earned<'b>(catalog: &'b [Badge], owned: &HashSet<&str>, ctx: &BadgeContext<'_>) -> Vec<&'b Badge> {
    catalog
        .iter()
        .filter(|badge| !owned.contains(badge.id.as_str()))
        .filter(|badge| is_satisfied(badge, ctx))
        .collect()
}
