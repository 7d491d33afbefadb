//! Badge evaluation
//!
//! After a completion has been scored, every badge the user does not own yet is
//! checked against the refreshed profile and history. Grants are idempotent, so
//! running the evaluation twice never awards a badge twice.

mod checker;
mod definitions;

pub use checker::{BadgeContext, is_satisfied, newly_earned};
pub use definitions::{BadgeDefinition, DEFAULT_BADGES};

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{Badge, Profile};
use crate::error::EngineResult;
use crate::store::{BadgeStore, LessonCatalog, ProgressStore};

/// Grant every badge whose requirement `profile` now meets.
///
/// Returns the badges granted by this call, in catalog order. A grant that
/// fails is logged and skipped, so the other badges still go through and the
/// failed one is retried by the next evaluation.
pub fn evaluate_badges<S>(store: &S, profile: &Profile, at: DateTime<Utc>) -> EngineResult<Vec<Badge>>
where
    S: BadgeStore + LessonCatalog + ProgressStore + ?Sized,
{
    let catalog = store.list_badges()?;
    let owned_badges = store.list_user_badges(&profile.user_id)?;
    let owned: HashSet<&str> = owned_badges.iter().map(|b| b.badge_id.as_str()).collect();

    if catalog.iter().all(|b| owned.contains(b.id.as_str())) {
        return Ok(Vec::new());
    }

    let history = store.list_progress(&profile.user_id)?;
    let lesson_counts = store.lesson_counts()?;
    let ctx = BadgeContext {
        profile,
        history: &history,
        lesson_counts: &lesson_counts,
    };

    let mut granted = Vec::new();
    for badge in newly_earned(&catalog, &owned, &ctx) {
        match store.grant_badge(&profile.user_id, &badge.id, at) {
            Ok(true) => {
                tracing::info!(user = %profile.user_id, badge = %badge.id, "badge earned");
                granted.push(badge.clone());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(user = %profile.user_id, badge = %badge.id, error = %e, "failed to grant badge");
            }
        }
    }
    Ok(granted)
}
