//! Storage interfaces consumed by the engine
//!
//! The engine only talks to these traits. [`SqliteStore`] implements all of them
//! on a single SQLite database (`~/.bugdojo/bugdojo.db` by default).
//!
//! # Usage
//!
//! ```ignore
//! let store = SqliteStore::open(&path)?;
//! store.ensure_default_badges()?;
//! store.import_catalog(&catalog)?;
//!
//! let engine = Engine::new(store, EngineSettings::default());
//! ```

mod badges;
mod catalog;
mod db;
mod lessons;
mod profiles;
mod progress;

pub use catalog::{CatalogFile, ImportSummary};
pub use db::SqliteStore;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{Badge, Language, Lesson, Profile, ProgressEntry, ProgressRecord, UpsertOutcome, UserBadge};
use crate::error::EngineResult;

/// Read-only view of the lesson catalog
pub trait LessonCatalog: Send + Sync {
    /// Lessons of one language ordered by position
    fn list_lessons(&self, language: Language) -> EngineResult<Vec<Lesson>>;

    fn get_lesson(&self, lesson_id: &str) -> EngineResult<Option<Lesson>>;

    /// Number of lessons per language; languages without lessons are absent
    fn lesson_counts(&self) -> EngineResult<BTreeMap<Language, u64>>;
}

/// Profile aggregates with optimistic concurrency
pub trait ProfileStore: Send + Sync {
    fn get_profile(&self, user_id: &str) -> EngineResult<Option<Profile>>;

    /// Create the profile if missing and return the stored one
    fn create_profile(
        &self,
        user_id: &str,
        display_name: &str,
        created_at: DateTime<Utc>,
    ) -> EngineResult<Profile>;

    /// Replace `current` with `next` iff the stored version still equals
    /// `current.version`. Returns false when another writer got there first.
    fn compare_and_swap(&self, current: &Profile, next: &Profile) -> EngineResult<bool>;

    fn list_profiles(&self) -> EngineResult<Vec<Profile>>;
}

/// Completion history
pub trait ProgressStore: Send + Sync {
    /// Insert or overwrite the record for (user, lesson)
    fn upsert_progress(&self, record: &ProgressRecord) -> EngineResult<UpsertOutcome>;

    /// Flag the (user, lesson) record as counted towards the profile.
    /// Overwriting the record keeps the flag.
    fn mark_scored(&self, user_id: &str, lesson_id: &str) -> EngineResult<()>;

    /// All records of a user joined with lesson metadata, oldest first
    fn list_progress(&self, user_id: &str) -> EngineResult<Vec<ProgressEntry>>;
}

/// Badge catalog and grants
pub trait BadgeStore: Send + Sync {
    fn list_badges(&self) -> EngineResult<Vec<Badge>>;

    fn list_user_badges(&self, user_id: &str) -> EngineResult<Vec<UserBadge>>;

    /// Idempotent. Returns true only when the grant was newly created.
    fn grant_badge(&self, user_id: &str, badge_id: &str, at: DateTime<Utc>) -> EngineResult<bool>;
}

/// Everything the engine needs from persistence
pub trait Store: LessonCatalog + ProfileStore + ProgressStore + BadgeStore {}

impl<T> Store for T where T: LessonCatalog + ProfileStore + ProgressStore + BadgeStore {}
