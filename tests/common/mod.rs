//! Shared test utilities for engine integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use bugdojo::store::{BadgeStore, LessonCatalog, ProfileStore, ProgressStore};
use bugdojo::{
    Badge, Difficulty, Engine, EngineError, EngineResult, EngineSettings, Language, Lesson, Profile,
    ProgressEntry, ProgressRecord, SqliteStore, UpsertOutcome, UserBadge,
};

/// A store on a fresh database file, with the built-in badges installed
pub fn create_test_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::open(&temp_dir.path().join("bugdojo.db")).expect("Failed to open store");
    store
        .ensure_default_badges()
        .expect("Failed to install default badges");
    (temp_dir, store)
}

pub fn create_test_engine(settings: EngineSettings) -> (TempDir, Engine<SqliteStore>) {
    let (temp_dir, store) = create_test_store();
    (temp_dir, Engine::new(store, settings))
}

pub fn lesson(id: &str, language: Language, difficulty: Difficulty, expected_output: &str, hints: &[&str], points: u32, position: u32) -> Lesson {
    Lesson {
        id: id.to_string(),
        language,
        difficulty,
        title: format!("Fix {id}"),
        description: String::new(),
        starter_code: String::new(),
        expected_output: expected_output.to_string(),
        hints: hints.iter().map(|h| h.to_string()).collect(),
        points,
        position,
    }
}

/// The counting lesson: prints 1 to 5, one hint, worth 10 points
pub fn count_lesson() -> Lesson {
    lesson(
        "py-count",
        Language::Python,
        Difficulty::Easy,
        "1\n2\n3\n4\n5",
        &["range() excludes its upper bound"],
        10,
        1,
    )
}

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, day, hour, minute, 0).unwrap()
}

/// Failures injected by [`FaultyStore`]
#[derive(Debug, Default)]
pub struct Faults {
    /// Profile swaps that lose against a concurrent writer
    pub lost_swaps: u32,
    pub badge_catalog_down: bool,
    /// Badge id whose grant fails
    pub failing_grant: Option<String>,
}

/// A real store with injectable failures
pub struct FaultyStore {
    inner: SqliteStore,
    pub faults: Mutex<Faults>,
}

impl FaultyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            faults: Mutex::new(Faults::default()),
        }
    }

    pub fn inner(&self) -> &SqliteStore {
        &self.inner
    }

    pub fn set(&self, update: impl FnOnce(&mut Faults)) {
        update(&mut self.faults.lock().unwrap());
    }
}

pub fn create_faulty_engine(settings: EngineSettings) -> (TempDir, Engine<FaultyStore>) {
    let (temp_dir, store) = create_test_store();
    (temp_dir, Engine::new(FaultyStore::new(store), settings))
}

impl LessonCatalog for FaultyStore {
    fn list_lessons(&self, language: Language) -> EngineResult<Vec<Lesson>> {
        self.inner.list_lessons(language)
    }

    fn get_lesson(&self, lesson_id: &str) -> EngineResult<Option<Lesson>> {
        self.inner.get_lesson(lesson_id)
    }

    fn lesson_counts(&self) -> EngineResult<BTreeMap<Language, u64>> {
        self.inner.lesson_counts()
    }
}

impl ProfileStore for FaultyStore {
    fn get_profile(&self, user_id: &str) -> EngineResult<Option<Profile>> {
        self.inner.get_profile(user_id)
    }

    fn create_profile(&self, user_id: &str, display_name: &str, created_at: DateTime<Utc>) -> EngineResult<Profile> {
        self.inner.create_profile(user_id, display_name, created_at)
    }

    fn compare_and_swap(&self, current: &Profile, next: &Profile) -> EngineResult<bool> {
        let mut faults = self.faults.lock().unwrap();
        if faults.lost_swaps > 0 {
            faults.lost_swaps -= 1;
            return Ok(false);
        }
        self.inner.compare_and_swap(current, next)
    }

    fn list_profiles(&self) -> EngineResult<Vec<Profile>> {
        self.inner.list_profiles()
    }
}

impl ProgressStore for FaultyStore {
    fn upsert_progress(&self, record: &ProgressRecord) -> EngineResult<UpsertOutcome> {
        self.inner.upsert_progress(record)
    }

    fn mark_scored(&self, user_id: &str, lesson_id: &str) -> EngineResult<()> {
        self.inner.mark_scored(user_id, lesson_id)
    }

    fn list_progress(&self, user_id: &str) -> EngineResult<Vec<ProgressEntry>> {
        self.inner.list_progress(user_id)
    }
}

impl BadgeStore for FaultyStore {
    fn list_badges(&self) -> EngineResult<Vec<Badge>> {
        if self.faults.lock().unwrap().badge_catalog_down {
            return Err(EngineError::StoreUnavailable("badge catalog offline".to_string()));
        }
        self.inner.list_badges()
    }

    fn list_user_badges(&self, user_id: &str) -> EngineResult<Vec<UserBadge>> {
        self.inner.list_user_badges(user_id)
    }

    fn grant_badge(&self, user_id: &str, badge_id: &str, at: DateTime<Utc>) -> EngineResult<bool> {
        if self.faults.lock().unwrap().failing_grant.as_deref() == Some(badge_id) {
            return Err(EngineError::StoreUnavailable(format!("cannot write grant {badge_id}")));
        }
        self.inner.grant_badge(user_id, badge_id, at)
    }
}
