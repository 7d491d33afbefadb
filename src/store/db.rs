//! SQLite connection and schema management
//!
//! Manages the `~/.bugdojo/bugdojo.db` database. The schema is created on open
//! and versioned through `schema_version`.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use rusqlite::types::Type;

use crate::error::{EngineError, EngineResult};
use crate::stats::time_bucket::{format_day, parse_day_bucket};

pub(crate) const SCHEMA_VERSION: i32 = 2;

/// All engine stores on one SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::from_connection(conn)
    }

    /// Throwaway database, mostly for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize schema")?;
        run_migrations(&conn).context("Failed to migrate schema")?;

        tracing::debug!("bugdojo database ready (schema v{SCHEMA_VERSION})");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the connection. A poisoned lock is reported as a store failure.
    pub(crate) fn conn(&self) -> EngineResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| EngineError::StoreUnavailable("database lock poisoned".to_string()))
    }

    pub fn schema_version(&self) -> EngineResult<i32> {
        let conn = self.conn()?;
        let version = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )?;
        Ok(version)
    }
}

fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    // Migration 2: track whether a stored completion was scored
    if version < 2 {
        let has_scored: bool = conn
            .prepare("SELECT COUNT(*) FROM pragma_table_info('progress') WHERE name = 'scored'")?
            .query_row([], |r| r.get::<_, i32>(0))
            .map(|c| c > 0)?;

        if !has_scored {
            // v1 only stored completions that went on to be scored
            conn.execute_batch(
                "ALTER TABLE progress ADD COLUMN scored INTEGER NOT NULL DEFAULT 0;
                 UPDATE progress SET scored = 1;",
            )?;
        }
        conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
    }

    Ok(())
}

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

pub(crate) fn day_to_sql(day: Option<NaiveDate>) -> Option<String> {
    day.map(format_day)
}

pub(crate) fn day_from_sql(idx: usize, value: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    value
        .map(|s| parse_text(idx, &s, parse_day_bucket))
        .transpose()
}

/// Parse an enum stored as text
pub(crate) fn parse_text<T>(idx: usize, value: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected value '{value}'").into(),
        )
    })
}

/// SQL schema for the engine database
const SCHEMA_SQL: &str = r#"
-- Lesson catalog (read-only to the engine)
CREATE TABLE IF NOT EXISTS lessons (
    id TEXT PRIMARY KEY,
    language TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    starter_code TEXT NOT NULL DEFAULT '',
    expected_output TEXT NOT NULL,
    points INTEGER NOT NULL CHECK (points > 0),
    position INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_lessons_language ON lessons(language, position);

-- Ordered hints per lesson
CREATE TABLE IF NOT EXISTS lesson_hints (
    lesson_id TEXT NOT NULL REFERENCES lessons(id) ON DELETE CASCADE,
    idx INTEGER NOT NULL,
    hint TEXT NOT NULL,
    PRIMARY KEY (lesson_id, idx)
);

-- One profile per user; version guards compare-and-swap updates
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    total_lessons_completed INTEGER NOT NULL DEFAULT 0,
    total_points INTEGER NOT NULL DEFAULT 0,
    current_streak INTEGER NOT NULL DEFAULT 0,
    best_streak INTEGER NOT NULL DEFAULT 0,
    last_activity_day TEXT,
    created_at INTEGER NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    CHECK (current_streak <= best_streak)
);
CREATE INDEX IF NOT EXISTS idx_profiles_ranking ON profiles(total_points DESC, created_at ASC);

-- At most one completion per (user, lesson). Users live in the auth service,
-- so user_id is not a foreign key.
CREATE TABLE IF NOT EXISTS progress (
    user_id TEXT NOT NULL,
    lesson_id TEXT NOT NULL REFERENCES lessons(id),
    completed_at INTEGER NOT NULL,
    attempts INTEGER NOT NULL CHECK (attempts >= 1),
    hints_used INTEGER NOT NULL DEFAULT 0,
    time_taken_secs INTEGER,
    scored INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, lesson_id)
);
CREATE INDEX IF NOT EXISTS idx_progress_completed_at ON progress(user_id, completed_at);

-- Badge catalog
CREATE TABLE IF NOT EXISTS badges (
    id TEXT PRIMARY KEY,
    badge_type TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    icon TEXT NOT NULL DEFAULT '',
    requirement_value INTEGER NOT NULL DEFAULT 0
);

-- Earned badges
CREATE TABLE IF NOT EXISTS user_badges (
    user_id TEXT NOT NULL,
    badge_id TEXT NOT NULL REFERENCES badges(id),
    earned_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, badge_id)
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
"#;
