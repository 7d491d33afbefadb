//! Completion history queries

use rusqlite::{OptionalExtension, Row};

use super::db::{SqliteStore, from_millis, parse_text, to_millis};
use super::ProgressStore;
use crate::domain::{Difficulty, Language, ProgressEntry, ProgressRecord, UpsertOutcome};
use crate::error::{EngineError, EngineResult};

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<ProgressEntry> {
    let language: String = row.get(6)?;
    let difficulty: String = row.get(7)?;
    Ok(ProgressEntry {
        record: ProgressRecord {
            user_id: row.get(0)?,
            lesson_id: row.get(1)?,
            completed_at: from_millis(2, row.get(2)?)?,
            attempts: row.get(3)?,
            hints_used: row.get(4)?,
            time_taken_secs: row.get(5)?,
        },
        language: parse_text(6, &language, Language::parse)?,
        difficulty: parse_text(7, &difficulty, Difficulty::parse)?,
        points: row.get(8)?,
    })
}

impl ProgressStore for SqliteStore {
    fn upsert_progress(&self, record: &ProgressRecord) -> EngineResult<UpsertOutcome> {
        if record.attempts == 0 {
            return Err(EngineError::Validation(
                "A completion needs at least one attempt".to_string(),
            ));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let lesson_exists = tx
            .prepare("SELECT 1 FROM lessons WHERE id = ?1")?
            .exists([&record.lesson_id])?;
        if !lesson_exists {
            return Err(EngineError::lesson_not_found(&record.lesson_id));
        }

        let scored: Option<bool> = tx
            .query_row(
                "SELECT scored FROM progress WHERE user_id = ?1 AND lesson_id = ?2",
                [&record.user_id, &record.lesson_id],
                |r| r.get(0),
            )
            .optional()?;

        tx.execute(
            r#"INSERT INTO progress
               (user_id, lesson_id, completed_at, attempts, hints_used, time_taken_secs)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)
               ON CONFLICT(user_id, lesson_id) DO UPDATE SET
                   completed_at = ?3, attempts = ?4, hints_used = ?5, time_taken_secs = ?6"#,
            rusqlite::params![
                record.user_id, record.lesson_id, to_millis(record.completed_at),
                record.attempts, record.hints_used, record.time_taken_secs,
            ],
        )?;
        tx.commit()?;

        let outcome = match scored {
            None => UpsertOutcome::Inserted,
            Some(true) => UpsertOutcome::Replaced,
            Some(false) => UpsertOutcome::Unscored,
        };
        tracing::debug!(user = %record.user_id, lesson = %record.lesson_id, ?outcome, "progress recorded");
        Ok(outcome)
    }

    fn mark_scored(&self, user_id: &str, lesson_id: &str) -> EngineResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE progress SET scored = 1 WHERE user_id = ?1 AND lesson_id = ?2",
            [user_id, lesson_id],
        )?;
        Ok(())
    }

    fn list_progress(&self, user_id: &str) -> EngineResult<Vec<ProgressEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.user_id, p.lesson_id, p.completed_at, p.attempts, p.hints_used,
                    p.time_taken_secs, l.language, l.difficulty, l.points
             FROM progress p
             JOIN lessons l ON l.id = p.lesson_id
             WHERE p.user_id = ?1
             ORDER BY p.completed_at ASC, p.lesson_id ASC",
        )?;
        let entries = stmt
            .query_map([user_id], entry_from_row)?
            .collect::<rusqlite::Result<Vec<ProgressEntry>>>()?;
        Ok(entries)
    }
}
