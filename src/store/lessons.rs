//! Lesson catalog queries

use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension, Row};

use super::db::{SqliteStore, parse_text};
use super::LessonCatalog;
use crate::domain::{Difficulty, Language, Lesson};
use crate::error::{EngineError, EngineResult};

const LESSON_COLUMNS: &str =
    "id, language, difficulty, title, description, starter_code, expected_output, points, position";

fn lesson_from_row(row: &Row<'_>) -> rusqlite::Result<Lesson> {
    let language: String = row.get(1)?;
    let difficulty: String = row.get(2)?;
    Ok(Lesson {
        id: row.get(0)?,
        language: parse_text(1, &language, Language::parse)?,
        difficulty: parse_text(2, &difficulty, Difficulty::parse)?,
        title: row.get(3)?,
        description: row.get(4)?,
        starter_code: row.get(5)?,
        expected_output: row.get(6)?,
        hints: Vec::new(),
        points: row.get(7)?,
        position: row.get(8)?,
    })
}

fn load_hints(conn: &Connection, lesson: &mut Lesson) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "SELECT hint FROM lesson_hints WHERE lesson_id = ?1 ORDER BY idx ASC",
    )?;
    lesson.hints = stmt
        .query_map([&lesson.id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(())
}

impl SqliteStore {
    /// Add a lesson to the catalog. Returns false if the id already exists;
    /// existing lessons are never modified.
    pub fn insert_lesson(&self, lesson: &Lesson) -> EngineResult<bool> {
        if lesson.points == 0 {
            return Err(EngineError::Validation(format!(
                "Lesson {} must be worth at least one point",
                lesson.id
            )));
        }
        if lesson.id.trim().is_empty() {
            return Err(EngineError::Validation("Lesson id must not be empty".to_string()));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let inserted = tx.execute(
            r#"INSERT OR IGNORE INTO lessons
               (id, language, difficulty, title, description, starter_code, expected_output, points, position)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            rusqlite::params![
                lesson.id, lesson.language.as_str(), lesson.difficulty.as_str(), lesson.title,
                lesson.description, lesson.starter_code, lesson.expected_output, lesson.points,
                lesson.position,
            ],
        )? == 1;

        if inserted {
            for (idx, hint) in lesson.hints.iter().enumerate() {
                tx.execute(
                    "INSERT INTO lesson_hints (lesson_id, idx, hint) VALUES (?1, ?2, ?3)",
                    rusqlite::params![lesson.id, idx, hint],
                )?;
            }
        }
        tx.commit()?;

        if inserted {
            tracing::debug!(lesson = %lesson.id, language = %lesson.language, "lesson added to catalog");
        }
        Ok(inserted)
    }
}

impl LessonCatalog for SqliteStore {
    fn list_lessons(&self, language: Language) -> EngineResult<Vec<Lesson>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE language = ?1 ORDER BY position ASC, id ASC"
        ))?;
        let mut lessons = stmt
            .query_map([language.as_str()], lesson_from_row)?
            .collect::<rusqlite::Result<Vec<Lesson>>>()?;

        for lesson in &mut lessons {
            load_hints(&conn, lesson)?;
        }
        Ok(lessons)
    }

    fn get_lesson(&self, lesson_id: &str) -> EngineResult<Option<Lesson>> {
        let conn = self.conn()?;
        let lesson = conn
            .query_row(
                &format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ?1"),
                [lesson_id],
                lesson_from_row,
            )
            .optional()?;

        match lesson {
            Some(mut lesson) => {
                load_hints(&conn, &mut lesson)?;
                Ok(Some(lesson))
            }
            None => Ok(None),
        }
    }

    fn lesson_counts(&self) -> EngineResult<BTreeMap<Language, u64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT language, COUNT(*) FROM lessons GROUP BY language")?;
        let rows = stmt.query_map([], |row| {
            let language: String = row.get(0)?;
            Ok((parse_text(0, &language, Language::parse)?, row.get::<_, u64>(1)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<BTreeMap<_, _>>>()?)
    }
}
