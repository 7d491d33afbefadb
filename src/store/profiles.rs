//! Profile queries

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

use super::db::{SqliteStore, day_from_sql, day_to_sql, from_millis, to_millis};
use super::ProfileStore;
use crate::domain::Profile;
use crate::error::{EngineError, EngineResult};

const PROFILE_COLUMNS: &str = "user_id, display_name, total_lessons_completed, total_points, \
     current_streak, best_streak, last_activity_day, created_at, version";

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        total_lessons_completed: row.get(2)?,
        total_points: row.get(3)?,
        current_streak: row.get(4)?,
        best_streak: row.get(5)?,
        last_activity_day: day_from_sql(6, row.get(6)?)?,
        created_at: from_millis(7, row.get(7)?)?,
        version: row.get(8)?,
    })
}

impl ProfileStore for SqliteStore {
    fn get_profile(&self, user_id: &str) -> EngineResult<Option<Profile>> {
        let conn = self.conn()?;
        let profile = conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
                [user_id],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    fn create_profile(
        &self,
        user_id: &str,
        display_name: &str,
        created_at: DateTime<Utc>,
    ) -> EngineResult<Profile> {
        if user_id.trim().is_empty() {
            return Err(EngineError::Validation("User id must not be empty".to_string()));
        }

        let conn = self.conn()?;
        let created = conn.execute(
            "INSERT OR IGNORE INTO profiles (user_id, display_name, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id, display_name, to_millis(created_at)],
        )? == 1;
        if created {
            tracing::info!(user = user_id, "profile created");
        }

        let profile = conn.query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
            [user_id],
            profile_from_row,
        )?;
        Ok(profile)
    }

    fn compare_and_swap(&self, current: &Profile, next: &Profile) -> EngineResult<bool> {
        if current.user_id != next.user_id {
            return Err(EngineError::Validation(format!(
                "Cannot swap profile {} with {}",
                current.user_id, next.user_id
            )));
        }
        if next.current_streak > next.best_streak {
            return Err(EngineError::Validation(format!(
                "Streak {} exceeds best streak {} for {}",
                next.current_streak, next.best_streak, next.user_id
            )));
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"UPDATE profiles SET
                   display_name = ?1, total_lessons_completed = ?2, total_points = ?3,
                   current_streak = ?4, best_streak = ?5, last_activity_day = ?6,
                   version = version + 1
               WHERE user_id = ?7 AND version = ?8"#,
            rusqlite::params![
                next.display_name, next.total_lessons_completed, next.total_points,
                next.current_streak, next.best_streak, day_to_sql(next.last_activity_day),
                current.user_id, current.version,
            ],
        )?;
        Ok(updated == 1)
    }

    fn list_profiles(&self) -> EngineResult<Vec<Profile>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at ASC, user_id ASC"
        ))?;
        let profiles = stmt
            .query_map([], profile_from_row)?
            .collect::<rusqlite::Result<Vec<Profile>>>()?;
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_create_profile_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.create_profile("ada", "Ada", at(1)).unwrap();
        let second = store.create_profile("ada", "Someone else", at(2)).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.display_name, "Ada");
        assert_eq!(second.created_at, at(1));
        assert_eq!(store.list_profiles().unwrap().len(), 1);
    }

    #[test]
    fn test_compare_and_swap() {
        let store = SqliteStore::open_in_memory().unwrap();
        let current = store.create_profile("ada", "Ada", at(1)).unwrap();

        let mut next = current.clone();
        next.total_points = 30;
        next.total_lessons_completed = 1;
        next.current_streak = 1;
        next.best_streak = 1;
        next.last_activity_day = NaiveDate::from_ymd_opt(2026, 1, 10);
        assert!(store.compare_and_swap(&current, &next).unwrap());

        let stored = store.get_profile("ada").unwrap().unwrap();
        assert_eq!(stored.total_points, 30);
        assert_eq!(stored.version, current.version + 1);
        assert_eq!(stored.last_activity_day, NaiveDate::from_ymd_opt(2026, 1, 10));

        // Stale version loses
        assert!(!store.compare_and_swap(&current, &next).unwrap());
        assert_eq!(store.get_profile("ada").unwrap().unwrap().total_points, 30);
    }

    #[test]
    fn test_swap_rejects_broken_streak_invariant() {
        let store = SqliteStore::open_in_memory().unwrap();
        let current = store.create_profile("ada", "Ada", at(1)).unwrap();
        let mut next = current.clone();
        next.current_streak = 3;
        next.best_streak = 2;
        assert!(matches!(
            store.compare_and_swap(&current, &next),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_profile() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_profile("ghost").unwrap().is_none());
    }
}
