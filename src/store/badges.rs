//! Badge catalog and grant queries

use chrono::{DateTime, Utc};
use rusqlite::Row;

use super::db::{SqliteStore, from_millis, parse_text, to_millis};
use super::BadgeStore;
use crate::badges::DEFAULT_BADGES;
use crate::domain::{Badge, BadgeType, UserBadge};
use crate::error::{EngineError, EngineResult};

fn badge_from_row(row: &Row<'_>) -> rusqlite::Result<Badge> {
    let badge_type: String = row.get(1)?;
    Ok(Badge {
        id: row.get(0)?,
        badge_type: parse_text(1, &badge_type, BadgeType::parse)?,
        name: row.get(2)?,
        description: row.get(3)?,
        icon: row.get(4)?,
        requirement_value: row.get(5)?,
    })
}

impl SqliteStore {
    /// Add a badge to the catalog. Returns false if the id already exists.
    pub fn insert_badge(&self, badge: &Badge) -> EngineResult<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"INSERT OR IGNORE INTO badges (id, badge_type, name, description, icon, requirement_value)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            rusqlite::params![
                badge.id, badge.badge_type.as_str(), badge.name, badge.description, badge.icon,
                badge.requirement_value,
            ],
        )? == 1;
        Ok(inserted)
    }

    /// Install the built-in badges that are not in the catalog yet.
    /// Returns how many were added.
    pub fn ensure_default_badges(&self) -> EngineResult<usize> {
        let mut added = 0;
        for def in DEFAULT_BADGES {
            if self.insert_badge(&def.to_badge())? {
                added += 1;
            }
        }
        if added > 0 {
            tracing::info!(added, "default badges installed");
        }
        Ok(added)
    }
}

impl BadgeStore for SqliteStore {
    fn list_badges(&self) -> EngineResult<Vec<Badge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, badge_type, name, description, icon, requirement_value
             FROM badges ORDER BY rowid ASC",
        )?;
        let badges = stmt
            .query_map([], badge_from_row)?
            .collect::<rusqlite::Result<Vec<Badge>>>()?;
        Ok(badges)
    }

    fn list_user_badges(&self, user_id: &str) -> EngineResult<Vec<UserBadge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, badge_id, earned_at FROM user_badges
             WHERE user_id = ?1 ORDER BY earned_at ASC, badge_id ASC",
        )?;
        let badges = stmt
            .query_map([user_id], |row| {
                Ok(UserBadge {
                    user_id: row.get(0)?,
                    badge_id: row.get(1)?,
                    earned_at: from_millis(2, row.get(2)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<UserBadge>>>()?;
        Ok(badges)
    }

    fn grant_badge(&self, user_id: &str, badge_id: &str, at: DateTime<Utc>) -> EngineResult<bool> {
        let conn = self.conn()?;
        let known = conn
            .prepare("SELECT 1 FROM badges WHERE id = ?1")?
            .exists([badge_id])?;
        if !known {
            return Err(EngineError::not_found(crate::error::EntityKind::Badge, badge_id));
        }

        let granted = conn.execute(
            "INSERT OR IGNORE INTO user_badges (user_id, badge_id, earned_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id, badge_id, to_millis(at)],
        )? == 1;
        Ok(granted)
    }
}
