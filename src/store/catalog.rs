//! TOML catalog import
//!
//! A catalog file lists lessons and extra badges:
//!
//! ```toml
//! [[lesson]]
//! id = "py-range-01"
//! language = "python"
//! difficulty = "easy"
//! title = "Count to five"
//! starter_code = "for i in range(1, 5):\n    print(i)"
//! expected_output = "1\n2\n3\n4\n5"
//! hints = ["range() excludes its upper bound"]
//! points = 10
//! position = 1
//!
//! [[badge]]
//! id = "streak_30"
//! badge_type = "consecutive_solves"
//! name = "Unstoppable"
//! requirement_value = 30
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::db::SqliteStore;
use crate::domain::{Badge, Lesson};
use crate::error::EngineResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default, rename = "lesson")]
    pub lessons: Vec<Lesson>,

    #[serde(default, rename = "badge")]
    pub badges: Vec<Badge>,
}

/// Counts of newly added catalog entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub lessons_added: usize,
    pub badges_added: usize,
}

impl CatalogFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl SqliteStore {
    /// Add every lesson and badge of `catalog` that is not stored yet
    pub fn import_catalog(&self, catalog: &CatalogFile) -> EngineResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for lesson in &catalog.lessons {
            if self.insert_lesson(lesson)? {
                summary.lessons_added += 1;
            }
        }
        for badge in &catalog.badges {
            if self.insert_badge(badge)? {
                summary.badges_added += 1;
            }
        }
        tracing::info!(
            lessons = summary.lessons_added,
            badges = summary.badges_added,
            "catalog imported"
        );
        Ok(summary)
    }
}
