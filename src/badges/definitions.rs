//! Built-in badge catalog
//!
//! Installed by `SqliteStore::ensure_default_badges`. Deployments can add more
//! badges through a catalog file.

use crate::domain::{Badge, BadgeType};

/// Static description of a built-in badge
#[derive(Debug, Clone)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub badge_type: BadgeType,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement_value: u32,
}

impl BadgeDefinition {
    pub fn to_badge(&self) -> Badge {
        Badge {
            id: self.id.to_string(),
            badge_type: self.badge_type,
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            requirement_value: self.requirement_value,
        }
    }
}

pub static DEFAULT_BADGES: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: "first_debug",
        badge_type: BadgeType::FirstDebug,
        name: "First Debug",
        description: "Fix your first bug",
        icon: "🐛",
        requirement_value: 1,
    },
    BadgeDefinition {
        id: "streak_5",
        badge_type: BadgeType::ConsecutiveSolves,
        name: "On a Roll",
        description: "Solve 5 challenges in a row",
        icon: "🔥",
        requirement_value: 5,
    },
    BadgeDefinition {
        id: "streak_10",
        badge_type: BadgeType::ConsecutiveSolves,
        name: "Bug Hunter",
        description: "Solve 10 challenges in a row",
        icon: "🏹",
        requirement_value: 10,
    },
    BadgeDefinition {
        id: "language_master",
        badge_type: BadgeType::LanguageMaster,
        name: "Language Master",
        description: "Complete every lesson of a language",
        icon: "🎓",
        requirement_value: 0,
    },
    BadgeDefinition {
        id: "speed_demon",
        badge_type: BadgeType::SpeedDemon,
        name: "Speed Demon",
        description: "Solve a challenge in under a minute",
        icon: "⚡",
        requirement_value: 60,
    },
    BadgeDefinition {
        id: "accuracy_ace",
        badge_type: BadgeType::AccuracyAce,
        name: "Accuracy Ace",
        description: "Solve 10 challenges without hints",
        icon: "🎯",
        requirement_value: 10,
    },
];
