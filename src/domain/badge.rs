use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Predicate family a badge is checked with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    /// At least one completed lesson
    FirstDebug,
    /// Current streak >= requirement
    ConsecutiveSolves,
    /// Every lesson of some language track completed
    LanguageMaster,
    /// Some completion took <= requirement seconds
    SpeedDemon,
    /// Hint-free completions >= requirement
    AccuracyAce,
}

impl BadgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstDebug => "first_debug",
            Self::ConsecutiveSolves => "consecutive_solves",
            Self::LanguageMaster => "language_master",
            Self::SpeedDemon => "speed_demon",
            Self::AccuracyAce => "accuracy_ace",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first_debug" => Some(Self::FirstDebug),
            "consecutive_solves" => Some(Self::ConsecutiveSolves),
            "language_master" => Some(Self::LanguageMaster),
            "speed_demon" => Some(Self::SpeedDemon),
            "accuracy_ace" => Some(Self::AccuracyAce),
            _ => None,
        }
    }
}

impl std::fmt::Display for BadgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog entry describing an earnable badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub badge_type: BadgeType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Threshold whose meaning depends on `badge_type`
    #[serde(default)]
    pub requirement_value: u32,
}

/// A badge a user has earned. Never revoked, never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBadge {
    pub user_id: String,
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
}
