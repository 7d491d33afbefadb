//! Settings sections of `config.toml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scoring::{RescorePolicy, ScoringRules, StreakMode};
use crate::session::DEFAULT_AUTO_HINT_ATTEMPT;
use crate::stats::DEFAULT_LEADERBOARD_LIMIT;

/// `[database]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `~/` is expanded; unset means `~/.bugdojo/bugdojo.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// `[scoring]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Whether repeat completions of a lesson award points again
    #[serde(default)]
    pub rescore: RescorePolicy,

    #[serde(default)]
    pub streak_mode: StreakMode,

    /// Profile update attempts before a concurrent change is reported
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: u32,
}

/// `[session]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Failed attempt number that reveals the first hint. 0 disables it.
    #[serde(default = "default_auto_hint_attempt")]
    pub auto_hint_attempt: u32,
}

/// `[leaderboard]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_conflict_retries() -> u32 {
    ScoringRules::default().conflict_retries
}

fn default_auto_hint_attempt() -> u32 {
    DEFAULT_AUTO_HINT_ATTEMPT
}

fn default_limit() -> usize {
    DEFAULT_LEADERBOARD_LIMIT
}

impl ScoringSettings {
    pub fn rules(&self) -> ScoringRules {
        ScoringRules {
            streak_mode: self.streak_mode,
            conflict_retries: self.conflict_retries,
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            rescore: RescorePolicy::default(),
            streak_mode: StreakMode::default(),
            conflict_retries: default_conflict_retries(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auto_hint_attempt: default_auto_hint_attempt(),
        }
    }
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}
