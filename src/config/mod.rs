//! Configuration loading and management

mod io;
mod settings;

pub use settings::{DatabaseSettings, LeaderboardSettings, ScoringSettings, SessionSettings};

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the SQLite database lives
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Points, streak and retry policy
    #[serde(default)]
    pub scoring: ScoringSettings,

    /// Lesson session behaviour
    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
}
