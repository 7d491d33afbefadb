//! Leaderboard and per-user statistics
//!
//! Read-only projections over profiles and completion history. Nothing here
//! writes to the store.
//!
//! # Usage
//!
//! ```ignore
//! let top = stats::leaderboard(&store, 10)?;
//! let mine = stats::user_stats(&store, "ana", Utc::now().date_naive())?;
//! ```

mod leaderboard;
pub mod time_bucket;
mod user_stats;

pub use leaderboard::{DEFAULT_LEADERBOARD_LIMIT, LeaderboardEntry, leaderboard, rank_profiles};
pub use time_bucket::{day_bucket, format_day, parse_day_bucket};
pub use user_stats::{DailyCount, RECENT_DAYS, UserStats, compute_user_stats, user_stats};
