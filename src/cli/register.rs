//! Register command implementation

use anyhow::Result;
use chrono::Utc;

use super::Paths;

pub fn register_command(paths: &Paths, user: &str, display_name: &str) -> Result<()> {
    let engine = paths.open_engine()?;
    let profile = engine.register(user, display_name, Utc::now())?;

    println!(
        "{} ({}): {} points, {} lessons completed",
        profile.display_name, profile.user_id, profile.total_points, profile.total_lessons_completed
    );
    Ok(())
}
