//! Submit and hint commands

use anyhow::{Result, bail};
use chrono::Utc;

use bugdojo::SubmissionOutcome;

use super::Paths;

/// Replay `outputs` as consecutive attempts in one session, stopping at the
/// first one that passes.
pub fn submit_command(paths: &Paths, user: &str, lesson_id: &str, outputs: &[String]) -> Result<()> {
    let engine = paths.open_engine()?;
    let mut session = engine.start_session(user, lesson_id, Utc::now())?;

    for output in outputs {
        let report = engine.submit(&mut session, output, Utc::now())?;
        tracing::debug!(session = %session.id(), attempts = report.outcome.attempts(), "submission evaluated");
        println!("{}", report.outcome);

        if let SubmissionOutcome::Failed {
            revealed_hint: Some(index),
            ..
        } = &report.outcome
        {
            if let Some(hint) = session.lesson().hint(*index) {
                println!("  Hint: {}", hint);
            }
        }

        if !report.outcome.is_completed() {
            continue;
        }

        match &report.scoring {
            Some(scoring) => println!(
                "  +{} points (total {}), streak {}",
                scoring.points_awarded, scoring.profile.total_points, scoring.profile.current_streak
            ),
            None => println!("  Already completed before, no points awarded"),
        }
        for badge in &report.new_badges {
            println!("  Badge earned: {} {}", badge.icon, badge.name);
        }
        return Ok(());
    }

    println!("Lesson not solved after {} attempt(s).", session.attempts());
    Ok(())
}

pub fn hint_command(paths: &Paths, lesson_id: &str, index: usize) -> Result<()> {
    let engine = paths.open_engine()?;
    let lesson = engine.lesson(lesson_id)?;

    let Some(hint) = lesson.hint(index) else {
        bail!("Lesson {} has {} hint(s), no hint #{}", lesson.id, lesson.hints.len(), index);
    };
    println!("{}", hint);
    Ok(())
}
