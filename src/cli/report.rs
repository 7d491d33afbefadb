//! Leaderboard, stats and badges commands

use anyhow::Result;
use chrono::Utc;

use bugdojo::stats::format_day;

use super::Paths;

pub fn leaderboard_command(paths: &Paths, limit: Option<usize>, json: bool) -> Result<()> {
    let engine = paths.open_engine()?;
    let entries = engine.leaderboard(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No players yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:>4}. {:<24} {:>7} pts  {:>4} solved",
            entry.rank, entry.display_name, entry.points, entry.completions
        );
    }
    Ok(())
}

pub fn stats_command(paths: &Paths, user: &str, json: bool) -> Result<()> {
    let engine = paths.open_engine()?;
    let stats = engine.user_stats(user, Utc::now().date_naive())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Stats for {}\n", stats.user_id);
    println!("  Completed:     {}", stats.total_completions);
    println!("  Avg attempts:  {:.1}", stats.average_attempts);
    println!("  Avg hints:     {:.1}", stats.average_hints);
    println!(
        "  Streak:        {} (best {}){}",
        stats.current_streak,
        stats.best_streak,
        if stats.streak_active { "" } else { ", inactive" }
    );

    if !stats.by_language.is_empty() {
        println!("\n  By language:");
        for (language, count) in &stats.by_language {
            println!("    {:<12} {}", language.as_str(), count);
        }
    }

    if !stats.by_difficulty.is_empty() {
        println!("\n  By difficulty:");
        for (difficulty, count) in &stats.by_difficulty {
            println!("    {:<12} {}", difficulty.as_str(), count);
        }
    }

    if !stats.daily.is_empty() {
        println!("\n  Recent days:");
        for day in &stats.daily {
            println!("    {}  {}", format_day(day.day), day.completions);
        }
    }
    Ok(())
}

pub fn badges_command(paths: &Paths, user: &str) -> Result<()> {
    let engine = paths.open_engine()?;
    let badges = engine.user_badges(user)?;

    if badges.is_empty() {
        println!("No badges yet.");
        return Ok(());
    }

    for earned in badges {
        println!(
            "{} {} - {} (earned {})",
            earned.badge.icon,
            earned.badge.name,
            earned.badge.description,
            format_day(earned.earned_at.date_naive())
        );
    }
    Ok(())
}
