//! Lessons command implementation

use anyhow::{Result, bail};

use bugdojo::Language;

use super::Paths;

pub fn lessons_command(paths: &Paths, language: &str) -> Result<()> {
    let Some(language) = Language::parse(language) else {
        let known: Vec<_> = Language::all().iter().map(|l| l.as_str()).collect();
        bail!("Unknown language: {} (expected one of: {})", language, known.join(", "));
    };

    let engine = paths.open_engine()?;
    let lessons = engine.lessons(language)?;

    if lessons.is_empty() {
        println!("No {} lessons yet.", language);
        return Ok(());
    }

    println!("{} lessons ({}):\n", language, lessons.len());
    for lesson in lessons {
        println!(
            "  {:>3}. [{}] {} - {} ({} pts)",
            lesson.position, lesson.difficulty, lesson.id, lesson.title, lesson.points
        );
        if !lesson.hints.is_empty() {
            println!("       {} hint(s)", lesson.hints.len());
        }
    }
    Ok(())
}
