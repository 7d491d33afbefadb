use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use bugdojo::EngineError;

mod cli;

#[derive(Parser)]
#[command(name = "bugdojo")]
#[command(about = "Learn to debug - fix broken programs, earn points, streaks and badges")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to .bugdojo/config.toml, then ~/.bugdojo/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides [database] path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, install the built-in badges and optionally import a catalog
    Init {
        /// TOML file with [[lesson]] and [[badge]] entries
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Create a user profile
    Register {
        user: String,
        display_name: String,
    },

    /// List the lessons of a language track
    Lessons {
        /// python, javascript, typescript, java, cpp, go or rust
        language: String,
    },

    /// Submit program output for a lesson, one attempt per --output
    Submit {
        user: String,
        lesson: String,

        #[arg(long = "output", required = true, num_args = 1..)]
        outputs: Vec<String>,
    },

    /// Show one hint of a lesson
    Hint {
        lesson: String,
        index: usize,
    },

    /// Show the global ranking
    Leaderboard {
        /// Number of entries (defaults to [leaderboard] default_limit)
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show a user's statistics
    Stats {
        user: String,

        #[arg(long)]
        json: bool,
    },

    /// List the badges a user has earned
    Badges {
        user: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = cli::Paths {
        config: cli.config,
        db: cli.db,
    };

    match cli.command {
        Commands::Init { catalog } => cli::init::init_command(&paths, catalog.as_deref()),
        Commands::Register { user, display_name } => {
            cli::register::register_command(&paths, &user, &display_name)
        }
        Commands::Lessons { language } => cli::lessons::lessons_command(&paths, &language),
        Commands::Submit {
            user,
            lesson,
            outputs,
        } => cli::play::submit_command(&paths, &user, &lesson, &outputs),
        Commands::Hint { lesson, index } => cli::play::hint_command(&paths, &lesson, index),
        Commands::Leaderboard { limit, json } => {
            cli::report::leaderboard_command(&paths, limit, json)
        }
        Commands::Stats { user, json } => cli::report::stats_command(&paths, &user, json),
        Commands::Badges { user } => cli::report::badges_command(&paths, &user),
    }
}

/// Engine errors are shown with their user-facing text; the detail goes to the log
fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<EngineError>() {
        Some(engine_err) => {
            tracing::debug!("command failed: {err:#}");
            eprintln!("Error: {}", engine_err.user_message());
        }
        None => eprintln!("Error: {err:#}"),
    }
}
