//! Command-line front end for the habit tracker.
//!
//! # Responsibility
//! - Parse user commands and global configuration.
//! - Supply "today" from the local clock; the core never reads it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "habit", version, about = "Track daily habits and streaks")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "HABIT_TRACKER_DB")]
    db: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "HABIT_TRACKER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "HABIT_TRACKER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a habit
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List habits with their current streak
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Show one habit with its last 30 days
    Show { id: uuid::Uuid },
    /// Check in or undo a check-in (defaults to today)
    Toggle {
        id: uuid::Uuid,
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
    /// Hide a habit from the list, keeping its history
    Archive { id: uuid::Uuid },
    /// Delete a habit and all of its check-ins
    Delete { id: uuid::Uuid },
    /// Print check-in dates in a range (defaults to the last 30 days)
    History {
        id: uuid::Uuid,
        #[arg(long)]
        from: Option<chrono::NaiveDate>,
        #[arg(long)]
        to: Option<chrono::NaiveDate>,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = config::AppConfig::resolve(cli.db, cli.log_dir, cli.log_level)
        .and_then(|app| {
            app.init_logging()?;
            let ctx = commands::Context::open(&app, cli.json)?;
            run(&ctx, cli.command)
        });

    if let Err(e) = result {
        log::error!("event=cli_exit module=cli status=error error={e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(ctx: &commands::Context, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Add { name, description } => {
            commands::habits::add(ctx, &name, description.as_deref())
        }
        Commands::List { all } => commands::habits::list(ctx, all),
        Commands::Show { id } => commands::habits::show(ctx, id),
        Commands::Archive { id } => commands::habits::archive(ctx, id),
        Commands::Delete { id } => commands::habits::delete(ctx, id),
        Commands::Toggle { id, date } => commands::checkins::toggle(ctx, id, date),
        Commands::History { id, from, to } => commands::checkins::history(ctx, id, from, to),
    }
}
