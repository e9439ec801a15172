//! Runtime configuration for the CLI.
//!
//! Values come from flags or their `HABIT_TRACKER_*` environment variables;
//! anything unset falls back to the per-user data directory.

use habit_core::default_log_level;
use std::error::Error;
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "habits.sqlite3";

pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    pub fn resolve(
        db: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self, Box<dyn Error>> {
        let db_path = match db {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        if let Some(parent) = db_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            db_path,
            log_dir: log_dir.map(|dir| absolutize(&dir)).transpose()?,
            log_level: log_level.unwrap_or_else(|| default_log_level().to_string()),
        })
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<(), Box<dyn Error>> {
        if let Some(dir) = &self.log_dir {
            habit_core::init_logging(&self.log_level, dir)?;
        }
        Ok(())
    }
}

/// Returns `~/.config/habit-tracker[-dev]/`.
///
/// Set `HABIT_TRACKER_ENV=dev` to use the development directory.
pub fn data_dir() -> Result<PathBuf, Box<dyn Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABIT_TRACKER_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("habit-tracker-dev")
    } else {
        base_dir.join("habit-tracker")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn absolutize(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
