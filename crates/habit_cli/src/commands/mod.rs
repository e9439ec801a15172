use crate::config::AppConfig;
use chrono::{Local, NaiveDate};
use habit_core::db::open_db;
use habit_core::{DashboardService, HabitService, RepoResult, SqliteHabitRepository};
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;

pub mod checkins;
pub mod habits;

/// Per-invocation state shared by all commands.
pub struct Context {
    conn: Connection,
    json: bool,
}

impl Context {
    pub fn open(app: &AppConfig, json: bool) -> Result<Self, Box<dyn Error>> {
        let conn = open_db(&app.db_path)?;
        Ok(Self { conn, json })
    }

    pub fn habits(&self) -> RepoResult<HabitService<SqliteHabitRepository<'_>>> {
        Ok(HabitService::new(SqliteHabitRepository::try_new(&self.conn)?))
    }

    pub fn dashboard(&self) -> RepoResult<DashboardService<SqliteHabitRepository<'_>>> {
        Ok(DashboardService::new(SqliteHabitRepository::try_new(
            &self.conn,
        )?))
    }

    pub fn json(&self) -> bool {
        self.json
    }

    /// The host's local calendar date.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
