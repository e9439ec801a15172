//! Habit store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `habits` and their owned `checkins`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - At most one check-in row per `(habit_uuid, date)`; the unique constraint
//!   is the final guard, toggles additionally run under `BEGIN IMMEDIATE`.
//! - Deleting a habit removes its check-ins in the same transaction.
//! - Every operation naming a missing habit returns `RepoError::NotFound`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::checkin::{ensure_storable_date, Checkin, CheckinState, DateRange};
use crate::model::habit::{Habit, HabitId, NewHabit, ValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    created_at,
    archived
FROM habits";

const CHECKIN_SELECT_SQL: &str = "SELECT
    id,
    habit_uuid,
    date,
    created_at
FROM checkins
WHERE habit_uuid = ?1
  AND (?2 IS NULL OR date >= ?2)
  AND (?3 IS NULL OR date <= ?3)
ORDER BY date ASC";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for habit store persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before any SQL ran.
    Validation(ValidationError),
    /// Referenced habit does not exist.
    NotFound(HabitId),
    /// A concurrent writer created the same `(habit, date)` check-in first.
    Conflict { habit_id: HabitId, date: NaiveDate },
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "habit not found: {id}"),
            Self::Conflict { habit_id, date } => {
                write!(f, "check-in for habit {habit_id} on {date} already exists")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted habit data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "habit repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "habit repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "habit repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing habits.
#[derive(Debug, Clone, Copy, Default)]
pub struct HabitListQuery {
    pub include_archived: bool,
}

impl HabitListQuery {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            include_archived: true,
        }
    }
}

/// Repository interface for habits and their check-ins.
pub trait HabitRepository {
    /// Persists a new, non-archived habit.
    fn create_habit(&self, habit: &NewHabit) -> RepoResult<HabitId>;
    /// Loads one habit regardless of archive state.
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Lists habits ordered by creation time, oldest first.
    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>>;
    /// Marks a habit archived. Archiving twice is not an error.
    fn archive_habit(&self, id: HabitId) -> RepoResult<()>;
    /// Deletes a habit together with all of its check-ins.
    fn delete_habit(&self, id: HabitId) -> RepoResult<()>;
    /// Removes the check-in for `date` if present, otherwise creates it.
    fn toggle_checkin(&self, id: HabitId, date: NaiveDate) -> RepoResult<CheckinState>;
    /// Forces the check-in for `date` on or off. Idempotent.
    fn set_checkin(&self, id: HabitId, date: NaiveDate, checked: bool)
        -> RepoResult<CheckinState>;
    /// Returns whether `date` has a check-in.
    fn is_checked_in(&self, id: HabitId, date: NaiveDate) -> RepoResult<bool>;
    /// Lists check-in records, ascending by date. `None` means full history.
    fn list_checkins(&self, id: HabitId, range: Option<DateRange>) -> RepoResult<Vec<Checkin>>;
    /// Lists check-in dates, ascending. `None` means full history.
    fn list_checkin_dates(
        &self,
        id: HabitId,
        range: Option<DateRange>,
    ) -> RepoResult<Vec<NaiveDate>> {
        Ok(self
            .list_checkins(id, range)?
            .into_iter()
            .map(|checkin| checkin.date)
            .collect())
    }
    /// Counts all check-ins of one habit.
    fn count_checkins(&self, id: HabitId) -> RepoResult<u64>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_habit_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &NewHabit) -> RepoResult<HabitId> {
        habit.validate()?;

        self.conn.execute(
            "INSERT INTO habits (uuid, name, description, archived)
             VALUES (?1, ?2, ?3, 0);",
            params![
                habit.uuid.to_string(),
                habit.name.as_str(),
                habit.description.as_deref(),
            ],
        )?;

        Ok(habit.uuid)
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }
        Ok(None)
    }

    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE (?1 = 1 OR archived = 0)
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(query.include_archived)])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn archive_habit(&self, id: HabitId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habits SET archived = 1 WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        let habit_uuid = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_habit_exists(&tx, id)?;

        // Explicit so orphans cannot survive on a connection with foreign_keys=OFF.
        tx.execute(
            "DELETE FROM checkins WHERE habit_uuid = ?1;",
            [habit_uuid.as_str()],
        )?;
        tx.execute("DELETE FROM habits WHERE uuid = ?1;", [habit_uuid.as_str()])?;

        tx.commit()?;
        Ok(())
    }

    fn toggle_checkin(&self, id: HabitId, date: NaiveDate) -> RepoResult<CheckinState> {
        let habit_uuid = id.to_string();
        let date_text = date_to_db(date)?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_habit_exists(&tx, id)?;

        let removed = tx.execute(
            "DELETE FROM checkins WHERE habit_uuid = ?1 AND date = ?2;",
            params![habit_uuid, date_text],
        )?;
        let state = if removed > 0 {
            CheckinState::Unchecked
        } else {
            tx.execute(
                "INSERT INTO checkins (habit_uuid, date) VALUES (?1, ?2);",
                params![habit_uuid, date_text],
            )
            .map_err(|err| map_checkin_insert_error(err, id, date))?;
            CheckinState::Checked
        };

        tx.commit()?;
        Ok(state)
    }

    fn set_checkin(
        &self,
        id: HabitId,
        date: NaiveDate,
        checked: bool,
    ) -> RepoResult<CheckinState> {
        let habit_uuid = id.to_string();
        let date_text = date_to_db(date)?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_habit_exists(&tx, id)?;

        if checked {
            tx.execute(
                "INSERT INTO checkins (habit_uuid, date) VALUES (?1, ?2)
                 ON CONFLICT (habit_uuid, date) DO NOTHING;",
                params![habit_uuid, date_text],
            )?;
        } else {
            tx.execute(
                "DELETE FROM checkins WHERE habit_uuid = ?1 AND date = ?2;",
                params![habit_uuid, date_text],
            )?;
        }

        tx.commit()?;
        Ok(CheckinState::from(checked))
    }

    fn is_checked_in(&self, id: HabitId, date: NaiveDate) -> RepoResult<bool> {
        ensure_habit_exists(self.conn, id)?;
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM checkins WHERE habit_uuid = ?1 AND date = ?2
            );",
            params![id.to_string(), date_to_db(date)?],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_checkins(&self, id: HabitId, range: Option<DateRange>) -> RepoResult<Vec<Checkin>> {
        let start = range.map(|value| date_to_db(value.start())).transpose()?;
        let end = range.map(|value| date_to_db(value.end())).transpose()?;
        ensure_habit_exists(self.conn, id)?;

        let mut stmt = self.conn.prepare(&format!("{CHECKIN_SELECT_SQL};"))?;
        let mut rows = stmt.query(params![id.to_string(), start, end])?;
        let mut checkins = Vec::new();
        while let Some(row) = rows.next()? {
            checkins.push(parse_checkin_row(row)?);
        }
        Ok(checkins)
    }

    fn count_checkins(&self, id: HabitId) -> RepoResult<u64> {
        ensure_habit_exists(self.conn, id)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM checkins WHERE habit_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative check-in count `{count}`")))
    }
}

/// Maps a unique-constraint violation on `checkins` to `RepoError::Conflict`.
fn map_checkin_insert_error(err: rusqlite::Error, habit_id: HabitId, date: NaiveDate) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::Conflict { habit_id, date }
        }
        _ => err.into(),
    }
}

fn ensure_habit_exists(conn: &Connection, id: HabitId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM habits WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::NotFound(id))
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "habits.uuid")?;

    let archived = match row.get::<_, i64>("archived")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid archived value `{other}` in habits.archived"
            )));
        }
    };

    Ok(Habit {
        uuid,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        archived,
    })
}

fn parse_checkin_row(row: &Row<'_>) -> RepoResult<Checkin> {
    let uuid_text: String = row.get("habit_uuid")?;
    let date_text: String = row.get("date")?;
    Ok(Checkin {
        id: row.get("id")?,
        habit_uuid: parse_uuid(&uuid_text, "checkins.habit_uuid")?,
        date: parse_date(&date_text)?,
        created_at: row.get("created_at")?,
    })
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<HabitId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date value `{value}` in checkins.date"))
    })
}

/// Formats `date` for the `checkins.date` column.
///
/// Years past 9999 (or before 0) would print with extra digits or a sign
/// and break lexical ordering, so they are rejected here.
fn date_to_db(date: NaiveDate) -> RepoResult<String> {
    let date = ensure_storable_date(date)?;
    Ok(date.format(DATE_FORMAT).to_string())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_habit_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let required: [(&'static str, &[&'static str]); 2] = [
        (
            "habits",
            &["uuid", "name", "description", "created_at", "archived"],
        ),
        ("checkins", &["id", "habit_uuid", "date", "created_at"]),
    ];
    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{date_to_db, map_checkin_insert_error, parse_date, RepoError};
    use crate::model::habit::ValidationError;
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use uuid::Uuid;

    #[test]
    fn unique_violation_maps_to_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE checkins (
                habit_uuid TEXT NOT NULL,
                date TEXT NOT NULL,
                UNIQUE (habit_uuid, date)
            );
            INSERT INTO checkins VALUES ('h', '2024-01-01');",
        )
        .unwrap();
        let err = conn
            .execute("INSERT INTO checkins VALUES ('h', '2024-01-01');", [])
            .unwrap_err();

        let habit_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        match map_checkin_insert_error(err, habit_id, date) {
            RepoError::Conflict {
                habit_id: got_id,
                date: got_date,
            } => {
                assert_eq!(got_id, habit_id);
                assert_eq!(got_date, date);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn other_sqlite_errors_stay_db_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .execute("INSERT INTO missing_table VALUES (1);", [])
            .unwrap_err();
        let mapped = map_checkin_insert_error(
            err,
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(matches!(mapped, RepoError::Db(_)));
    }

    #[test]
    fn date_text_is_zero_padded_and_parses_back() {
        let date = NaiveDate::from_ymd_opt(987, 2, 3).unwrap();
        assert_eq!(date_to_db(date).unwrap(), "0987-02-03");
        assert_eq!(parse_date("0987-02-03").unwrap(), date);
        assert!(matches!(
            parse_date("2024-13-01"),
            Err(RepoError::InvalidData(_))
        ));
    }

    #[test]
    fn five_digit_years_are_not_written_as_text() {
        let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        assert!(matches!(
            date_to_db(far),
            Err(RepoError::Validation(ValidationError::DateOutOfRange { date })) if date == far
        ));
    }
}
