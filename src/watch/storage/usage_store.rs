use std::{path::Path, time::Duration};

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::utils::time::date_to_record_key;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS daily_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    window_name TEXT NOT NULL,
    date TEXT NOT NULL,
    usage INTEGER NOT NULL,
    UNIQUE (window_name, date)
);
";

/// Interface for abstracting storage of daily usage.
///
/// Values are cumulative: an upsert replaces whatever was stored for the key. Only one writer per
/// (application, date) is assumed, two trackers flushing the same key would overwrite each other.
#[cfg_attr(test, mockall::automock)]
pub trait UsageStore {
    fn upsert_daily_usage(&mut self, app: &str, date: NaiveDate, total: Duration) -> Result<()>;

    /// Returns [None] when nothing was stored for the key.
    fn get_daily_usage(&self, app: &str, date: NaiveDate) -> Result<Option<Duration>>;
}

impl<S: UsageStore + ?Sized> UsageStore for &mut S {
    fn upsert_daily_usage(&mut self, app: &str, date: NaiveDate, total: Duration) -> Result<()> {
        (**self).upsert_daily_usage(app, date, total)
    }

    fn get_daily_usage(&self, app: &str, date: NaiveDate) -> Result<Option<Duration>> {
        (**self).get_daily_usage(app, date)
    }
}

/// The main realization of [UsageStore].
pub struct SqliteUsageStore {
    conn: Connection,
}

impl SqliteUsageStore {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening usage database {path:?}");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl UsageStore for SqliteUsageStore {
    fn upsert_daily_usage(&mut self, app: &str, date: NaiveDate, total: Duration) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_logs (window_name, date, usage) VALUES (?1, ?2, ?3)
             ON CONFLICT(window_name, date) DO UPDATE SET usage = excluded.usage",
            params![app, date_to_record_key(date), duration_to_nanos(total)],
        )?;
        Ok(())
    }

    fn get_daily_usage(&self, app: &str, date: NaiveDate) -> Result<Option<Duration>> {
        let usage = self
            .conn
            .query_row(
                "SELECT usage FROM daily_logs WHERE window_name = ?1 AND date = ?2",
                params![app, date_to_record_key(date)],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(usage.map(nanos_to_duration))
    }
}

/// Usage is persisted as integer nanoseconds. Anything past i64 saturates.
fn duration_to_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

fn nanos_to_duration(nanos: i64) -> Duration {
    match u64::try_from(nanos) {
        Ok(v) => Duration::from_nanos(v),
        Err(_) => {
            warn!("Found negative usage {nanos} in the database, treating it as zero");
            Duration::ZERO
        }
    }
}
