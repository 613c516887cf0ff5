//!  Storage is organized through [usage_store::SqliteUsageStore].
//!  The basic idea is:
//!   - There is one SQLite database per installation.
//!   - Every (application, day) pair owns exactly one row.
//!   - The row holds the cumulative usage of the latest session and is replaced on every flush.

pub mod focus_event;
pub mod usage_store;
