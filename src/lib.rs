//! Tracks which application owns the focused window and how long it keeps it. Usage is summed per
//! application and day and stored in a local SQLite database.
//!

pub mod cli;
pub mod utils;
pub mod watch;
pub mod window_api;
