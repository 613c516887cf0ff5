use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;

use crate::{
    utils::{
        clock::{Clock, DefaultClock},
        time::{date_to_record_key, parse_record_key},
    },
    watch::{
        database_path,
        storage::usage_store::{SqliteUsageStore, UsageStore},
    },
};

#[derive(Debug, Parser)]
pub struct UsageCommand {
    #[arg(long, help = "Application name, as printed by the watch command")]
    app: String,
    #[arg(long, value_parser = parse_record_key, help = "Day in YYYY-MM-DD format. Defaults to today")]
    date: Option<NaiveDate>,
    #[arg(
        long,
        help = "Application directory. By default uses $XDG_STATE_HOME/focuslog or $HOME/.local/state/focuslog"
    )]
    pub dir: Option<PathBuf>,
    #[arg(long, help = "Usage database. Defaults to watcher.db inside the application directory")]
    db: Option<PathBuf>,
}

pub fn process_usage_command(command: UsageCommand, app_dir: &Path) -> Result<()> {
    let store = SqliteUsageStore::open(&database_path(command.db, app_dir))?;
    let date = command.date.unwrap_or_else(|| DefaultClock.today());
    let usage = store.get_daily_usage(&command.app, date)?;
    write_usage(&mut io::stdout().lock(), &command.app, date, usage)
}

fn write_usage(
    out: &mut impl Write,
    app: &str,
    date: NaiveDate,
    usage: Option<Duration>,
) -> Result<()> {
    let date = date_to_record_key(date);
    match usage {
        Some(usage) => writeln!(out, "{app} on {date}: {}", format_duration(usage))?,
        None => writeln!(out, "No usage recorded for {app} on {date}")?,
    }
    Ok(())
}

fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    )
}
