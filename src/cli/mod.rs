pub mod usage;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use usage::{process_usage_command, UsageCommand};

use crate::{
    utils::{
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX, WATCH_PREFIX},
    },
    watch::{args::WatchArgs, start_watch, WatchConfig},
};

#[derive(Parser, Debug)]
#[command(name = "focuslog", version, long_about = None)]
#[command(about = "Tracks time spent in each focused application", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Watch the focused window and record per-day usage. Prints session usage on every focus change"
    )]
    Watch {
        #[command(flatten)]
        args: WatchArgs,
    },
    #[command(about = "Show recorded usage of an application for a day")]
    Usage {
        #[command(flatten)]
        command: UsageCommand,
        #[arg(long, help = "Enable logging")]
        log: bool,
    },
}

fn application_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    dir.map_or_else(create_application_default_path, ensure_dir)
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    match args.commands {
        Commands::Watch { args } => {
            let app_dir = application_dir(args.dir.clone())?;
            enable_logging(WATCH_PREFIX, &app_dir.join("logs"), args.log, args.log_console)?;
            let config = WatchConfig::from_args(&args, &app_dir)?;
            start_watch(config).await
        }
        Commands::Usage { command, log } => {
            let app_dir = application_dir(command.dir.clone())?;
            let logging_level = if log { Some(LevelFilter::TRACE) } else { None };
            enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, log)?;
            process_usage_command(command, &app_dir)
        }
    }
}
