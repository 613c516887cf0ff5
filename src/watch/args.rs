use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[arg(
        long,
        help = "Application directory. By default uses $XDG_STATE_HOME/focuslog or $HOME/.local/state/focuslog"
    )]
    pub dir: Option<PathBuf>,
    #[arg(long, help = "Usage database. Defaults to watcher.db inside the application directory")]
    pub db: Option<PathBuf>,
    #[arg(long = "interval-ms", default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..), help = "Delay between focus polls")]
    pub interval_ms: u64,
    #[arg(long, help = "JSON file with terminal names and editor title patterns")]
    pub rules: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
