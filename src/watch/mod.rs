use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use collection::{collector::FocusCollectionModule, rules::NormalizationRules, tracker::WindowTracker};
use processing::accumulator::UsageAccumulator;
use storage::{
    focus_event::FocusChangeEvent,
    usage_store::{SqliteUsageStore, UsageStore},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    utils::clock::{Clock, DefaultClock},
    window_api::{GenericWindowManager, WindowManager},
};

pub mod args;
pub mod collection;
pub mod processing;
pub mod shutdown;
pub mod storage;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const DATABASE_FILE: &str = "watcher.db";
const EVENT_CHANNEL_CAPACITY: usize = 10;

/// Everything the tracking loop needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub database: PathBuf,
    pub poll_interval: Duration,
    pub rules: NormalizationRules,
}

impl WatchConfig {
    pub fn from_args(args: &args::WatchArgs, app_dir: &Path) -> Result<Self> {
        let rules = match &args.rules {
            Some(path) => NormalizationRules::from_file(path)?,
            None => NormalizationRules::default(),
        };
        Ok(Self {
            database: database_path(args.db.clone(), app_dir),
            poll_interval: Duration::from_millis(args.interval_ms),
            rules,
        })
    }
}

pub fn database_path(db: Option<PathBuf>, app_dir: &Path) -> PathBuf {
    db.unwrap_or_else(|| app_dir.join(DATABASE_FILE))
}

/// Represents the starting point for tracking. Runs until interrupted.
pub async fn start_watch(config: WatchConfig) -> Result<()> {
    let store = SqliteUsageStore::open(&config.database)
        .inspect_err(|e| error!("Failed to open usage database {:?}: {e:?}", config.database))?;
    let manager = GenericWindowManager::new()
        .inspect_err(|e| error!("Failed to connect to the windowing system {e:?}"))?;

    let shutdown_token = CancellationToken::new();
    info!("Tracking focus every {:?}", config.poll_interval);

    run_watch(
        manager,
        store,
        config.rules,
        config.poll_interval,
        shutdown_token.clone(),
        DefaultClock,
        shutdown::detect_shutdown(shutdown_token),
    )
    .await
}

async fn run_watch(
    manager: impl WindowManager + 'static,
    store: impl UsageStore,
    rules: NormalizationRules,
    poll_interval: Duration,
    shutdown_token: CancellationToken,
    clock: impl Clock,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    let (sender, receiver) = mpsc::channel::<FocusChangeEvent>(EVENT_CHANNEL_CAPACITY);
    let loop_start = clock.time();

    let collector = create_collector(
        sender,
        manager,
        rules,
        poll_interval,
        &shutdown_token,
        clock,
    );
    let accumulator = create_accumulator(store, loop_start);

    let (_, collection_result, processing_result) =
        tokio::join!(shutdown, collector.run(), accumulator.run(receiver));

    if let Err(collection_result) = collection_result {
        error!("Collection module got an error {:?}", collection_result);
    }

    if let Err(processing_result) = processing_result {
        error!("Processing module got an error {:?}", processing_result);
    }

    Ok(())
}

fn create_collector(
    sender: mpsc::Sender<FocusChangeEvent>,
    manager: impl WindowManager + 'static,
    rules: NormalizationRules,
    poll_interval: Duration,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> FocusCollectionModule {
    FocusCollectionModule::new(
        sender,
        WindowTracker::new(Box::new(manager), rules),
        shutdown_token.clone(),
        poll_interval,
        Box::new(clock),
    )
}

fn create_accumulator<S: UsageStore>(store: S, loop_start: DateTime<Utc>) -> UsageAccumulator<S> {
    UsageAccumulator::new(store, loop_start)
}
