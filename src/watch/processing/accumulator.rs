use std::{collections::HashMap, fmt::Display, sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

use crate::{
    utils::time::date_to_record_key,
    watch::storage::{focus_event::FocusChangeEvent, usage_store::UsageStore},
};

/// Time spent in every application during the current session, kept apart per day so a session
/// running past midnight starts the new day's records from zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsageLedger {
    usage: HashMap<(Arc<str>, NaiveDate), Duration>,
}

impl UsageLedger {
    /// Adds time to an application on a day and returns its new total for that day.
    pub fn add(&mut self, app: &Arc<str>, date: NaiveDate, elapsed: Duration) -> Duration {
        let total = self.usage.entry((app.clone(), date)).or_default();
        *total += elapsed;
        *total
    }

    pub fn get(&self, app: &str, date: NaiveDate) -> Option<Duration> {
        self.usage.get(&(Arc::from(app), date)).copied()
    }

    pub fn len(&self) -> usize {
        self.usage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }
}

impl Display for UsageLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries = self.usage.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| (a.0 .1, &a.0 .0).cmp(&(b.0 .1, &b.0 .0)));
        write!(f, "{{")?;
        let mut current_date = None;
        for ((app, date), usage) in entries {
            if current_date != Some(*date) {
                if current_date.is_some() {
                    write!(f, "; ")?;
                }
                write!(f, "{}: ", date_to_record_key(*date))?;
                current_date = Some(*date);
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{app} {usage:.3?}")?;
        }
        write!(f, "}}")
    }
}

/// Turns focus changes into time credits for the application that lost focus and flushes the
/// session total of that application and day to the store.
pub struct UsageAccumulator<S: UsageStore> {
    ledger: UsageLedger,
    store: S,
    segment_start: DateTime<Utc>,
}

impl<S: UsageStore> UsageAccumulator<S> {
    pub fn new(store: S, segment_start: DateTime<Utc>) -> Self {
        Self {
            ledger: UsageLedger::default(),
            store,
            segment_start,
        }
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    pub fn segment_start(&self) -> DateTime<Utc> {
        self.segment_start
    }

    /// Credits `previous_app` with the time since `segment_start` and returns the start of the
    /// next segment. The empty identity is never credited. A segment is attributed entirely to
    /// `date`, the day it ended on.
    pub fn on_focus_changed(
        &mut self,
        previous_app: &Arc<str>,
        segment_start: DateTime<Utc>,
        now: DateTime<Utc>,
        date: NaiveDate,
    ) -> DateTime<Utc> {
        let elapsed = (now - segment_start).to_std().unwrap_or_else(|_| {
            warn!("Clock went backwards from {segment_start} to {now}, crediting nothing");
            Duration::ZERO
        });

        if previous_app.is_empty() {
            return now;
        }

        let total = self.ledger.add(previous_app, date, elapsed);
        // The ledger stays correct on failure, the next successful flush carries the full total.
        if let Err(e) = self.store.upsert_daily_usage(previous_app, date, total) {
            error!("Failed to save usage of {previous_app} for {date}: {e:?}");
        }

        now
    }

    /// Moves the segment timer forward by one detected change and prints the session usage.
    pub fn process_event(&mut self, event: &FocusChangeEvent) {
        debug!("Processing event {:?}", event);
        self.segment_start =
            self.on_focus_changed(&event.previous, self.segment_start, event.moment, event.date);
        println!("{}", self.ledger);
    }

    /// Consumes changes in detection order until the collection side drops its sender.
    pub async fn run(mut self, mut receiver: Receiver<FocusChangeEvent>) -> Result<()> {
        while let Some(event) = receiver.recv().await {
            self.process_event(&event);
        }
        info!("Session finished with usage {}", self.ledger);
        Ok(())
    }
}
