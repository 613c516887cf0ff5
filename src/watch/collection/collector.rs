use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

use crate::{utils::clock::Clock, watch::storage::focus_event::FocusChangeEvent};

use super::tracker::WindowTracker;

pub struct FocusCollectionModule {
    next: mpsc::Sender<FocusChangeEvent>,
    tracker: WindowTracker,
    shutdown: CancellationToken,
    poll_interval: Duration,
    time_provider: Box<dyn Clock>,
}

impl FocusCollectionModule {
    pub fn new(
        next: mpsc::Sender<FocusChangeEvent>,
        tracker: WindowTracker,
        shutdown: CancellationToken,
        poll_interval: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            tracker,
            shutdown,
            poll_interval,
            time_provider,
        }
    }

    /// Polls the tracker once. A change is turned into an event stamped with the detection time.
    pub fn tick(&mut self) -> Result<Option<FocusChangeEvent>> {
        if !self.tracker.poll_change()? {
            return Ok(None);
        }

        let state = self.tracker.state();
        Ok(Some(FocusChangeEvent {
            previous: state.previous.clone(),
            current: state.current.clone(),
            moment: self.time_provider.time(),
            date: self.time_provider.today(),
        }))
    }

    /// Executes the polling loop.
    pub async fn run(mut self) -> Result<()> {
        let mut poll_point = self.time_provider.instant();
        loop {
            poll_point += self.poll_interval;

            match self.tick() {
                Ok(Some(event)) => {
                    let span = info_span!("Sending focus change");
                    debug!("Sending event {:?}", event);
                    self.next
                        .send(event)
                        .instrument(span)
                        .await
                        .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                    info!("Successfully sent focus change")
                }
                Ok(None) => (),
                Err(e) => {
                    error!("Encountered an error while polling the focused window {:?}", e)
                }
            }

            tokio::select! {
                // Cancelation stops the loop and drops the sender, which in turn stops the
                // accumulator.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(poll_point) => ()
            }
        }
    }
}
