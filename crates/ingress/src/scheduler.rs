//! Periodic driver for the schedule path.
//!
//! A thin loop around [`Ingress::tick`]: every poll interval it sweeps all
//! active schedule triggers across tenants. Due-checking itself lives in
//! the pure evaluator; this loop only supplies the clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::ingress::Ingress;

/// Default sweep interval.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Drives schedule sweeps on a fixed interval until told to stop.
pub struct Scheduler {
    ingress: Arc<Ingress>,
    poll_interval: Duration,
}

impl Scheduler {
    /// Create a scheduler sweeping every 60 seconds.
    #[must_use]
    pub fn new(ingress: Arc<Ingress>) -> Self {
        Self {
            ingress,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the sweep interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Spawn the sweep loop.
    ///
    /// Returns the task handle and a stop signal; send `true` through the
    /// sender to end the loop after the current sweep.
    #[must_use]
    pub fn spawn(self) -> (JoinHandle<()>, watch::Sender<bool>) {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.poll_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match self.ingress.tick(Utc::now()).await {
                            Ok(summaries) if !summaries.is_empty() => {
                                info!(fired = summaries.len(), "schedule sweep fired triggers");
                            }
                            Ok(_) => {}
                            Err(e) => warn!(error = %e, "schedule sweep failed"),
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            info!("scheduler stopping");
                            break;
                        }
                    }
                }
            }
        });

        (handle, stop_tx)
    }
}
