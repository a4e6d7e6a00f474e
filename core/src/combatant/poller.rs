//! Combatant snapshot poller
//!
//! Background loop that pulls the combatant table and party id list from the
//! telemetry source and publishes them as one new snapshot per round. The
//! poll interval self-corrects by the ratio of the round's cost to the
//! running average, so a slow source backs the loop off naturally and a fast
//! one never drops below the floor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::combatant::model::Combatant;
use crate::combatant::snapshot::{CombatantSnapshot, SnapshotStore};
use crate::telemetry::{TelemetryError, TelemetrySource};

/// Minimum corrected interval; the loop never spins faster than this.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Fixed backoff after a fetch failure or while the source is unavailable.
const RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Running-average interval correction.
///
/// `avg = (avg + duration) / 2` once seeded, correction ratio is
/// `duration / avg`. The corrected interval is the base scaled by the ratio,
/// floored at [`MIN_INTERVAL`] and unbounded above.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveInterval {
    avg_ms: f64,
}

impl AdaptiveInterval {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one round's duration and return the next sleep interval for
    /// the given base.
    pub fn next(&mut self, base: Duration, duration: Duration) -> Duration {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        self.avg_ms = if self.avg_ms != 0.0 {
            (self.avg_ms + duration_ms) / 2.0
        } else {
            duration_ms
        };

        let ratio = if self.avg_ms != 0.0 && duration_ms != 0.0 {
            duration_ms / self.avg_ms
        } else {
            1.0
        };

        let corrected = Duration::from_secs_f64(base.as_secs_f64() * ratio);
        corrected.max(MIN_INTERVAL)
    }

    /// Current running average in milliseconds (0 until seeded).
    pub fn average_ms(&self) -> f64 {
        self.avg_ms
    }
}

/// Background service that keeps a [`SnapshotStore`] current.
///
/// Explicitly constructed with its collaborators and started/stopped by the
/// host; there is no process-wide instance. Stopping is cooperative: the
/// cancellation is observed at the top of each iteration and during sleeps,
/// never mid-fetch.
pub struct CombatantPoller {
    source: Arc<dyn TelemetrySource>,
    store: Arc<SnapshotStore>,
    base_interval: Duration,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CombatantPoller {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        store: Arc<SnapshotStore>,
        base_interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            base_interval,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    /// Spawn the poll loop. Calling `start` twice is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let base_interval = self.base_interval;
        let cancel = self.cancel.clone();

        self.handle = Some(tokio::spawn(async move {
            poll_loop(source, store, base_interval, cancel).await;
        }));
    }

    /// Request cancellation and wait for the current iteration to finish.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

async fn poll_loop(
    source: Arc<dyn TelemetrySource>,
    store: Arc<SnapshotStore>,
    base_interval: Duration,
    cancel: CancellationToken,
) {
    let mut adaptive = AdaptiveInterval::new();
    let mut tick = store.snapshot().tick();

    debug!(base_ms = base_interval.as_millis(), "combatant poller started");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        if !source.is_available() {
            trace!("telemetry source unavailable, skipping poll");
            if sleep_or_cancelled(RETRY_BACKOFF, &cancel).await {
                break;
            }
            continue;
        }

        let started = Instant::now();
        match fetch_round(source.as_ref()) {
            Ok((combatants, party_ids)) => {
                tick += 1;
                let count = combatants.len();
                store.publish(CombatantSnapshot::new(combatants, party_ids, tick));

                let duration = started.elapsed();
                let interval = adaptive.next(base_interval, duration);
                trace!(
                    tick,
                    combatants = count,
                    duration_ms = duration.as_millis(),
                    avg_ms = adaptive.average_ms(),
                    interval_ms = interval.as_millis(),
                    "combatant snapshot published"
                );

                if sleep_or_cancelled(interval, &cancel).await {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "combatant fetch failed");
                if sleep_or_cancelled(RETRY_BACKOFF, &cancel).await {
                    break;
                }
            }
        }
    }

    debug!("combatant poller stopped");
}

/// Fetch both halves of a snapshot from the same round.
///
/// The two calls are separate on the source side; pairing them here is what
/// lets the store publish them as one consistent unit.
fn fetch_round(
    source: &dyn TelemetrySource,
) -> Result<(Vec<Combatant>, Vec<u32>), TelemetryError> {
    let combatants = source
        .fetch_combatants()?
        .into_iter()
        .map(Combatant::from_raw)
        .collect();
    let party_ids = source.fetch_party_ids()?;
    Ok((combatants, party_ids))
}

/// Sleep that wakes early on cancellation. Returns true when cancelled.
async fn sleep_or_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => true,
        _ = sleep(duration) => false,
    }
}
