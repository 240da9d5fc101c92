//! Periodic roster refresh with structured cancellation.
//!
//! The scheduler owns one periodic task; each tick spawns an independent
//! fetch whose terminal outcome is delivered as an [`EngineEvent`]. Ticks
//! fire on cadence whether or not an earlier fetch is still outstanding;
//! the roster endpoint is idempotent and last-resolved wins at the store.

use crate::backend::Backend;
use crate::event::EngineEvent;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Refresh intervals offered by the UI, in seconds. Any positive interval
/// is accepted by [`RefreshScheduler::start`]; these are just the choices
/// the selector cycles through.
pub const REFRESH_CHOICES_SECS: &[u64] = &[5, 10, 30, 60];

/// Cloneable trigger for out-of-cadence fetches.
///
/// Held by the dispatcher for the post-dispatch nudge. All triggers go
/// quiet once the owning scheduler is stopped.
#[derive(Clone)]
pub struct RefreshHandle {
    backend: Arc<dyn Backend>,
    events: mpsc::UnboundedSender<EngineEvent>,
    shutdown: watch::Receiver<bool>,
    in_flight: Arc<AtomicUsize>,
    last_success: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl RefreshHandle {
    /// Trigger a single fetch now. No-op after the scheduler has stopped.
    pub fn refresh_now(&self) {
        if *self.shutdown.borrow() {
            return;
        }
        self.spawn_fetch();
    }

    /// Trigger a single fetch after `delay`, unless the scheduler stops
    /// first.
    pub fn refresh_after(&self, delay: Duration) {
        if *self.shutdown.borrow() {
            return;
        }
        let handle = self.clone();
        let mut stop = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => handle.refresh_now(),
                _ = stop.changed() => {}
            }
        });
    }

    fn spawn_fetch(&self) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        let in_flight = self.in_flight.clone();
        let last_success = self.last_success.clone();

        in_flight.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            let outcome = backend.fetch_agents().await;
            // Always drops the gauge before reporting, success or failure:
            // exactly one terminal event per fetch.
            in_flight.fetch_sub(1, Ordering::SeqCst);
            match outcome {
                Ok(agents) => {
                    debug!(agents = agents.len(), "Roster refresh complete");
                    *last_success.lock().unwrap_or_else(|e| e.into_inner()) = Some(Utc::now());
                    let _ = events.send(EngineEvent::RosterLoaded(agents));
                }
                Err(err) => {
                    warn!(error = %err, "Roster refresh failed");
                    let _ = events.send(EngineEvent::RefreshFailed(err.to_string()));
                }
            }
        });
    }
}

/// Drives periodic roster refreshes against a [`Backend`].
///
/// `start` fetches immediately and then on cadence; calling it again
/// replaces the cadence and fetches immediately again, so an interval
/// change always yields a fresh snapshot right away. `stop` is idempotent
/// and terminal: no tick fires afterwards, and pending delayed triggers
/// are cancelled.
pub struct RefreshScheduler {
    handle: RefreshHandle,
    shutdown: watch::Sender<bool>,
    periodic: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new(backend: Arc<dyn Backend>, events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        Self {
            handle: RefreshHandle {
                backend,
                events,
                shutdown: shutdown_rx,
                in_flight: Arc::new(AtomicUsize::new(0)),
                last_success: Arc::new(Mutex::new(None)),
            },
            shutdown,
            periodic: None,
        }
    }

    /// Begin (or re-begin) the periodic schedule: one fetch now, then one
    /// every `every`.
    pub fn start(&mut self, every: Duration) {
        if let Some(task) = self.periodic.take() {
            task.abort();
        }
        info!(interval_secs = every.as_secs(), "Starting roster refresh schedule");

        let handle = self.handle.clone();
        let mut stop = self.shutdown.subscribe();
        self.periodic = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = stop.changed() => break,
                    // First tick resolves immediately.
                    _ = ticker.tick() => handle.refresh_now(),
                }
            }
        }));
    }

    /// Cancel the schedule and invalidate every pending trigger. Safe to
    /// call repeatedly, or before `start`.
    pub fn stop(&mut self) {
        if let Some(task) = self.periodic.take() {
            task.abort();
        }
        self.shutdown.send_replace(true);
    }

    /// Trigger a single fetch outside the periodic cadence.
    pub fn refresh_now(&self) {
        self.handle.refresh_now();
    }

    /// A cloneable trigger for use by the dispatch path.
    pub fn handle(&self) -> RefreshHandle {
        self.handle.clone()
    }

    /// Whether at least one fetch is currently outstanding.
    pub fn in_flight(&self) -> bool {
        self.handle.in_flight.load(Ordering::SeqCst) > 0
    }

    /// When the last successful fetch completed, if any.
    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        *self
            .handle
            .last_success
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
