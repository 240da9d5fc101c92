//! The console engine: owned state plus the update functions the
//! presentation layer drives.
//!
//! All mutation goes through explicit methods on [`Console`]: user
//! intents from the UI and [`EngineEvent`]s from background tasks. The
//! engine never performs I/O itself; the scheduler and dispatcher do, and
//! report back through the event channel.

use crate::event::EngineEvent;
use crate::history::CommandLog;
use crate::scheduler::REFRESH_CHOICES_SECS;
use crate::store::SnapshotStore;
use muster_types::{Agent, Command};
use tracing::debug;

/// A gated dispatch: the target agent and the literal command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchIntent {
    pub agent_id: String,
    pub command: String,
}

/// Client-held console state: roster snapshot, selection, command input,
/// history log, and the most recent surfaced failure.
#[derive(Debug)]
pub struct Console {
    store: SnapshotStore,
    history: CommandLog,
    input: String,
    interval_secs: u64,
    last_error: Option<String>,
    loaded: bool,
}

impl Console {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            store: SnapshotStore::new(),
            history: CommandLog::new(),
            input: String::new(),
            interval_secs,
            last_error: None,
            loaded: false,
        }
    }

    // ─── Background-event application ────────────────────────────────────

    /// Apply one terminal event from a background fetch or dispatch.
    pub fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::RosterLoaded(agents) => {
                self.loaded = true;
                self.last_error = None;
                self.store.replace_roster(agents);
            }
            EngineEvent::RefreshFailed(err) => {
                // Previous roster stays on display, stale but valid.
                self.loaded = true;
                self.last_error = Some(err);
            }
            EngineEvent::CommandAccepted(cmd) => {
                debug!(id = %cmd.id, agent = %cmd.agent, "Recording queued command");
                self.history.prepend(cmd);
                self.input.clear();
            }
            EngineEvent::DispatchFailed(err) => {
                // Input is left untouched so the operator can retry.
                self.last_error = Some(err);
            }
        }
    }

    // ─── User intents ────────────────────────────────────────────────────

    /// Select the agent with the given id, if present in the roster.
    pub fn select(&mut self, agent_id: &str) {
        self.store.select(agent_id);
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace_input(&mut self) {
        self.input.pop();
    }

    /// Gate a submit: returns the dispatch to perform, or `None` when no
    /// agent is selected or the input is blank. A `None` is a no-op, not
    /// an error: no history mutation, no network call.
    pub fn dispatch_request(&self) -> Option<DispatchIntent> {
        let agent = self.store.selected()?;
        if self.input.trim().is_empty() {
            return None;
        }
        Some(DispatchIntent {
            agent_id: agent.id.clone(),
            command: self.input.clone(),
        })
    }

    /// Advance the refresh interval to the next offered choice, wrapping
    /// around. Returns the new value in seconds.
    pub fn cycle_interval(&mut self) -> u64 {
        let next = match REFRESH_CHOICES_SECS
            .iter()
            .position(|&s| s == self.interval_secs)
        {
            Some(i) => REFRESH_CHOICES_SECS[(i + 1) % REFRESH_CHOICES_SECS.len()],
            // A custom interval from the CLI resets into the offered set.
            None => REFRESH_CHOICES_SECS[0],
        };
        self.interval_secs = next;
        next
    }

    // ─── Read accessors ──────────────────────────────────────────────────

    pub fn roster(&self) -> &[Agent] {
        self.store.roster()
    }

    pub fn selected(&self) -> Option<&Agent> {
        self.store.selected()
    }

    pub fn history(&self) -> &[Command] {
        self.history.entries()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// False until the first fetch has completed (success or failure);
    /// drives the initial full-screen loading state.
    pub fn loaded(&self) -> bool {
        self.loaded
    }
}
