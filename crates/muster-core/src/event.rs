//! Events emitted by background tasks toward the console engine.

use muster_types::{Agent, Command};

/// Terminal outcome of a background fetch or dispatch.
///
/// Every spawned task emits exactly one of these, success or failure, so
/// the consumer's loading state can never wedge.
#[derive(Debug)]
pub enum EngineEvent {
    /// A roster fetch completed; the payload replaces the held roster.
    RosterLoaded(Vec<Agent>),
    /// A roster fetch failed. The previous roster stays on display.
    RefreshFailed(String),
    /// The backend accepted a dispatched command and assigned it an id.
    CommandAccepted(Command),
    /// A dispatch failed before acceptance; history and input are untouched.
    DispatchFailed(String),
}
