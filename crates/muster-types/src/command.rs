//! Command history entries and the dispatch request/response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Execution state of a dispatched command.
///
/// The lifecycle is forward-only: `queued → success` or `queued → error`.
/// The console itself only ever creates `queued` entries; the terminal
/// states are reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    /// Accepted by the backend, awaiting pickup by the agent.
    Queued,
    /// Executed and reported back without error.
    Success,
    /// Executed but the agent reported a failure.
    Error,
}

impl CommandStatus {
    /// Whether this state can still change.
    pub fn is_terminal(self) -> bool {
        matches!(self, CommandStatus::Success | CommandStatus::Error)
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CommandStatus::Queued => "queued",
            CommandStatus::Success => "success",
            CommandStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single entry in the command history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Backend-assigned identifier, received on dispatch acceptance.
    pub id: String,
    /// Literal text the operator submitted.
    pub command: String,
    /// Client-observed submission time. Display only, never an ordering key.
    pub timestamp: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: CommandStatus,
    /// Result text, empty until the backend reports one.
    #[serde(default)]
    pub output: String,
    /// Target agent id, fixed at creation.
    pub agent: String,
}

/// Request body for `POST /api/command?id={agentId}`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRequest {
    pub command: String,
}

/// Response body for an accepted dispatch.
///
/// The backend answers `{"status":"queued","id":"..."}`; only the assigned
/// id is load-bearing.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchResponse {
    pub id: String,
    #[serde(default)]
    pub status: String,
}
