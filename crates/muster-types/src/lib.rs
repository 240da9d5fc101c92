//! Shared wire types for the muster operator console.
//!
//! These types mirror the JSON the backend speaks on its two console
//! endpoints: the agent roster (`GET /api/agents`) and command dispatch
//! (`POST /api/command`). Both the core engine and the TUI consume them.

pub mod agent;
pub mod command;

pub use agent::Agent;
pub use command::{Command, CommandStatus, DispatchRequest, DispatchResponse};
