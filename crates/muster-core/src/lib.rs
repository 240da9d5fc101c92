//! Client-side state-synchronization engine for the muster operator
//! console.
//!
//! The engine polls a backend for the agent roster, reconciles it against
//! locally held selection state, and manages a newest-first command
//! history that mixes optimistic local entries with server-confirmed
//! state. Rendering is someone else's job: the presentation layer reads
//! [`Console`] as plain data and feeds intents back in.

pub mod backend;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod history;
pub mod scheduler;
pub mod store;

pub use backend::{Backend, HttpBackend};
pub use console::{Console, DispatchIntent};
pub use dispatch::{spawn_dispatch, CONFIRM_NUDGE_DELAY};
pub use error::ApiError;
pub use event::EngineEvent;
pub use history::CommandLog;
pub use scheduler::{RefreshHandle, RefreshScheduler, REFRESH_CHOICES_SECS};
pub use store::SnapshotStore;
