//! Event plumbing: crossterm polling thread and the engine-event bridge.

use muster_core::EngineEvent;
use ratatui::crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Unified application event consumed by the main loop.
pub enum AppEvent {
    /// A crossterm key press (filtered to Press only).
    Key(KeyEvent),
    /// Periodic tick for the refresh spinner.
    Tick,
    /// A terminal outcome from a background fetch or dispatch.
    Engine(EngineEvent),
}

/// Spawn the crossterm polling + tick thread.
///
/// Terminal input is blocking, so it lives on a dedicated thread and
/// feeds the async loop through the channel. The thread exits when the
/// receiver side is dropped.
pub fn spawn_input_thread(tx: mpsc::UnboundedSender<AppEvent>, tick_rate: Duration) {
    std::thread::spawn(move || {
        loop {
            if event::poll(tick_rate).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    let sent = match ev {
                        // Only forward Press events: Windows sends Release
                        // and Repeat too, which causes double input.
                        CtEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            tx.send(AppEvent::Key(key))
                        }
                        _ => Ok(()),
                    };
                    if sent.is_err() {
                        break;
                    }
                }
            } else if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

/// Forward engine events into the unified app channel.
pub fn spawn_engine_bridge(
    mut engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(ev) = engine_rx.recv().await {
            if tx.send(AppEvent::Engine(ev)).is_err() {
                break;
            }
        }
    });
}
