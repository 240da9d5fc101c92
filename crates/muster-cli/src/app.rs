//! Application state and the main event loop.

use crate::event::{spawn_engine_bridge, spawn_input_thread, AppEvent};
use anyhow::Result;
use muster_core::{spawn_dispatch, Backend, Console, EngineEvent, HttpBackend, RefreshScheduler};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(150);

/// Which pane receives keystrokes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Agents,
    Command,
}

pub struct App {
    pub console: Console,
    pub scheduler: RefreshScheduler,
    pub focus: Focus,
    /// Cursor position in the agent list (distinct from the selection the
    /// engine holds; Enter commits the cursor into a selection).
    pub cursor: usize,
    pub tick: usize,
    backend: Arc<dyn Backend>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(base_url: &str, interval_secs: u64) -> Self {
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(base_url));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (app_tx, rx) = mpsc::unbounded_channel();

        spawn_engine_bridge(events_rx, app_tx.clone());
        spawn_input_thread(app_tx, TICK_RATE);

        Self {
            console: Console::new(interval_secs),
            scheduler: RefreshScheduler::new(backend.clone(), events_tx.clone()),
            focus: Focus::Agents,
            cursor: 0,
            tick: 0,
            backend,
            events_tx,
            rx,
            should_quit: false,
        }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.scheduler
            .start(Duration::from_secs(self.console.interval_secs()));

        while !self.should_quit {
            terminal.draw(|frame| crate::ui::draw(frame, &mut self))?;
            match self.rx.recv().await {
                Some(AppEvent::Key(key)) => self.handle_key(key),
                Some(AppEvent::Tick) => self.tick = self.tick.wrapping_add(1),
                Some(AppEvent::Engine(ev)) => self.console.apply(ev),
                None => break,
            }
        }

        self.scheduler.stop();
        Ok(())
    }

    // ─── Key handling ────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Tab {
            self.focus = match self.focus {
                Focus::Agents => Focus::Command,
                Focus::Command => Focus::Agents,
            };
            return;
        }

        match self.focus {
            Focus::Agents => self.handle_agents_key(key),
            Focus::Command => self.handle_command_key(key),
        }
    }

    fn handle_agents_key(&mut self, key: KeyEvent) {
        let count = self.console.roster().len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.scheduler.refresh_now(),
            KeyCode::Char('i') => {
                let secs = self.console.cycle_interval();
                self.scheduler.start(Duration::from_secs(secs));
            }
            KeyCode::Up | KeyCode::Char('k') if count > 0 => {
                self.cursor = if self.cursor == 0 {
                    count - 1
                } else {
                    self.cursor - 1
                };
            }
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.cursor = (self.cursor + 1) % count;
            }
            KeyCode::Enter if count > 0 => {
                let id = self.console.roster()[self.cursor.min(count - 1)].id.clone();
                self.console.select(&id);
                self.focus = Focus::Command;
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Agents,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.console.backspace_input(),
            KeyCode::Char(c) => self.console.push_input(c),
            _ => {}
        }
    }

    /// Dispatch the typed command to the selected agent. Gated by the
    /// engine: no selection or blank input is a silent no-op.
    fn submit(&mut self) {
        if let Some(intent) = self.console.dispatch_request() {
            spawn_dispatch(
                self.backend.clone(),
                self.scheduler.handle(),
                self.events_tx.clone(),
                intent.agent_id,
                intent.command,
            );
        }
    }
}
