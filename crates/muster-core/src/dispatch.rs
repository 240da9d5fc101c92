//! Command dispatch: send, record optimistically, nudge a re-sync.

use crate::backend::Backend;
use crate::event::EngineEvent;
use crate::scheduler::RefreshHandle;
use chrono::Utc;
use muster_types::{Command, CommandStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Delay before the single post-dispatch roster refresh. The backend is
/// expected to reflect the queued command in agent state shortly after
/// acceptance; this is a best-effort nudge, not a confirmation channel.
pub const CONFIRM_NUDGE_DELAY: Duration = Duration::from_millis(500);

/// Send `command` to `agent_id` in the background.
///
/// All-or-nothing: on acceptance the backend-assigned id becomes an
/// optimistic `queued` history entry delivered as
/// [`EngineEvent::CommandAccepted`], and one delayed roster refresh is
/// scheduled through `refresh`. On failure nothing is recorded beyond a
/// [`EngineEvent::DispatchFailed`].
///
/// Preconditions (agent selected, text non-blank) are the caller's to
/// gate; see [`Console::dispatch_request`](crate::console::Console::dispatch_request).
pub fn spawn_dispatch(
    backend: Arc<dyn Backend>,
    refresh: RefreshHandle,
    events: mpsc::UnboundedSender<EngineEvent>,
    agent_id: String,
    command: String,
) {
    tokio::spawn(async move {
        match backend.dispatch(&agent_id, &command).await {
            Ok(resp) => {
                debug!(agent = %agent_id, id = %resp.id, "Command accepted");
                let entry = Command {
                    id: resp.id,
                    command,
                    timestamp: Utc::now(),
                    status: CommandStatus::Queued,
                    output: String::new(),
                    agent: agent_id,
                };
                let _ = events.send(EngineEvent::CommandAccepted(entry));
                refresh.refresh_after(CONFIRM_NUDGE_DELAY);
            }
            Err(err) => {
                warn!(agent = %agent_id, error = %err, "Command dispatch failed");
                let _ = events.send(EngineEvent::DispatchFailed(err.to_string()));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::scheduler::RefreshScheduler;
    use tokio::time::sleep;

    fn setup() -> (
        Arc<MockBackend>,
        RefreshScheduler,
        mpsc::UnboundedSender<EngineEvent>,
        mpsc::UnboundedReceiver<EngineEvent>,
    ) {
        let backend = Arc::new(MockBackend::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = RefreshScheduler::new(backend.clone(), tx.clone());
        (backend, scheduler, tx, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_dispatch_yields_optimistic_entry() {
        let (backend, scheduler, tx, mut rx) = setup();
        backend.set_assign_id("cmd-42");

        spawn_dispatch(
            backend.clone(),
            scheduler.handle(),
            tx,
            "A1".to_string(),
            "whoami".to_string(),
        );
        sleep(Duration::from_millis(1)).await;

        assert_eq!(backend.dispatch_calls(), vec![("A1".into(), "whoami".into())]);
        match rx.try_recv().unwrap() {
            EngineEvent::CommandAccepted(cmd) => {
                assert_eq!(cmd.id, "cmd-42");
                assert_eq!(cmd.command, "whoami");
                assert_eq!(cmd.status, CommandStatus::Queued);
                assert_eq!(cmd.output, "");
                assert_eq!(cmd.agent, "A1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn acceptance_schedules_one_delayed_refresh() {
        let (backend, scheduler, tx, mut rx) = setup();
        backend.set_assign_id("cmd-1");

        spawn_dispatch(
            backend.clone(),
            scheduler.handle(),
            tx,
            "A1".to_string(),
            "uptime".to_string(),
        );
        sleep(Duration::from_millis(1)).await;
        assert_eq!(backend.fetch_count(), 0);

        sleep(CONFIRM_NUDGE_DELAY).await;
        assert_eq!(backend.fetch_count(), 1);

        // Exactly one nudge, not a cadence.
        sleep(Duration::from_secs(10)).await;
        assert_eq!(backend.fetch_count(), 1);

        // Drain: acceptance plus one roster event, nothing else.
        let mut accepted = 0;
        let mut rosters = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev {
                EngineEvent::CommandAccepted(_) => accepted += 1,
                EngineEvent::RosterLoaded(_) => rosters += 1,
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(rosters, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_dispatch_reports_and_skips_the_nudge() {
        let (backend, scheduler, tx, mut rx) = setup();
        backend.set_fail_dispatch(true);

        spawn_dispatch(
            backend.clone(),
            scheduler.handle(),
            tx,
            "A1".to_string(),
            "whoami".to_string(),
        );
        sleep(Duration::from_secs(2)).await;

        assert!(matches!(
            rx.try_recv().unwrap(),
            EngineEvent::DispatchFailed(_)
        ));
        assert!(rx.try_recv().is_err());
        assert_eq!(backend.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn nudge_is_suppressed_after_scheduler_stop() {
        let (backend, mut scheduler, tx, mut rx) = setup();
        backend.set_assign_id("cmd-1");

        spawn_dispatch(
            backend.clone(),
            scheduler.handle(),
            tx,
            "A1".to_string(),
            "whoami".to_string(),
        );
        sleep(Duration::from_millis(1)).await;
        scheduler.stop();

        sleep(Duration::from_secs(2)).await;
        assert_eq!(backend.fetch_count(), 0);
        assert!(matches!(
            rx.try_recv().unwrap(),
            EngineEvent::CommandAccepted(_)
        ));
    }
}
