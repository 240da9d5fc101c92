//! Agent snapshot store: the last-fetched roster plus the operator's
//! selection, with reconciliation across refresh cycles.

use muster_types::Agent;

/// Holds the roster as last reported by the backend and the currently
/// selected agent.
///
/// The roster is fully replaced on every successful poll; the selection is
/// re-resolved by id so the operator keeps their context across refreshes.
/// A selection whose id vanishes from a poll is kept stale rather than
/// cleared, so a transient poll gap does not drop the operator's context.
/// If the same id reappears later, reconciliation picks the fresh copy
/// back up.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    roster: Vec<Agent>,
    selected: Option<Agent>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swap in a newly fetched roster, re-resolving the
    /// selection by id.
    pub fn replace_roster(&mut self, new_agents: Vec<Agent>) {
        if let Some(selected) = &self.selected {
            if let Some(updated) = new_agents.iter().find(|a| a.id == selected.id) {
                self.selected = Some(updated.clone());
            }
        }
        self.roster = new_agents;
    }

    /// Select the agent with the given id. No-op if the id is not in the
    /// current roster.
    pub fn select(&mut self, agent_id: &str) {
        if let Some(agent) = self.roster.iter().find(|a| a.id == agent_id) {
            self.selected = Some(agent.clone());
        }
    }

    /// The roster, in backend response order.
    pub fn roster(&self) -> &[Agent] {
        &self.roster
    }

    /// The selected agent, if any. May be stale if its id dropped out of
    /// the latest poll.
    pub fn selected(&self) -> Option<&Agent> {
        self.selected.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn agent(id: &str, hostname: &str, active: bool) -> Agent {
        Agent {
            id: id.to_string(),
            hostname: hostname.to_string(),
            ip: "10.0.0.1".to_string(),
            os: "linux".to_string(),
            is_active: active,
            last_seen: Utc.with_ymd_and_hms(2025, 11, 3, 14, 0, 0).unwrap(),
            protocol: "http".to_string(),
        }
    }

    #[test]
    fn roster_order_matches_backend_order() {
        let mut store = SnapshotStore::new();
        store.replace_roster(vec![agent("b", "beta", true), agent("a", "alpha", true)]);
        let ids: Vec<&str> = store.roster().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn select_unknown_id_is_a_no_op() {
        let mut store = SnapshotStore::new();
        store.replace_roster(vec![agent("a", "alpha", true)]);
        store.select("ghost");
        assert!(store.selected().is_none());

        store.select("a");
        store.select("ghost");
        assert_eq!(store.selected().unwrap().id, "a");
    }

    #[test]
    fn selection_follows_updated_fields_across_polls() {
        let mut store = SnapshotStore::new();
        store.replace_roster(vec![agent("a", "alpha", true)]);
        store.select("a");

        let mut updated = agent("a", "alpha-renamed", false);
        updated.ip = "10.0.0.9".to_string();
        store.replace_roster(vec![agent("b", "beta", true), updated]);

        let selected = store.selected().unwrap();
        assert_eq!(selected.id, "a");
        assert_eq!(selected.hostname, "alpha-renamed");
        assert_eq!(selected.ip, "10.0.0.9");
        assert!(!selected.is_active);
    }

    #[test]
    fn selection_survives_transient_roster_miss() {
        let mut store = SnapshotStore::new();
        store.replace_roster(vec![agent("a", "alpha", true)]);
        store.select("a");

        // Poll gap: agent "a" missing entirely.
        store.replace_roster(vec![agent("b", "beta", true)]);
        let stale = store.selected().unwrap();
        assert_eq!(stale.id, "a");
        assert_eq!(stale.hostname, "alpha");

        // It comes back with fresh fields; reconciliation picks them up.
        store.replace_roster(vec![agent("a", "alpha-v2", false)]);
        let restored = store.selected().unwrap();
        assert_eq!(restored.id, "a");
        assert_eq!(restored.hostname, "alpha-v2");
        assert!(!restored.is_active);
    }

    #[test]
    fn empty_roster_keeps_selection() {
        let mut store = SnapshotStore::new();
        store.replace_roster(vec![agent("a", "alpha", true)]);
        store.select("a");
        store.replace_roster(Vec::new());
        assert!(store.roster().is_empty());
        assert_eq!(store.selected().unwrap().id, "a");
    }
}
