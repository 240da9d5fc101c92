//! Command history log: newest-first, append-only.

use muster_types::Command;

/// The dispatch history as the operator sees it.
///
/// Insertion order is authoritative: entries are never re-sorted by
/// timestamp and never deleted. The engine only ever writes `queued`
/// entries; status advancement is backend-driven and arrives through the
/// polling path, not by mutating entries here.
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<Command>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly accepted command as the newest entry.
    pub fn prepend(&mut self, command: Command) {
        self.entries.insert(0, command);
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[Command] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
