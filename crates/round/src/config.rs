//! Round configuration.

/// Configuration for an election round.
#[derive(Debug, Clone)]
pub struct RoundConfig {
    /// Maximum handler steps one inbound message may trigger.
    ///
    /// A single delivery can re-enter the handlers through self-generated
    /// messages (volunteer → own vote → own decision → own insist). The
    /// deepest chain the protocol produces is four steps.
    pub max_reentry_steps: usize,

    /// Whether snapshots are pretty-printed.
    pub pretty_snapshots: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_reentry_steps: 8,
            pretty_snapshots: false,
        }
    }
}

impl RoundConfig {
    /// Set the re-entry step bound.
    pub fn with_max_reentry_steps(mut self, max_reentry_steps: usize) -> Self {
        self.max_reentry_steps = max_reentry_steps;
        self
    }

    /// Enable or disable pretty-printed snapshots.
    pub fn with_pretty_snapshots(mut self, pretty_snapshots: bool) -> Self {
        self.pretty_snapshots = pretty_snapshots;
        self
    }
}
