//! Majority threshold calculation.

use election_types::Roster;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derives and caches the quorum threshold from the active roster.
///
/// The threshold is `active / 2 + 1`, computed on first use and then kept
/// for the lifetime of the round even if the roster changes. Evidence
/// reaches quorum only when its size is strictly greater than the
/// threshold.
///
/// A cached value of 0 means "not computed yet". The formula never yields
/// 0 (an all-inactive roster gives 1), so the marker cannot be confused
/// with a real threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MajorityCalculator {
    cached: usize,
}

impl MajorityCalculator {
    /// Create a calculator with nothing cached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quorum threshold, computing and caching it on first call.
    pub fn quorum(&mut self, roster: &dyn Roster) -> usize {
        if self.cached != 0 {
            return self.cached;
        }

        let active = roster.active_count();
        self.cached = active / 2 + 1;
        debug!(active = active, quorum = self.cached, "Computed majority threshold");
        self.cached
    }

    /// The cached threshold, if computed.
    pub fn cached(&self) -> Option<usize> {
        (self.cached != 0).then_some(self.cached)
    }

    /// Check if `count` strictly exceeds the threshold.
    pub fn exceeded_by(&mut self, roster: &dyn Roster, count: usize) -> bool {
        count > self.quorum(roster)
    }
}
