//! Round phases.

use crate::{ErrorReporter, RoundError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase of one participant's election round.
///
/// Exactly one phase is active at a time. Leaders start in `FedStart`,
/// followers in `AudStart`. `Invalid` is a sentinel that normal execution
/// never enters; observing it means something upstream is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Leader collecting votes.
    FedStart,
    /// Follower passively rebroadcasting.
    AudStart,
    /// Vote quorum observed, collecting majority decisions.
    MajorityDecision,
    /// Decision quorum observed, collecting acknowledgments.
    Insistence,
    /// Waiting for someone else's publish.
    WaitForPublish,
    /// Waiting for an external timer to start the next round.
    WaitForTimeout,
    /// Terminal: the outcome has been published.
    Publishing,
    /// Sentinel, never entered by execution.
    Invalid,
}

impl RoundPhase {
    /// Every phase, in declaration order.
    pub const ALL: [RoundPhase; 8] = [
        RoundPhase::FedStart,
        RoundPhase::AudStart,
        RoundPhase::MajorityDecision,
        RoundPhase::Insistence,
        RoundPhase::WaitForPublish,
        RoundPhase::WaitForTimeout,
        RoundPhase::Publishing,
        RoundPhase::Invalid,
    ];

    /// Initial phase for a leader or follower.
    pub fn initial(is_leader: bool) -> Self {
        if is_leader {
            RoundPhase::FedStart
        } else {
            RoundPhase::AudStart
        }
    }

    /// Progress rank. `None` for the sentinel.
    pub fn rank(&self) -> Option<u8> {
        match self {
            RoundPhase::FedStart | RoundPhase::AudStart => Some(0),
            RoundPhase::MajorityDecision => Some(1),
            RoundPhase::Insistence => Some(2),
            RoundPhase::WaitForPublish => Some(3),
            RoundPhase::WaitForTimeout => Some(4),
            RoundPhase::Publishing => Some(5),
            RoundPhase::Invalid => None,
        }
    }

    /// Check if moving to `next` keeps the phase order monotone.
    ///
    /// Staying put is allowed; moving sideways between the two start
    /// phases, backwards, or into or out of `Invalid` is not.
    pub fn can_advance_to(&self, next: RoundPhase) -> bool {
        match (self.rank(), next.rank()) {
            (Some(current), Some(target)) => target > current || *self == next,
            _ => false,
        }
    }

    /// Check if this is the terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundPhase::Publishing)
    }

    /// Parse a phase name, reporting failures and resolving them to `Invalid`.
    pub fn parse_or_invalid(text: &str, reporter: &dyn ErrorReporter) -> Self {
        match text.parse() {
            Ok(phase) => phase,
            Err(e) => {
                reporter.report(&e);
                RoundPhase::Invalid
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            RoundPhase::FedStart => "FedStart",
            RoundPhase::AudStart => "AudStart",
            RoundPhase::MajorityDecision => "MajorityDecision",
            RoundPhase::Insistence => "Insistence",
            RoundPhase::WaitForPublish => "WaitForPublish",
            RoundPhase::WaitForTimeout => "WaitForTimeout",
            RoundPhase::Publishing => "Publishing",
            RoundPhase::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RoundPhase {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoundPhase::ALL
            .into_iter()
            .find(|phase| phase.name() == s)
            .ok_or_else(|| RoundError::UnknownPhase(s.to_string()))
    }
}
