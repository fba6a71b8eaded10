//! Error types for election rounds.

use crate::RoundPhase;
use election_messages::MessageKind;
use thiserror::Error;

/// Errors raised while driving a round.
#[derive(Debug, Error)]
pub enum RoundError {
    /// Inbound message kind has no defined transition in the current phase.
    #[error("Protocol violation: {kind} message is undefined in phase {phase}")]
    ProtocolViolation {
        /// Phase the round was in.
        phase: RoundPhase,
        /// Kind of the offending message.
        kind: MessageKind,
    },

    /// Dispatch reached a phase with no behavior.
    #[error("Round hit undefined phase {0}")]
    UndefinedPhase(RoundPhase),

    /// Re-entrant processing did not settle within the configured bound.
    #[error("Re-entrant processing exceeded {limit} steps")]
    ReentryLimit {
        /// The configured step bound.
        limit: usize,
    },

    /// A previous fatal error poisoned this round.
    #[error("Round aborted after a fatal error")]
    Aborted,

    /// Snapshot text could not be produced or parsed.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unrecognized phase name.
    #[error("Unknown round phase {0:?}")]
    UnknownPhase(String),

    /// Unrecognized error mode name.
    #[error("Unknown error mode {0:?}")]
    UnknownErrorMode(String),
}

/// Coarse error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Message invalid for the phase; the round must be discarded.
    ProtocolViolation,
    /// Malformed snapshot text.
    Serialization,
    /// Bad textual configuration.
    Configuration,
    /// The `Invalid` phase was observed.
    InvariantSentinel,
}

impl RoundError {
    /// Taxonomy class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            RoundError::ProtocolViolation { .. }
            | RoundError::ReentryLimit { .. }
            | RoundError::Aborted => ErrorClass::ProtocolViolation,
            RoundError::UndefinedPhase(_) => ErrorClass::InvariantSentinel,
            RoundError::Serialization(_) => ErrorClass::Serialization,
            RoundError::UnknownPhase(_) | RoundError::UnknownErrorMode(_) => {
                ErrorClass::Configuration
            }
        }
    }

    /// Check if the round that raised this error must be discarded.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::ProtocolViolation | ErrorClass::InvariantSentinel
        )
    }
}
