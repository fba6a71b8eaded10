//! Core traits for election state machines.

use crate::{MessageBatch, RoundError, RoundPhase};
use election_messages::Message;

/// One participant's election round, as seen by a driver.
///
/// - **Synchronous**: never blocks or awaits
/// - **Deterministic**: same state + message = same batch
/// - **No I/O**: the driver broadcasts whatever batch comes back
///
/// A fatal error means the instance must be discarded; the driver should
/// start a fresh round for the same coordinate rather than stop the process.
pub trait RoundMachine {
    /// Process one inbound message, returning messages to broadcast.
    fn execute(&mut self, message: Message) -> Result<MessageBatch, RoundError>;

    /// Current phase.
    fn phase(&self) -> RoundPhase;

    /// Check if the round reached its terminal phase.
    fn is_finished(&self) -> bool {
        self.phase().is_terminal()
    }
}
