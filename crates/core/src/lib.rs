//! Core types for election rounds: phases, errors, error reporting,
//! outbound batches, and the `RoundMachine` trait.

mod error;
mod message;
mod phase;
mod report;
mod traits;

pub use error::{ErrorClass, RoundError};
pub use message::{extend_message_batch, make_message_batch, MessageBatch};
pub use phase::RoundPhase;
pub use report::{
    CollectingReporter, ErrorMode, ErrorReporter, PanicReporter, TestFailReporter, TracingReporter,
};
pub use traits::RoundMachine;
