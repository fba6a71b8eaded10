//! Replacement election round state machine.
//!
//! This crate provides one participant's view of a single replacement
//! election: a volunteer asks to take over a missing leader's slot, and
//! leaders escalate through votes, majority decisions, insists and acks
//! until someone can publish the outcome.
//!
//! # Architecture
//!
//! The round processes messages synchronously, dispatching on phase:
//!
//! - `FedStart` → Vote for the volunteer, collect votes
//! - `MajorityDecision` → Collect decisions once votes exceed quorum
//! - `Insistence` → Insist, acknowledge other insists, collect acks
//! - `Publishing` → Re-emit the cached publish
//! - `AudStart` / `WaitFor*` → Pass messages on with the volunteer
//!
//! Evidence arriving early makes the round jump forward; phases never move
//! backwards. All I/O is performed by the driver via the returned batch.

mod config;
mod draft;
mod evidence;
mod handlers;
mod majority;
mod round;
mod snapshot;

pub use config::RoundConfig;
pub use majority::MajorityCalculator;
pub use round::Round;
pub use snapshot::RoundSnapshot;
