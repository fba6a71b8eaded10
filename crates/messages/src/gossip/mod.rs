//! Election messages gossiped between participants.
//!
//! All messages are immutable once sent and each names its signer.

mod iack;
mod insist;
mod majority_decision;
mod publish;
mod volunteer;
mod vote;

pub use iack::IAckMessage;
pub use insist::InsistMessage;
pub use majority_decision::MajorityDecisionMessage;
pub use publish::PublishMessage;
pub use volunteer::{SignedMessage, VolunteerMessage};
pub use vote::VoteMessage;
