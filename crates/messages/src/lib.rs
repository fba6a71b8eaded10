//! Network messages for the replacement election protocol.

pub mod gossip;
mod message;

// Re-export commonly used types
pub use gossip::{
    IAckMessage, InsistMessage, MajorityDecisionMessage, PublishMessage, SignedMessage,
    VolunteerMessage, VoteMessage,
};
pub use message::{Message, MessageKind};
