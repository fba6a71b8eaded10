//! Tagged union over the six election message kinds.

use crate::gossip::{
    IAckMessage, InsistMessage, MajorityDecisionMessage, PublishMessage, VolunteerMessage,
    VoteMessage,
};
use election_types::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Any message a round can receive or emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Candidate proposal that seeds a round.
    Volunteer(VolunteerMessage),

    /// Endorsement of the volunteer.
    Vote(VoteMessage),

    /// Claim of having observed a vote quorum.
    MajorityDecision(MajorityDecisionMessage),

    /// Claim of having observed a decision quorum.
    Insist(InsistMessage),

    /// Acknowledgment of an insist.
    IAck(IAckMessage),

    /// Terminal outcome.
    Publish(PublishMessage),
}

impl Message {
    /// The participant that signed this message.
    pub fn signer(&self) -> Identity {
        match self {
            Message::Volunteer(m) => m.signer,
            Message::Vote(m) => m.signer(),
            Message::MajorityDecision(m) => m.signer,
            Message::Insist(m) => m.signer,
            Message::IAck(m) => m.signer,
            Message::Publish(m) => m.signer,
        }
    }

    /// The kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Volunteer(_) => MessageKind::Volunteer,
            Message::Vote(_) => MessageKind::Vote,
            Message::MajorityDecision(_) => MessageKind::MajorityDecision,
            Message::Insist(_) => MessageKind::Insist,
            Message::IAck(_) => MessageKind::IAck,
            Message::Publish(_) => MessageKind::Publish,
        }
    }
}

impl From<VolunteerMessage> for Message {
    fn from(m: VolunteerMessage) -> Self {
        Message::Volunteer(m)
    }
}

impl From<VoteMessage> for Message {
    fn from(m: VoteMessage) -> Self {
        Message::Vote(m)
    }
}

impl From<MajorityDecisionMessage> for Message {
    fn from(m: MajorityDecisionMessage) -> Self {
        Message::MajorityDecision(m)
    }
}

impl From<InsistMessage> for Message {
    fn from(m: InsistMessage) -> Self {
        Message::Insist(m)
    }
}

impl From<IAckMessage> for Message {
    fn from(m: IAckMessage) -> Self {
        Message::IAck(m)
    }
}

impl From<PublishMessage> for Message {
    fn from(m: PublishMessage) -> Self {
        Message::Publish(m)
    }
}

/// Discriminant of [`Message`], for logging and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Volunteer,
    Vote,
    MajorityDecision,
    Insist,
    IAck,
    Publish,
}

impl MessageKind {
    /// Stable type identifier.
    pub fn message_type_id(&self) -> &'static str {
        match self {
            MessageKind::Volunteer => "election.volunteer",
            MessageKind::Vote => "election.vote",
            MessageKind::MajorityDecision => "election.majority_decision",
            MessageKind::Insist => "election.insist",
            MessageKind::IAck => "election.iack",
            MessageKind::Publish => "election.publish",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Volunteer => "Volunteer",
            MessageKind::Vote => "Vote",
            MessageKind::MajorityDecision => "MajorityDecision",
            MessageKind::Insist => "Insist",
            MessageKind::IAck => "IAck",
            MessageKind::Publish => "Publish",
        };
        write!(f, "{}", name)
    }
}
