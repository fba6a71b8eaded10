//! Vote message.

use crate::gossip::{SignedMessage, VolunteerMessage};
use election_types::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase 1 evidence: a signer endorses the volunteer.
///
/// Carries the sender's other known endorsements so receivers can
/// backfill votes they missed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMessage {
    /// The volunteer being endorsed.
    pub volunteer: VolunteerMessage,

    /// The sender's own endorsement.
    pub endorsement: SignedMessage,

    /// Endorsements the sender has seen from others.
    pub other_votes: BTreeMap<Identity, SignedMessage>,
}

impl VoteMessage {
    /// Create a vote for `volunteer` signed by `signer`.
    pub fn new(volunteer: VolunteerMessage, signer: Identity) -> Self {
        let endorsement = SignedMessage::endorse(&volunteer, signer);
        Self {
            volunteer,
            endorsement,
            other_votes: BTreeMap::new(),
        }
    }

    /// The voting participant.
    pub fn signer(&self) -> Identity {
        self.endorsement.signer
    }
}
