//! Publish message.

use crate::gossip::{InsistMessage, VolunteerMessage};
use election_types::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Terminal declaration that the round's outcome is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishMessage {
    /// The insist that won acknowledgment.
    pub insist: InsistMessage,

    /// The acker set that exceeded quorum.
    pub iack_signers: BTreeSet<Identity>,

    /// The publishing participant.
    pub signer: Identity,
}

impl PublishMessage {
    /// Publish `insist` with its final acker set.
    pub fn new(insist: InsistMessage, signer: Identity, iack_signers: BTreeSet<Identity>) -> Self {
        Self {
            insist,
            iack_signers,
            signer,
        }
    }

    /// The volunteer that won the election.
    pub fn volunteer(&self) -> &VolunteerMessage {
        &self.insist.volunteer
    }
}
