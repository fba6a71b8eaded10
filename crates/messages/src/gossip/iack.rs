//! IAck message.

use crate::gossip::InsistMessage;
use election_types::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Acknowledgment of one specific insist, addressed to its signer.
///
/// Participants that see an ack addressed to someone else add themselves
/// to `signers` and pass it on, so the acker set grows as it travels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IAckMessage {
    /// The insist being acknowledged.
    pub insist: InsistMessage,

    /// Everyone who has acknowledged the insist so far.
    pub signers: BTreeSet<Identity>,

    /// The participant that created the ack.
    pub signer: Identity,
}

impl IAckMessage {
    /// Acknowledge `insist` as `signer`.
    pub fn new(insist: InsistMessage, signer: Identity) -> Self {
        Self {
            insist: insist.without_peers(),
            signers: BTreeSet::from([signer]),
            signer,
        }
    }

    /// The participant this ack is addressed to.
    pub fn addressee(&self) -> Identity {
        self.insist.signer
    }

    /// Add an acker. Returns false if it was already present.
    pub fn add_acker(&mut self, identity: Identity) -> bool {
        self.signers.insert(identity)
    }
}
