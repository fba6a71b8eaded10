//! Insist message.

use crate::gossip::{MajorityDecisionMessage, VolunteerMessage};
use election_types::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase 3 evidence: the signer observed a decision quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsistMessage {
    /// The volunteer the insistence is about.
    pub volunteer: VolunteerMessage,

    /// Decisions the signer used to reach majority.
    pub majority_decisions: BTreeMap<Identity, MajorityDecisionMessage>,

    /// Other insists the signer knows about.
    pub other_insists: BTreeMap<Identity, InsistMessage>,

    /// The insisting participant.
    pub signer: Identity,
}

impl InsistMessage {
    /// Create an insist over `majority_decisions` signed by `signer`.
    pub fn new(
        volunteer: VolunteerMessage,
        majority_decisions: &BTreeMap<Identity, MajorityDecisionMessage>,
        signer: Identity,
    ) -> Self {
        Self {
            volunteer,
            majority_decisions: majority_decisions
                .iter()
                .map(|(id, md)| (*id, md.without_peers()))
                .collect(),
            other_insists: BTreeMap::new(),
            signer,
        }
    }

    /// Copy of this insist with the gossip map cleared.
    pub fn without_peers(&self) -> Self {
        Self {
            volunteer: self.volunteer.clone(),
            majority_decisions: self.majority_decisions.clone(),
            other_insists: BTreeMap::new(),
            signer: self.signer,
        }
    }

    /// Replace the gossip map with one-level copies of `insists`.
    pub fn set_known_insists(&mut self, insists: &BTreeMap<Identity, InsistMessage>) {
        self.other_insists = insists
            .iter()
            .map(|(id, insist)| (*id, insist.without_peers()))
            .collect();
    }
}
