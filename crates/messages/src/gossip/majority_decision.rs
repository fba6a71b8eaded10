//! MajorityDecision message.

use crate::gossip::{SignedMessage, VolunteerMessage};
use election_types::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase 2 evidence: the signer observed a vote quorum.
///
/// `majority_votes` is the vote set the claim was made from.
/// `other_majority_decisions` gossips the decisions the sender knows
/// about; entries there never carry their own gossip map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityDecisionMessage {
    /// The volunteer the decision is about.
    pub volunteer: VolunteerMessage,

    /// Votes the signer used to reach majority.
    pub majority_votes: BTreeMap<Identity, SignedMessage>,

    /// Other decisions the signer knows about.
    pub other_majority_decisions: BTreeMap<Identity, MajorityDecisionMessage>,

    /// The deciding participant.
    pub signer: Identity,
}

impl MajorityDecisionMessage {
    /// Create a decision over `majority_votes` signed by `signer`.
    pub fn new(
        volunteer: VolunteerMessage,
        majority_votes: BTreeMap<Identity, SignedMessage>,
        signer: Identity,
    ) -> Self {
        Self {
            volunteer,
            majority_votes,
            other_majority_decisions: BTreeMap::new(),
            signer,
        }
    }

    /// Copy of this decision with the gossip map cleared.
    pub fn without_peers(&self) -> Self {
        Self {
            volunteer: self.volunteer.clone(),
            majority_votes: self.majority_votes.clone(),
            other_majority_decisions: BTreeMap::new(),
            signer: self.signer,
        }
    }

    /// Replace the gossip map with one-level copies of `decisions`.
    pub fn set_known_decisions(&mut self, decisions: &BTreeMap<Identity, MajorityDecisionMessage>) {
        self.other_majority_decisions = decisions
            .iter()
            .map(|(id, md)| (*id, md.without_peers()))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use election_types::Coordinate;

    fn decision(signer: u64) -> MajorityDecisionMessage {
        let volunteer = VolunteerMessage::new(Identity(9), Coordinate::new(1, 0, 0));
        let votes = [1, 2, 3]
            .into_iter()
            .map(|i| (Identity(i), SignedMessage::endorse(&volunteer, Identity(i))))
            .collect();
        MajorityDecisionMessage::new(volunteer, votes, Identity(signer))
    }

    #[test]
    fn test_known_decisions_are_one_level_deep() {
        let mut inner = decision(2);
        inner.set_known_decisions(&[(Identity(3), decision(3))].into_iter().collect());
        assert_eq!(inner.other_majority_decisions.len(), 1);

        let mut outer = decision(1);
        outer.set_known_decisions(&[(Identity(2), inner)].into_iter().collect());

        let gossiped = &outer.other_majority_decisions[&Identity(2)];
        assert!(gossiped.other_majority_decisions.is_empty());
        assert_eq!(gossiped.majority_votes.len(), 3);
    }

    #[test]
    fn test_without_peers_keeps_votes() {
        let mut md = decision(1);
        md.set_known_decisions(&[(Identity(2), decision(2))].into_iter().collect());
        let stripped = md.without_peers();
        assert!(stripped.other_majority_decisions.is_empty());
        assert_eq!(stripped.majority_votes, md.majority_votes);
        assert_eq!(stripped.signer, Identity(1));
    }
}
