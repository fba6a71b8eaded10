//! Merging peer evidence into a round.
//!
//! Every accumulated map is keyed by signer: a later message from the same
//! signer replaces the earlier entry. Stored decisions and insists never
//! keep their own gossip maps; absorption unpacks those first.

use crate::Round;
use election_messages::{
    IAckMessage, InsistMessage, MajorityDecisionMessage, SignedMessage, VoteMessage,
};
use election_types::Identity;
use std::collections::BTreeMap;
use tracing::debug;

impl Round {
    /// Upsert a vote. Returns true if the vote set now exceeds quorum.
    pub(crate) fn add_vote(&mut self, vote: &VoteMessage) -> bool {
        self.votes.insert(vote.signer(), vote.endorsement.clone());
        self.exceeds_quorum("votes", self.votes.len())
    }

    /// Upsert a decision. Returns true if the decision set now exceeds quorum.
    pub(crate) fn add_majority_decision(&mut self, md: &MajorityDecisionMessage) -> bool {
        self.majority_decisions.insert(md.signer, md.without_peers());
        self.exceeds_quorum("majority_decisions", self.majority_decisions.len())
    }

    /// Merge the acker set of an ack addressed to us. Returns true if the
    /// ack set now exceeds quorum.
    pub(crate) fn add_iack(&mut self, iack: &IAckMessage) -> bool {
        self.acks.extend(iack.signers.iter().copied());
        self.exceeds_quorum("acks", self.acks.len())
    }

    /// Take every endorsement from a vote map.
    pub(crate) fn copy_votes(&mut self, votes: &BTreeMap<Identity, SignedMessage>) {
        for (signer, endorsement) in votes {
            self.votes.insert(*signer, endorsement.clone());
        }
    }

    /// Take a decision plus the votes and decisions it carries.
    pub(crate) fn absorb_majority_decision(&mut self, md: &MajorityDecisionMessage) {
        self.majority_decisions.insert(md.signer, md.without_peers());
        self.copy_votes(&md.majority_votes);

        for (signer, other) in &md.other_majority_decisions {
            self.majority_decisions.insert(*signer, other.without_peers());
            self.copy_votes(&other.majority_votes);
        }
    }

    /// Take an insist plus the decisions, votes and insists it carries.
    pub(crate) fn absorb_insist(&mut self, insist: &InsistMessage) {
        for md in insist.majority_decisions.values() {
            self.absorb_majority_decision(md);
        }

        self.insistences.insert(insist.signer, insist.without_peers());
        for (signer, other) in &insist.other_insists {
            for md in other.majority_decisions.values() {
                self.absorb_majority_decision(md);
            }
            self.insistences.insert(*signer, other.without_peers());
        }

        debug!(
            from = %insist.signer,
            votes = self.votes.len(),
            majority_decisions = self.majority_decisions.len(),
            insistences = self.insistences.len(),
            "Absorbed insist"
        );
    }

    fn exceeds_quorum(&mut self, set: &'static str, count: usize) -> bool {
        let reached = self.majority.exceeded_by(self.roster.as_ref(), count);
        debug!(
            set = set,
            count = count,
            quorum = ?self.majority.cached(),
            reached = reached,
            "Quorum check"
        );
        reached
    }
}
