//! Drafting this participant's own messages.
//!
//! Each own message is built once. Later calls hand back the same message
//! with only its "other known" gossip map refreshed from current state.

use crate::Round;
use election_messages::{
    InsistMessage, MajorityDecisionMessage, PublishMessage, VolunteerMessage, VoteMessage,
};
use tracing::debug;

impl Round {
    /// Own vote for `volunteer`.
    pub(crate) fn draft_vote(&mut self, volunteer: &VolunteerMessage) -> VoteMessage {
        if let Some(vote) = self.vote.as_mut() {
            vote.other_votes = self.votes.clone();
            return vote.clone();
        }

        let mut vote = VoteMessage::new(volunteer.clone(), self.self_id);
        vote.other_votes = self.votes.clone();
        self.votes.insert(self.self_id, vote.endorsement.clone());
        self.vote = Some(vote.clone());

        debug!(self_id = %self.self_id, candidate = %volunteer.candidate, "Drafted own vote");
        vote
    }

    /// Own majority decision over the votes accumulated so far.
    pub(crate) fn draft_majority_decision(&mut self) -> MajorityDecisionMessage {
        if let Some(md) = self.majority_decision.as_mut() {
            md.set_known_decisions(&self.majority_decisions);
            return md.clone();
        }

        let mut md =
            MajorityDecisionMessage::new(self.volunteer.clone(), self.votes.clone(), self.self_id);
        md.set_known_decisions(&self.majority_decisions);
        self.majority_decisions.insert(self.self_id, md.without_peers());
        self.majority_decision = Some(md.clone());

        debug!(
            self_id = %self.self_id,
            votes = md.majority_votes.len(),
            "Drafted own majority decision"
        );
        md
    }

    /// Own insist over the decisions accumulated so far.
    ///
    /// Registers the insist in the insistence map and counts this
    /// participant as its first acker.
    pub(crate) fn draft_insist(&mut self) -> InsistMessage {
        if let Some(insist) = self.insistence.as_mut() {
            insist.set_known_insists(&self.insistences);
            return insist.clone();
        }

        let mut insist =
            InsistMessage::new(self.volunteer.clone(), &self.majority_decisions, self.self_id);
        insist.set_known_insists(&self.insistences);
        self.insistences.insert(self.self_id, insist.without_peers());
        self.acks.insert(self.self_id);
        self.insistence = Some(insist.clone());

        debug!(
            self_id = %self.self_id,
            majority_decisions = insist.majority_decisions.len(),
            "Drafted own insist"
        );
        insist
    }

    /// Own publish. Built once from the own insist and the acks at that
    /// moment; never refreshed.
    pub(crate) fn draft_publish(&mut self) -> PublishMessage {
        if let Some(publish) = &self.publish {
            return publish.clone();
        }

        let insist = self.draft_insist();
        let publish = PublishMessage::new(insist, self.self_id, self.acks.clone());
        self.publish = Some(publish.clone());

        debug!(
            self_id = %self.self_id,
            acks = publish.iack_signers.len(),
            "Drafted own publish"
        );
        publish
    }
}
