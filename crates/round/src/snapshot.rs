//! Textual snapshots of round state.
//!
//! A snapshot carries the whole round except its collaborators (roster,
//! reporter, config), so restoring into a round built for the same
//! roster reproduces its behavior exactly.

use crate::{MajorityCalculator, Round};
use election_core::{RoundError, RoundPhase};
use election_messages::{
    InsistMessage, MajorityDecisionMessage, PublishMessage, SignedMessage, VolunteerMessage,
    VoteMessage,
};
use election_types::{Coordinate, Identity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Serializable copy of a round's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundSnapshot {
    pub volunteer: VolunteerMessage,
    #[serde(rename = "self")]
    pub self_id: Identity,
    pub votes: BTreeMap<Identity, SignedMessage>,
    pub majority_decisions: BTreeMap<Identity, MajorityDecisionMessage>,
    pub insistences: BTreeMap<Identity, InsistMessage>,
    pub acks: BTreeSet<Identity>,
    pub vote: Option<VoteMessage>,
    pub majority_decision: Option<MajorityDecisionMessage>,
    pub insistence: Option<InsistMessage>,
    pub publish: Option<PublishMessage>,
    pub phase: RoundPhase,
    pub majority: MajorityCalculator,
    pub coordinate: Coordinate,
    /// A poisoned round stays poisoned across a restore.
    #[serde(default)]
    pub aborted: bool,
}

impl Round {
    /// Capture the current state.
    pub fn to_snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            volunteer: self.volunteer.clone(),
            self_id: self.self_id,
            votes: self.votes.clone(),
            majority_decisions: self.majority_decisions.clone(),
            insistences: self.insistences.clone(),
            acks: self.acks.clone(),
            vote: self.vote.clone(),
            majority_decision: self.majority_decision.clone(),
            insistence: self.insistence.clone(),
            publish: self.publish.clone(),
            phase: self.phase,
            majority: self.majority,
            coordinate: self.coordinate,
            aborted: self.aborted,
        }
    }

    /// Replace the current state with `snapshot`.
    pub fn apply_snapshot(&mut self, snapshot: RoundSnapshot) {
        let RoundSnapshot {
            volunteer,
            self_id,
            votes,
            majority_decisions,
            insistences,
            acks,
            vote,
            majority_decision,
            insistence,
            publish,
            phase,
            majority,
            coordinate,
            aborted,
        } = snapshot;

        self.volunteer = volunteer;
        self.self_id = self_id;
        self.votes = votes;
        self.majority_decisions = majority_decisions;
        self.insistences = insistences;
        self.acks = acks;
        self.vote = vote;
        self.majority_decision = majority_decision;
        self.insistence = insistence;
        self.publish = publish;
        self.phase = phase;
        self.majority = majority;
        self.coordinate = coordinate;
        self.aborted = aborted;

        info!(
            self_id = %self.self_id,
            phase = %self.phase,
            aborted = self.aborted,
            "Restored round state"
        );
    }

    /// Serialize the round to text.
    pub fn snapshot(&self) -> Result<String, RoundError> {
        let snapshot = self.to_snapshot();
        let text = if self.config.pretty_snapshots {
            serde_json::to_string_pretty(&snapshot)
        } else {
            serde_json::to_string(&snapshot)
        };

        text.map_err(|e| {
            let err = RoundError::from(e);
            self.reporter.report(&err);
            err
        })
    }

    /// Restore the round from text produced by [`Round::snapshot`].
    ///
    /// All or nothing: on malformed input the error is reported and the
    /// round keeps its current state.
    pub fn restore(&mut self, text: &str) -> Result<(), RoundError> {
        match serde_json::from_str::<RoundSnapshot>(text) {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                Ok(())
            }
            Err(e) => {
                let err = RoundError::from(e);
                debug!(self_id = %self.self_id, error = %err, "Rejected snapshot");
                self.reporter.report(&err);
                Err(err)
            }
        }
    }
}
