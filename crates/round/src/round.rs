//! The election round state machine.

use crate::handlers::{Handler, Step, Trailer};
use crate::{MajorityCalculator, RoundConfig};
use election_core::{
    make_message_batch, ErrorReporter, MessageBatch, RoundError, RoundMachine, RoundPhase,
};
use election_messages::{
    InsistMessage, MajorityDecisionMessage, Message, PublishMessage, SignedMessage,
    VolunteerMessage, VoteMessage,
};
use election_types::{Coordinate, Identity, Roster};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One participant's view of one replacement election.
///
/// Holds everything this participant has learned (votes, decisions,
/// insists, acks, each keyed by signer) and the messages it has drafted
/// itself. Processing a message is a synchronous state transition that
/// returns the batch to broadcast; nothing is shared, so no locking.
pub struct Round {
    /// Authority roster (single source of truth for membership/roles).
    pub(crate) roster: Arc<dyn Roster>,

    /// Where recoverable errors go.
    pub(crate) reporter: Arc<dyn ErrorReporter>,

    pub(crate) config: RoundConfig,

    /// The candidate we are trying to get a majority to pass.
    pub(crate) volunteer: VolunteerMessage,

    /// This participant.
    pub(crate) self_id: Identity,

    // Accumulated evidence. Crossing quorum on these triggers transitions.
    pub(crate) votes: BTreeMap<Identity, SignedMessage>,
    pub(crate) majority_decisions: BTreeMap<Identity, MajorityDecisionMessage>,
    pub(crate) insistences: BTreeMap<Identity, InsistMessage>,
    pub(crate) acks: BTreeSet<Identity>,

    // Own drafted messages, each built at most once.
    pub(crate) vote: Option<VoteMessage>,
    pub(crate) majority_decision: Option<MajorityDecisionMessage>,
    pub(crate) insistence: Option<InsistMessage>,
    pub(crate) publish: Option<PublishMessage>,

    pub(crate) phase: RoundPhase,

    /// Never read directly; always go through [`Round::quorum`].
    pub(crate) majority: MajorityCalculator,

    /// The contested coordinate, passed through unchanged.
    pub(crate) coordinate: Coordinate,

    /// Set after a fatal error; every later message is refused.
    pub(crate) aborted: bool,
}

impl Round {
    /// Create a round for `self_id` on the roster's contested coordinate.
    ///
    /// Leaders start in `FedStart`, everyone else in `AudStart`.
    pub fn new(
        roster: Arc<dyn Roster>,
        self_id: Identity,
        volunteer: VolunteerMessage,
        config: RoundConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let coordinate = roster.coordinate();
        if volunteer.coordinate != coordinate {
            warn!(
                volunteer_coordinate = %volunteer.coordinate,
                roster_coordinate = %coordinate,
                "Volunteer coordinate differs from contested coordinate"
            );
        }

        if !roster.is_member(self_id) {
            warn!(self_id = %self_id, "Round participant is not in the roster");
        }

        let phase = RoundPhase::initial(roster.is_leader(self_id));
        info!(
            self_id = %self_id,
            candidate = %volunteer.candidate,
            coordinate = %coordinate,
            phase = %phase,
            "Created election round"
        );

        Self {
            roster,
            reporter,
            config,
            volunteer,
            self_id,
            votes: BTreeMap::new(),
            majority_decisions: BTreeMap::new(),
            insistences: BTreeMap::new(),
            acks: BTreeSet::new(),
            vote: None,
            majority_decision: None,
            insistence: None,
            publish: None,
            phase,
            majority: MajorityCalculator::new(),
            coordinate,
            aborted: false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// This participant.
    pub fn self_id(&self) -> Identity {
        self.self_id
    }

    /// The volunteer this round is deciding on.
    pub fn volunteer(&self) -> &VolunteerMessage {
        &self.volunteer
    }

    /// The contested coordinate.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Accumulated endorsements by signer.
    pub fn votes(&self) -> &BTreeMap<Identity, SignedMessage> {
        &self.votes
    }

    /// Accumulated majority decisions by signer.
    pub fn majority_decisions(&self) -> &BTreeMap<Identity, MajorityDecisionMessage> {
        &self.majority_decisions
    }

    /// Accumulated insists by signer.
    pub fn insistences(&self) -> &BTreeMap<Identity, InsistMessage> {
        &self.insistences
    }

    /// Participants that acknowledged this participant's insist.
    pub fn acks(&self) -> &BTreeSet<Identity> {
        &self.acks
    }

    /// The published outcome, once there is one.
    pub fn publish(&self) -> Option<&PublishMessage> {
        self.publish.as_ref()
    }

    /// Check if a fatal error poisoned this round.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Quorum threshold (cached after first use).
    pub fn quorum(&mut self) -> usize {
        self.majority.quorum(self.roster.as_ref())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Execution
    // ═══════════════════════════════════════════════════════════════════════

    /// Process one inbound message and return the batch to broadcast.
    ///
    /// A fatal error aborts the round: this and every later call fail, and
    /// the driver should discard the instance.
    pub fn execute(&mut self, message: Message) -> Result<MessageBatch, RoundError> {
        if self.aborted {
            return Err(RoundError::Aborted);
        }

        debug!(
            self_id = %self.self_id,
            phase = %self.phase,
            message_type = message.kind().message_type_id(),
            from = %message.signer(),
            "Executing message"
        );

        let result = match self.phase {
            RoundPhase::FedStart => self.run(Handler::Vote, message),
            RoundPhase::MajorityDecision => self.run(Handler::Decision, message),
            RoundPhase::Insistence => self.run(Handler::Insistence, message),
            // Followers and waiting leaders only help gossip.
            RoundPhase::AudStart | RoundPhase::WaitForPublish | RoundPhase::WaitForTimeout => Ok(
                make_message_batch(message, [Message::from(self.volunteer.clone())]),
            ),
            RoundPhase::Publishing => Ok(vec![self.draft_publish().into()]),
            RoundPhase::Invalid => Err(RoundError::UndefinedPhase(self.phase)),
        };

        if let Err(e) = &result {
            if e.is_fatal() {
                error!(
                    self_id = %self.self_id,
                    phase = %self.phase,
                    error = %e,
                    "Aborting election round"
                );
                self.aborted = true;
            }
        }

        result
    }

    /// Trampoline: run handler steps until one finishes, then append the
    /// stacked trailers innermost first.
    fn run(&mut self, mut handler: Handler, mut message: Message) -> Result<MessageBatch, RoundError> {
        let limit = self.config.max_reentry_steps;
        let mut trailers: Vec<Trailer> = Vec::new();

        for _ in 0..limit {
            match self.step(handler, message)? {
                Step::Done(mut batch) => {
                    for trailer in trailers.into_iter().rev() {
                        let next = match trailer {
                            Trailer::Forward(m) => m,
                            Trailer::OwnInsist => self.draft_insist().into(),
                        };
                        batch.push(next);
                    }
                    return Ok(batch);
                }
                Step::Reprocess {
                    handler: next_handler,
                    message: pending,
                    trailer,
                } => {
                    trailers.extend(trailer);
                    handler = next_handler;
                    message = pending;
                }
            }
        }

        Err(RoundError::ReentryLimit { limit })
    }

    /// Move to `next` if that keeps phases monotone.
    pub(crate) fn transition(&mut self, next: RoundPhase) {
        if self.phase == next {
            return;
        }

        if !self.phase.can_advance_to(next) {
            warn!(
                self_id = %self.self_id,
                from = %self.phase,
                to = %next,
                "Refusing phase regression"
            );
            return;
        }

        info!(
            self_id = %self.self_id,
            from = %self.phase,
            to = %next,
            "Round phase transition"
        );
        self.phase = next;
    }

    /// Driver hook: stop participating and wait for someone's publish.
    ///
    /// Returns false if the round is already past that point.
    pub fn enter_wait_for_publish(&mut self) -> bool {
        self.transition(RoundPhase::WaitForPublish);
        self.phase == RoundPhase::WaitForPublish
    }

    /// Driver hook: wait for an external timer to start a new round.
    ///
    /// Returns false if the round is already past that point.
    pub fn enter_wait_for_timeout(&mut self) -> bool {
        self.transition(RoundPhase::WaitForTimeout);
        self.phase == RoundPhase::WaitForTimeout
    }
}

impl RoundMachine for Round {
    fn execute(&mut self, message: Message) -> Result<MessageBatch, RoundError> {
        Round::execute(self, message)
    }

    fn phase(&self) -> RoundPhase {
        self.phase
    }
}

impl std::fmt::Debug for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Round")
            .field("self_id", &self.self_id)
            .field("phase", &self.phase)
            .field("coordinate", &self.coordinate)
            .field("votes", &self.votes.len())
            .field("majority_decisions", &self.majority_decisions.len())
            .field("insistences", &self.insistences.len())
            .field("acks", &self.acks.len())
            .field("aborted", &self.aborted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_round_with_config, make_test_round};
    use election_core::CollectingReporter;
    use election_messages::{IAckMessage, MessageKind};
    use election_test_helpers::{
        decision, insist, mixed_roster, publish, test_volunteer, vote,
    };
    use tracing_test::traced_test;

    fn kinds(batch: &MessageBatch) -> Vec<MessageKind> {
        batch.iter().map(Message::kind).collect()
    }

    fn into_insistence(round: &mut Round) {
        round.execute(insist(2, &[1, 2, 3]).into()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Insistence);
    }

    #[traced_test]
    #[test]
    fn test_initial_phase_by_role() {
        let roster = mixed_roster(3, 1).into_arc();
        let reporter = Arc::new(CollectingReporter::new());

        let leader = Round::new(
            roster.clone(),
            Identity(1),
            test_volunteer(),
            RoundConfig::default(),
            reporter.clone(),
        );
        let follower = Round::new(
            roster,
            Identity(4),
            test_volunteer(),
            RoundConfig::default(),
            reporter,
        );

        assert_eq!(leader.phase(), RoundPhase::FedStart);
        assert_eq!(follower.phase(), RoundPhase::AudStart);
    }

    #[traced_test]
    #[test]
    fn test_non_member_self_is_warned_and_follows() {
        let round = make_test_round(3, 9);
        assert_eq!(round.phase(), RoundPhase::AudStart);
        assert!(logs_contain("Round participant is not in the roster"));
    }

    #[traced_test]
    #[test]
    fn test_volunteer_emits_own_vote() {
        let mut round = make_test_round(3, 1);

        let batch = round.execute(test_volunteer().into()).unwrap();
        assert_eq!(kinds(&batch), vec![MessageKind::Vote]);
        assert_eq!(batch[0].signer(), Identity(1));
        assert_eq!(round.votes().len(), 1);
        assert_eq!(round.phase(), RoundPhase::FedStart);
    }

    #[traced_test]
    #[test]
    fn test_two_votes_do_not_reach_majority_of_three() {
        let mut round = make_test_round(3, 1);

        let batch = round.execute(vote(2).into()).unwrap();
        assert_eq!(batch, vec![Message::from(vote(2))]);
        round.execute(vote(3).into()).unwrap();
        assert_eq!(round.votes().len(), 2);
        assert_eq!(round.phase(), RoundPhase::FedStart);

        // Own vote is the third distinct signer.
        let batch = round.execute(test_volunteer().into()).unwrap();
        assert_eq!(round.phase(), RoundPhase::MajorityDecision);
        assert_eq!(kinds(&batch), vec![MessageKind::MajorityDecision]);
        assert_eq!(batch[0].signer(), Identity(1));
    }

    #[traced_test]
    #[test]
    fn test_duplicate_vote_keeps_size() {
        let mut round = make_test_round(3, 1);
        round.execute(vote(2).into()).unwrap();
        round.execute(vote(2).into()).unwrap();
        round.execute(vote(2).into()).unwrap();
        assert_eq!(round.votes().len(), 1);
        assert_eq!(round.phase(), RoundPhase::FedStart);
    }

    #[traced_test]
    #[test]
    fn test_decision_in_fed_start_jumps_forward() {
        let mut round = make_test_round(3, 1);

        let batch = round.execute(decision(2, &[1, 2, 3]).into()).unwrap();
        assert_eq!(round.phase(), RoundPhase::MajorityDecision);
        assert_eq!(kinds(&batch), vec![MessageKind::MajorityDecision]);

        let Message::MajorityDecision(own) = &batch[0] else {
            panic!("expected own decision");
        };
        assert_eq!(own.signer, Identity(1));
        assert_eq!(own.majority_votes.len(), 3);
        assert_eq!(round.votes().len(), 3);
        assert_eq!(round.majority_decisions().len(), 2);
    }

    #[traced_test]
    #[test]
    fn test_decision_phase_rebroadcasts_own_decision() {
        let mut round = make_test_round(3, 1);
        round.execute(decision(2, &[1, 2, 3]).into()).unwrap();

        let batch = round.execute(test_volunteer().into()).unwrap();
        assert_eq!(kinds(&batch), vec![MessageKind::MajorityDecision]);
        assert_eq!(batch[0].signer(), Identity(1));

        let batch = round.execute(vote(3).into()).unwrap();
        assert_eq!(kinds(&batch), vec![MessageKind::MajorityDecision]);
        assert_eq!(round.phase(), RoundPhase::MajorityDecision);
    }

    #[traced_test]
    #[test]
    fn test_insist_in_fed_start_skips_to_insistence() {
        let mut round = make_test_round(3, 1);

        let batch = round.execute(insist(2, &[1, 2, 3]).into()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Insistence);
        assert_eq!(
            kinds(&batch),
            vec![MessageKind::IAck, MessageKind::Insist, MessageKind::Insist]
        );

        let Message::IAck(ack) = &batch[0] else {
            panic!("expected ack first");
        };
        assert_eq!(ack.addressee(), Identity(2));
        assert_eq!(ack.signers, BTreeSet::from([Identity(1)]));
        assert_eq!(batch[2].signer(), Identity(1));

        assert_eq!(round.votes().len(), 3);
        assert_eq!(round.majority_decisions().len(), 3);
    }

    #[traced_test]
    #[test]
    fn test_ack_in_fed_start_is_forwarded_last() {
        let mut round = make_test_round(3, 1);
        let ack = IAckMessage::new(insist(2, &[1, 2, 3]), Identity(3));

        let batch = round.execute(ack.clone().into()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Insistence);
        assert_eq!(batch.last(), Some(&Message::from(ack)));
        assert_eq!(
            kinds(&batch),
            vec![
                MessageKind::IAck,
                MessageKind::Insist,
                MessageKind::Insist,
                MessageKind::IAck
            ]
        );
    }

    #[traced_test]
    #[test]
    fn test_ack_in_decision_phase_is_forwarded_last() {
        let mut round = make_test_round(3, 1);
        round.execute(decision(2, &[1, 2, 3]).into()).unwrap();

        let ack = IAckMessage::new(insist(2, &[1, 2, 3]), Identity(3));
        let batch = round.execute(ack.clone().into()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Insistence);
        assert_eq!(batch.last(), Some(&Message::from(ack)));
    }

    #[traced_test]
    #[test]
    fn test_insistence_never_regresses() {
        let mut round = make_test_round(3, 1);
        into_insistence(&mut round);

        for message in [
            Message::from(test_volunteer()),
            Message::from(vote(3)),
            Message::from(decision(3, &[1, 2, 3])),
        ] {
            let batch = round.execute(message).unwrap();
            assert_eq!(kinds(&batch), vec![MessageKind::Insist]);
            assert_eq!(batch[0].signer(), Identity(1));
            assert_eq!(round.phase(), RoundPhase::Insistence);
        }
    }

    #[traced_test]
    #[test]
    fn test_insist_in_insistence_is_acknowledged() {
        let mut round = make_test_round(3, 1);
        into_insistence(&mut round);

        let batch = round.execute(insist(3, &[1, 2, 3]).into()).unwrap();
        assert_eq!(kinds(&batch), vec![MessageKind::IAck, MessageKind::Insist]);
        let Message::IAck(ack) = &batch[0] else {
            panic!("expected ack");
        };
        assert_eq!(ack.addressee(), Identity(3));
        assert_eq!(ack.signer, Identity(1));
    }

    #[traced_test]
    #[test]
    fn test_ack_for_peer_is_seconded() {
        let mut round = make_test_round(3, 1);
        into_insistence(&mut round);

        let ack = IAckMessage::new(insist(2, &[1, 2, 3]), Identity(3));
        let batch = round.execute(ack.into()).unwrap();

        assert_eq!(kinds(&batch), vec![MessageKind::IAck, MessageKind::Insist]);
        let Message::IAck(seconded) = &batch[0] else {
            panic!("expected ack");
        };
        assert_eq!(seconded.signers, BTreeSet::from([Identity(1), Identity(3)]));
        assert_eq!(seconded.addressee(), Identity(2));
        assert_eq!(round.phase(), RoundPhase::Insistence);
    }

    #[traced_test]
    #[test]
    fn test_acks_for_self_publish_on_quorum() {
        let mut round = make_test_round(3, 1);
        into_insistence(&mut round);
        assert_eq!(round.acks(), &BTreeSet::from([Identity(1)]));

        // {1, 2} is not more than 2.
        let ack = IAckMessage::new(insist(1, &[1, 2, 3]), Identity(2));
        let batch = round.execute(ack.into()).unwrap();
        assert_eq!(kinds(&batch), vec![MessageKind::Insist]);
        assert_eq!(round.phase(), RoundPhase::Insistence);

        let ack = IAckMessage::new(insist(1, &[1, 2, 3]), Identity(3));
        let batch = round.execute(ack.into()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Publishing);
        assert_eq!(kinds(&batch), vec![MessageKind::Publish]);

        let published = round.publish().cloned().unwrap();
        assert_eq!(
            published.iack_signers,
            BTreeSet::from([Identity(1), Identity(2), Identity(3)])
        );
        assert_eq!(published.volunteer(), &test_volunteer());

        // Terminal: anything yields the cached publish.
        let batch = round.execute(vote(2).into()).unwrap();
        assert_eq!(batch, vec![Message::from(published)]);
        assert!(RoundMachine::is_finished(&round));
    }

    #[traced_test]
    #[test]
    fn test_publish_before_terminal_aborts_round() {
        let mut round = make_test_round(3, 1);

        let err = round.execute(publish(2).into()).unwrap_err();
        assert!(matches!(
            err,
            RoundError::ProtocolViolation {
                phase: RoundPhase::FedStart,
                kind: MessageKind::Publish
            }
        ));
        assert!(round.is_aborted());
        assert!(matches!(
            round.execute(test_volunteer().into()),
            Err(RoundError::Aborted)
        ));
    }

    #[traced_test]
    #[test]
    fn test_publish_in_insistence_is_violation() {
        let mut round = make_test_round(3, 1);
        into_insistence(&mut round);

        let err = round.execute(publish(2).into()).unwrap_err();
        assert!(matches!(
            err,
            RoundError::ProtocolViolation {
                phase: RoundPhase::Insistence,
                ..
            }
        ));
    }

    #[traced_test]
    #[test]
    fn test_follower_rebroadcasts_with_volunteer() {
        let roster = mixed_roster(3, 1).into_arc();
        let mut round = Round::new(
            roster,
            Identity(4),
            test_volunteer(),
            RoundConfig::default(),
            Arc::new(CollectingReporter::new()),
        );

        let batch = round.execute(vote(2).into()).unwrap();
        assert_eq!(
            batch,
            vec![Message::from(vote(2)), Message::from(test_volunteer())]
        );
        assert_eq!(round.phase(), RoundPhase::AudStart);
        assert!(round.votes().is_empty());
    }

    #[traced_test]
    #[test]
    fn test_wait_phases_pass_through() {
        let mut round = make_test_round(3, 1);
        assert!(round.enter_wait_for_timeout());

        let batch = round.execute(decision(2, &[1, 2, 3]).into()).unwrap();
        assert_eq!(
            kinds(&batch),
            vec![MessageKind::MajorityDecision, MessageKind::Volunteer]
        );
        assert!(round.majority_decisions().is_empty());

        assert!(!round.enter_wait_for_publish());
        assert_eq!(round.phase(), RoundPhase::WaitForTimeout);
    }

    #[traced_test]
    #[test]
    fn test_wait_for_publish_passes_through() {
        let mut round = make_test_round(3, 1);
        assert!(round.enter_wait_for_publish());
        assert_eq!(round.phase(), RoundPhase::WaitForPublish);

        let batch = round.execute(vote(2).into()).unwrap();
        assert_eq!(
            batch,
            vec![Message::from(vote(2)), Message::from(test_volunteer())]
        );
        assert!(round.votes().is_empty());
        assert_eq!(round.phase(), RoundPhase::WaitForPublish);

        // Timeout still lies ahead of publish-wait.
        assert!(round.enter_wait_for_timeout());
    }

    #[traced_test]
    #[test]
    fn test_reentry_limit_is_fatal() {
        let mut round = make_round_with_config(
            3,
            1,
            RoundConfig::default().with_max_reentry_steps(1),
        );

        let err = round.execute(test_volunteer().into()).unwrap_err();
        assert!(matches!(err, RoundError::ReentryLimit { limit: 1 }));
        assert!(round.is_aborted());
    }
}
