//! Phase-specific message handlers.
//!
//! A handler never calls another handler directly. When a message unlocks
//! a transition whose consequence must be processed in the same delivery,
//! the handler returns [`Step::Reprocess`] and the round's trampoline loop
//! feeds the pending message back in.

use crate::Round;
use election_core::{MessageBatch, RoundError, RoundPhase};
use election_messages::{IAckMessage, InsistMessage, Message};
use tracing::debug;

/// Which phase handler processes a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    /// `FedStart`: collecting votes.
    Vote,
    /// `MajorityDecision`: collecting decisions.
    Decision,
    /// `Insistence`: collecting acknowledgments.
    Insistence,
}

/// Message appended after everything a re-entrant step produced.
#[derive(Debug, Clone)]
pub(crate) enum Trailer {
    /// Pass an inbound message on unchanged.
    Forward(Message),
    /// This participant's insist, refreshed when the batch completes.
    OwnInsist,
}

/// Outcome of one handler step.
#[derive(Debug)]
pub(crate) enum Step {
    /// Processing is finished.
    Done(MessageBatch),
    /// Process `message` with `handler`, then append `trailer`.
    Reprocess {
        handler: Handler,
        message: Message,
        trailer: Option<Trailer>,
    },
}

impl Step {
    fn reprocess(handler: Handler, message: impl Into<Message>) -> Self {
        Step::Reprocess {
            handler,
            message: message.into(),
            trailer: None,
        }
    }
}

impl Round {
    /// Run one handler step.
    pub(crate) fn step(&mut self, handler: Handler, message: Message) -> Result<Step, RoundError> {
        match handler {
            Handler::Vote => self.vote_step(message),
            Handler::Decision => self.decision_step(message),
            Handler::Insistence => self.insistence_step(message),
        }
    }

    fn vote_step(&mut self, message: Message) -> Result<Step, RoundError> {
        match message {
            Message::Volunteer(volunteer) => {
                let vote = self.draft_vote(&volunteer);
                Ok(Step::reprocess(Handler::Vote, vote))
            }
            Message::Vote(vote) => {
                if self.add_vote(&vote) {
                    let md = self.draft_majority_decision();
                    self.transition(RoundPhase::MajorityDecision);
                    return Ok(Step::reprocess(Handler::Decision, md));
                }
                Ok(Step::Done(vec![vote.into()]))
            }
            Message::MajorityDecision(md) => {
                // Someone already saw a vote majority; take their evidence.
                self.transition(RoundPhase::MajorityDecision);
                self.absorb_majority_decision(&md);
                let own = self.draft_majority_decision();
                Ok(Step::reprocess(Handler::Decision, own))
            }
            Message::IAck(iack) => Ok(self.forward_iack(Handler::Vote, iack)),
            Message::Insist(insist) => Ok(self.adopt_insist(insist)),
            other @ Message::Publish(_) => Err(self.violation(&other)),
        }
    }

    fn decision_step(&mut self, message: Message) -> Result<Step, RoundError> {
        match message {
            Message::Volunteer(_) => Ok(Step::Done(vec![self.draft_majority_decision().into()])),
            Message::Vote(vote) => {
                self.add_vote(&vote);
                Ok(Step::Done(vec![self.draft_majority_decision().into()]))
            }
            Message::MajorityDecision(md) => {
                if self.add_majority_decision(&md) {
                    self.transition(RoundPhase::Insistence);
                    let insist = self.draft_insist();
                    return Ok(Step::Reprocess {
                        handler: Handler::Insistence,
                        message: insist.into(),
                        trailer: Some(Trailer::OwnInsist),
                    });
                }
                Ok(Step::Done(vec![md.into()]))
            }
            Message::IAck(iack) => Ok(self.forward_iack(Handler::Decision, iack)),
            Message::Insist(insist) => Ok(self.adopt_insist(insist)),
            other @ Message::Publish(_) => Err(self.violation(&other)),
        }
    }

    fn insistence_step(&mut self, message: Message) -> Result<Step, RoundError> {
        match message {
            Message::Volunteer(_) => Ok(Step::Done(vec![self.draft_insist().into()])),
            Message::Vote(vote) => {
                self.add_vote(&vote);
                Ok(Step::Done(vec![self.draft_insist().into()]))
            }
            Message::MajorityDecision(md) => {
                self.add_majority_decision(&md);
                Ok(Step::Done(vec![self.draft_insist().into()]))
            }
            Message::IAck(mut iack) => {
                self.absorb_insist(&iack.insist);

                if iack.addressee() == self.self_id {
                    if self.add_iack(&iack) {
                        self.transition(RoundPhase::Publishing);
                        return Ok(Step::Done(vec![self.draft_publish().into()]));
                    }
                    return Ok(Step::Done(vec![self.draft_insist().into()]));
                }

                // Not ours: second it and pass it on.
                iack.add_acker(self.self_id);
                debug!(
                    addressee = %iack.addressee(),
                    ackers = iack.signers.len(),
                    "Seconded ack addressed to peer"
                );
                Ok(Step::Done(vec![iack.into(), self.draft_insist().into()]))
            }
            Message::Insist(insist) => {
                let iack = IAckMessage::new(insist.clone(), self.self_id);
                self.absorb_insist(&insist);
                Ok(Step::Done(vec![iack.into(), self.draft_insist().into()]))
            }
            other @ Message::Publish(_) => Err(self.violation(&other)),
        }
    }

    /// Process the insist inside an ack with `handler`, then forward the ack.
    fn forward_iack(&mut self, handler: Handler, iack: IAckMessage) -> Step {
        let insist = iack.insist.clone();
        Step::Reprocess {
            handler,
            message: insist.into(),
            trailer: Some(Trailer::Forward(iack.into())),
        }
    }

    /// Jump straight to insistence on seeing someone else's insist.
    fn adopt_insist(&mut self, insist: InsistMessage) -> Step {
        self.transition(RoundPhase::Insistence);
        self.absorb_insist(&insist);
        self.draft_insist();
        Step::Reprocess {
            handler: Handler::Insistence,
            message: insist.into(),
            trailer: Some(Trailer::OwnInsist),
        }
    }

    fn violation(&self, message: &Message) -> RoundError {
        RoundError::ProtocolViolation {
            phase: self.phase,
            kind: message.kind(),
        }
    }
}
