//! Full rounds driven through the public API.

use election_core::{CollectingReporter, MessageBatch, RoundMachine, RoundPhase};
use election_messages::{Message, MessageKind};
use election_round::{Round, RoundConfig};
use election_test_helpers::{
    decision, iack, id, identities, insist, leader_roster, mixed_roster, test_volunteer, vote,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing_test::traced_test;

fn make_leader(n_leaders: u64, self_id: u64) -> Round {
    Round::new(
        leader_roster(n_leaders).into_arc(),
        id(self_id),
        test_volunteer(),
        RoundConfig::default(),
        Arc::new(CollectingReporter::new()),
    )
}

fn kinds(batch: &MessageBatch) -> Vec<MessageKind> {
    batch.iter().map(Message::kind).collect()
}

fn signers(batch: &MessageBatch) -> Vec<u64> {
    batch.iter().map(|m| m.signer().as_u64()).collect()
}

#[traced_test]
#[test]
fn test_three_leader_round_publishes() {
    let mut a = make_leader(3, 1);
    assert_eq!(a.phase(), RoundPhase::FedStart);

    let batch = a.execute(test_volunteer().into()).unwrap();
    assert_eq!(kinds(&batch), vec![MessageKind::Vote]);
    assert_eq!(signers(&batch), vec![1]);

    let batch = a.execute(vote(2).into()).unwrap();
    assert_eq!(batch, vec![Message::from(vote(2))]);
    assert_eq!(a.phase(), RoundPhase::FedStart);

    let batch = a.execute(vote(3).into()).unwrap();
    assert_eq!(kinds(&batch), vec![MessageKind::MajorityDecision]);
    assert_eq!(signers(&batch), vec![1]);
    assert_eq!(a.phase(), RoundPhase::MajorityDecision);

    let b_decision = decision(2, &[1, 2, 3]);
    let batch = a.execute(b_decision.clone().into()).unwrap();
    assert_eq!(batch, vec![Message::from(b_decision)]);

    let batch = a.execute(decision(3, &[1, 2, 3]).into()).unwrap();
    assert_eq!(a.phase(), RoundPhase::Insistence);
    assert_eq!(
        kinds(&batch),
        vec![MessageKind::IAck, MessageKind::Insist, MessageKind::Insist]
    );
    assert_eq!(signers(&batch), vec![1, 1, 1]);
    let Message::IAck(self_ack) = &batch[0] else {
        panic!("expected ack of own insist");
    };
    assert_eq!(self_ack.addressee(), id(1));
    let Message::Insist(own_insist) = batch[2].clone() else {
        panic!("expected own insist");
    };
    assert_eq!(own_insist.majority_decisions.len(), 3);

    let batch = a.execute(insist(2, &[1, 2, 3]).into()).unwrap();
    assert_eq!(kinds(&batch), vec![MessageKind::IAck, MessageKind::Insist]);
    let Message::IAck(ack_for_b) = &batch[0] else {
        panic!("expected ack for B");
    };
    assert_eq!(ack_for_b.addressee(), id(2));
    assert_eq!(ack_for_b.signers, BTreeSet::from([id(1)]));

    let batch = a.execute(iack(own_insist, &[2, 3]).into()).unwrap();
    assert_eq!(a.phase(), RoundPhase::Publishing);
    assert_eq!(kinds(&batch), vec![MessageKind::Publish]);

    let Message::Publish(published) = &batch[0] else {
        panic!("expected publish");
    };
    assert_eq!(published.signer, id(1));
    assert_eq!(
        published.iack_signers,
        identities(3).into_iter().collect::<BTreeSet<_>>()
    );
    assert_eq!(published.volunteer(), &test_volunteer());
    assert!(a.is_finished());
}

#[traced_test]
#[test]
fn test_vote_delivery_order_does_not_matter() {
    let messages: Vec<Message> = vec![
        test_volunteer().into(),
        vote(2).into(),
        vote(3).into(),
        vote(2).into(),
        vote(3).into(),
        test_volunteer().into(),
    ];

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut shuffled = messages.clone();
        shuffled.shuffle(&mut rng);

        let mut round = make_leader(3, 1);
        for message in shuffled {
            round.execute(message).unwrap();
        }

        assert_eq!(round.phase(), RoundPhase::MajorityDecision, "seed {seed}");
        assert_eq!(round.votes().len(), 3, "seed {seed}");
        assert_eq!(
            round.majority_decisions().keys().copied().collect::<Vec<_>>(),
            vec![id(1)],
            "seed {seed}"
        );
    }
}

#[traced_test]
#[test]
fn test_late_joiner_catches_up_from_insist() {
    let mut late = make_leader(5, 4);

    let batch = late.execute(insist(2, &[1, 2, 3]).into()).unwrap();
    assert_eq!(late.phase(), RoundPhase::Insistence);
    assert_eq!(
        kinds(&batch),
        vec![MessageKind::IAck, MessageKind::Insist, MessageKind::Insist]
    );
    assert_eq!(late.votes().len(), 3);
    assert_eq!(late.majority_decisions().len(), 3);
    assert!(late.insistences().contains_key(&id(2)));
    assert!(late.insistences().contains_key(&id(4)));
}

#[traced_test]
#[test]
fn test_follower_only_relays() {
    let mut follower = Round::new(
        mixed_roster(3, 2).into_arc(),
        id(5),
        test_volunteer(),
        RoundConfig::default(),
        Arc::new(CollectingReporter::new()),
    );
    let machine: &mut dyn RoundMachine = &mut follower;
    assert_eq!(machine.phase(), RoundPhase::AudStart);

    for message in [
        Message::from(vote(1)),
        Message::from(decision(2, &[1, 2, 3])),
        Message::from(insist(3, &[1, 2, 3])),
    ] {
        let batch = machine.execute(message.clone()).unwrap();
        assert_eq!(batch, vec![message, Message::from(test_volunteer())]);
        assert_eq!(machine.phase(), RoundPhase::AudStart);
    }
    assert!(!machine.is_finished());
}
