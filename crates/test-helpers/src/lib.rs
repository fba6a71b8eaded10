//! Test fixtures for election rounds.
//!
//! Everything here is keyed by plain `u64` identities so tests read as
//! "leader 2 voted", "leader 3 decided over votes from 1, 2 and 3".
//! All fixtures contest [`test_coordinate`] for [`test_volunteer`].

use election_messages::{
    IAckMessage, InsistMessage, MajorityDecisionMessage, PublishMessage, SignedMessage,
    VolunteerMessage, VoteMessage,
};
use election_types::{Coordinate, Identity, StaticRoster};
use std::collections::{BTreeMap, BTreeSet};

/// Identity of the volunteering candidate.
pub const CANDIDATE: Identity = Identity(1000);

/// Shorthand for `Identity(n)`.
pub fn id(n: u64) -> Identity {
    Identity(n)
}

/// Identities `1..=n`.
pub fn identities(n: u64) -> Vec<Identity> {
    (1..=n).map(Identity).collect()
}

/// The coordinate every fixture contests.
pub fn test_coordinate() -> Coordinate {
    Coordinate::new(100, 3, 1)
}

/// The volunteer every fixture is about.
pub fn test_volunteer() -> VolunteerMessage {
    VolunteerMessage::new(CANDIDATE, test_coordinate())
}

/// Roster of active leaders `1..=n`.
pub fn leader_roster(n: u64) -> StaticRoster {
    identities(n)
        .into_iter()
        .fold(StaticRoster::new(test_coordinate()), StaticRoster::with_leader)
}

/// Leaders `1..=leaders` followed by followers numbered after them.
pub fn mixed_roster(leaders: u64, followers: u64) -> StaticRoster {
    (leaders + 1..=leaders + followers).fold(leader_roster(leaders), |roster, n| {
        roster.with_follower(Identity(n))
    })
}

/// Endorsements of the test volunteer by `signers`.
pub fn endorsements(signers: &[u64]) -> BTreeMap<Identity, SignedMessage> {
    let volunteer = test_volunteer();
    signers
        .iter()
        .map(|&n| (Identity(n), SignedMessage::endorse(&volunteer, Identity(n))))
        .collect()
}

/// Vote for the test volunteer by `signer`.
pub fn vote(signer: u64) -> VoteMessage {
    VoteMessage::new(test_volunteer(), Identity(signer))
}

/// Decision by `signer` over votes from `voters`.
pub fn decision(signer: u64, voters: &[u64]) -> MajorityDecisionMessage {
    MajorityDecisionMessage::new(test_volunteer(), endorsements(voters), Identity(signer))
}

/// Insist by `signer` over decisions from `deciders`.
///
/// Each decision is made over votes from the same `deciders`.
pub fn insist(signer: u64, deciders: &[u64]) -> InsistMessage {
    let decisions = deciders
        .iter()
        .map(|&n| (Identity(n), decision(n, deciders)))
        .collect();
    InsistMessage::new(test_volunteer(), &decisions, Identity(signer))
}

/// Ack of `insist` carrying `ackers`, created by the first of them.
///
/// # Panics
///
/// Panics if `ackers` is empty.
pub fn iack(insist: InsistMessage, ackers: &[u64]) -> IAckMessage {
    let (&first, rest) = ackers.split_first().expect("at least one acker");
    let mut ack = IAckMessage::new(insist, Identity(first));
    for &n in rest {
        ack.add_acker(Identity(n));
    }
    ack
}

/// Publish by `signer` of its insist over leaders 1..=3, acked by all three.
pub fn publish(signer: u64) -> PublishMessage {
    PublishMessage::new(
        insist(signer, &[1, 2, 3]),
        Identity(signer),
        BTreeSet::from_iter(identities(3)),
    )
}
