//! Volunteer message and the endorsement signed over it.

use election_types::{Coordinate, Hash, Identity};
use serde::{Deserialize, Serialize};

/// A candidate offering to fill the missing role at one coordinate.
///
/// Seeds a round. The digest binds every endorsement to this exact
/// candidate and coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerMessage {
    /// The identity proposed as replacement.
    pub candidate: Identity,

    /// The coordinate being contested.
    pub coordinate: Coordinate,

    /// Who sent the volunteer (normally the candidate itself).
    pub signer: Identity,
}

impl VolunteerMessage {
    /// Create a volunteer message signed by the candidate.
    pub fn new(candidate: Identity, coordinate: Coordinate) -> Self {
        Self {
            candidate,
            coordinate,
            signer: candidate,
        }
    }

    /// Digest over candidate and coordinate.
    pub fn digest(&self) -> Hash {
        Hash::from_parts(&[
            b"volunteer",
            &self.candidate.to_le_bytes(),
            &self.coordinate.to_bytes(),
        ])
    }
}

/// One signer's endorsement of a volunteer.
///
/// This is what a round keeps per voter: the vote without its gossip
/// payload. The digest is a commitment, not a signature; verification
/// happens before messages reach the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMessage {
    /// The endorsing participant.
    pub signer: Identity,

    /// Digest over the volunteer digest and the signer.
    pub digest: Hash,
}

impl SignedMessage {
    /// Endorse a volunteer as `signer`.
    pub fn endorse(volunteer: &VolunteerMessage, signer: Identity) -> Self {
        Self {
            signer,
            digest: Self::endorsement_digest(volunteer, signer),
        }
    }

    /// Check this endorsement was made over `volunteer`.
    pub fn endorses(&self, volunteer: &VolunteerMessage) -> bool {
        self.digest == Self::endorsement_digest(volunteer, self.signer)
    }

    fn endorsement_digest(volunteer: &VolunteerMessage, signer: Identity) -> Hash {
        Hash::from_parts(&[
            b"vote",
            volunteer.digest().as_bytes(),
            &signer.to_le_bytes(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volunteer_signed_by_candidate() {
        let volunteer = VolunteerMessage::new(Identity(9), Coordinate::new(5, 1, 0));
        assert_eq!(volunteer.signer, Identity(9));
    }

    #[test]
    fn test_digest_binds_coordinate() {
        let a = VolunteerMessage::new(Identity(9), Coordinate::new(5, 1, 0));
        let b = VolunteerMessage::new(Identity(9), Coordinate::new(5, 1, 1));
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_endorsement_is_bound_to_volunteer() {
        let a = VolunteerMessage::new(Identity(9), Coordinate::new(5, 1, 0));
        let b = VolunteerMessage::new(Identity(8), Coordinate::new(5, 1, 0));

        let endorsement = SignedMessage::endorse(&a, Identity(1));
        assert!(endorsement.endorses(&a));
        assert!(!endorsement.endorses(&b));
        assert_ne!(endorsement, SignedMessage::endorse(&a, Identity(2)));
    }
}
