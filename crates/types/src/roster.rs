//! Roster trait and static implementation.

use crate::{Coordinate, Identity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether a roster member currently counts towards quorum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantStatus {
    /// Excluded from quorum arithmetic.
    Inactive,
    /// Counted towards quorum.
    Active,
}

impl ParticipantStatus {
    /// Check if this status counts towards quorum.
    pub fn is_active(&self) -> bool {
        matches!(self, ParticipantStatus::Active)
    }
}

/// Leader ("federated") or follower ("audit") classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Drives the decision directly.
    Leader,
    /// Seconds decisions without authoring them.
    Follower,
}

/// Authority roster consumed by an election round.
///
/// Leader determination lives outside the round; the round only asks
/// who is a member, who is active, who leads, and which coordinate is
/// being contested.
pub trait Roster: Send + Sync {
    /// Ordered roster members.
    fn members(&self) -> Vec<Identity>;

    /// Activity status of a member, `None` if not in the roster.
    fn status(&self, identity: Identity) -> Option<ParticipantStatus>;

    /// Role of a member, `None` if not in the roster.
    fn role(&self, identity: Identity) -> Option<Role>;

    /// The coordinate being contested.
    fn coordinate(&self) -> Coordinate;

    // Derived methods

    /// Check if an identity is a roster member.
    fn is_member(&self, identity: Identity) -> bool {
        self.status(identity).is_some()
    }

    /// Check if an identity is classified as a leader.
    fn is_leader(&self, identity: Identity) -> bool {
        self.role(identity) == Some(Role::Leader)
    }

    /// Check if an identity counts towards quorum.
    fn is_active(&self, identity: Identity) -> bool {
        self.status(identity).is_some_and(|s| s.is_active())
    }

    /// Number of members that count towards quorum.
    fn active_count(&self) -> usize {
        self.members()
            .into_iter()
            .filter(|id| self.is_active(*id))
            .count()
    }
}

/// Errors that can occur when editing a roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// Identity is not a member of the roster.
    #[error("{0} is not in the roster")]
    NotInRoster(Identity),
}

/// Per-member roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemberInfo {
    role: Role,
    status: ParticipantStatus,
}

/// A fixed roster for one contested coordinate.
///
/// Members keep their insertion order. Adding an identity twice replaces
/// its previous entry in place.
#[derive(Debug, Clone)]
pub struct StaticRoster {
    coordinate: Coordinate,
    members: IndexMap<Identity, MemberInfo>,
}

impl StaticRoster {
    /// Create an empty roster for a coordinate.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            members: IndexMap::new(),
        }
    }

    /// Add an active leader.
    pub fn with_leader(self, identity: Identity) -> Self {
        self.with_member(identity, Role::Leader, ParticipantStatus::Active)
    }

    /// Add an active follower.
    pub fn with_follower(self, identity: Identity) -> Self {
        self.with_member(identity, Role::Follower, ParticipantStatus::Active)
    }

    /// Add a member with explicit role and status.
    pub fn with_member(
        mut self,
        identity: Identity,
        role: Role,
        status: ParticipantStatus,
    ) -> Self {
        self.members.insert(identity, MemberInfo { role, status });
        self
    }

    /// Change the activity status of an existing member.
    pub fn set_status(
        &mut self,
        identity: Identity,
        status: ParticipantStatus,
    ) -> Result<(), RosterError> {
        let info = self
            .members
            .get_mut(&identity)
            .ok_or(RosterError::NotInRoster(identity))?;
        info.status = status;
        Ok(())
    }

    /// Number of members, active or not.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the roster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Create a roster as an Arc.
    pub fn into_arc(self) -> Arc<dyn Roster> {
        Arc::new(self)
    }
}

impl Roster for StaticRoster {
    fn members(&self) -> Vec<Identity> {
        self.members.keys().copied().collect()
    }

    fn status(&self, identity: Identity) -> Option<ParticipantStatus> {
        self.members.get(&identity).map(|info| info.status)
    }

    fn role(&self, identity: Identity) -> Option<Role> {
        self.members.get(&identity).map(|info| info.role)
    }

    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}
