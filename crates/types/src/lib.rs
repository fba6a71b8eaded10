//! Core types for replacement elections.
//!
//! Identities, the contested coordinate, the digest type used to bind
//! endorsements, and the roster abstraction a round consults.

mod hash;
mod identifiers;
mod roster;

pub use hash::{Hash, HexError};
pub use identifiers::{Coordinate, Identity};
pub use roster::{ParticipantStatus, Role, Roster, RosterError, StaticRoster};
