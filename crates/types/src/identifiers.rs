//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Participant identity.
///
/// Opaque token naming one roster member. Used as the key of every
/// accumulated evidence map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Identity(pub u64);

impl Identity {
    /// Get the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Little-endian bytes, used when building digests.
    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

/// Process-list location being contested by an election.
///
/// The `vm` index is the slot within a minute of a block height whose
/// leader went missing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    /// Block height.
    pub height: u64,
    /// Minute within the block.
    pub minute: u8,
    /// VM index (slot) within the minute.
    pub vm: u32,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(height: u64, minute: u8, vm: u32) -> Self {
        Self { height, minute, vm }
    }

    /// Canonical byte encoding, used when building digests.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(13);
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.push(self.minute);
        bytes.extend_from_slice(&self.vm.to_le_bytes());
        bytes
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}/{}/{})", self.height, self.minute, self.vm)
    }
}
