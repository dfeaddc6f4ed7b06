//! Entity identifiers.
//!
//! An [`EntityId`] is a lightweight `u64` identifier with no inherent data.
//! Identifiers are assigned by the native ECS, which alone guarantees that a
//! live entity's id is unique; this crate only carries them around by value.

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// `0` is reserved as [`EntityId::NULL`] and never names a live entity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The null / "no entity" sentinel.
    pub const NULL: EntityId = EntityId(0);

    /// Create an identifier from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the null identifier.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
