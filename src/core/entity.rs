//! Card instance identification.
//!
//! Hand, deck and discard hold *instances* of catalog cards. Two copies of
//! the same `CardId` in hand are different entities, so the resolver can
//! tell exactly which one the player dropped on a target.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
        assert_eq!(EntityId(7).raw(), 7);
    }
}
