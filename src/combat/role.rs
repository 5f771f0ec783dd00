//! Combatant roles and the four ledgers a peer keeps.
//!
//! From one peer's point of view there are four combatants:
//!
//! | Role | Authority | Simulated here? |
//! |---|---|---|
//! | `LocalPlayer` | this peer | yes |
//! | `LocalPet` | this peer (health, block, grants) | no, the peer fighting it ticks it |
//! | `OpponentPet` | the pet's owner | yes, as a mirror |
//! | `OpponentPlayer` | the peer fighting our pet | no, display mirror only |

use serde::{Deserialize, Serialize};

use super::ledger::CombatantLedger;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantRole {
    LocalPlayer,
    LocalPet,
    OpponentPet,
    OpponentPlayer,
}

impl CombatantRole {
    pub const ALL: [CombatantRole; 4] = [
        CombatantRole::LocalPlayer,
        CombatantRole::LocalPet,
        CombatantRole::OpponentPet,
        CombatantRole::OpponentPlayer,
    ];

    /// Whether this peer is the authoritative writer for the role.
    #[must_use]
    pub const fn is_owned(self) -> bool {
        matches!(self, CombatantRole::LocalPlayer | CombatantRole::LocalPet)
    }

    const fn slot(self) -> usize {
        match self {
            CombatantRole::LocalPlayer => 0,
            CombatantRole::LocalPet => 1,
            CombatantRole::OpponentPet => 2,
            CombatantRole::OpponentPlayer => 3,
        }
    }
}

/// The four ledgers of one peer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatants {
    pub local_player: CombatantLedger,
    pub local_pet: CombatantLedger,
    pub opponent_pet: CombatantLedger,
    pub opponent_player: CombatantLedger,
}

impl Combatants {
    #[must_use]
    pub fn new(
        local_player: CombatantLedger,
        local_pet: CombatantLedger,
        opponent_pet: CombatantLedger,
        opponent_player: CombatantLedger,
    ) -> Self {
        Self {
            local_player,
            local_pet,
            opponent_pet,
            opponent_player,
        }
    }

    #[must_use]
    pub fn get(&self, role: CombatantRole) -> &CombatantLedger {
        match role {
            CombatantRole::LocalPlayer => &self.local_player,
            CombatantRole::LocalPet => &self.local_pet,
            CombatantRole::OpponentPet => &self.opponent_pet,
            CombatantRole::OpponentPlayer => &self.opponent_player,
        }
    }

    pub fn get_mut(&mut self, role: CombatantRole) -> &mut CombatantLedger {
        match role {
            CombatantRole::LocalPlayer => &mut self.local_player,
            CombatantRole::LocalPet => &mut self.local_pet,
            CombatantRole::OpponentPet => &mut self.opponent_pet,
            CombatantRole::OpponentPlayer => &mut self.opponent_player,
        }
    }

    /// Borrow two different ledgers mutably, e.g. attacker and target.
    ///
    /// Returns `None` if both roles are the same.
    pub fn pair_mut(
        &mut self,
        first: CombatantRole,
        second: CombatantRole,
    ) -> Option<(&mut CombatantLedger, &mut CombatantLedger)> {
        let Self {
            local_player,
            local_pet,
            opponent_pet,
            opponent_player,
        } = self;
        let mut slots = [
            Some(local_player),
            Some(local_pet),
            Some(opponent_pet),
            Some(opponent_player),
        ];
        let a = slots[first.slot()].take()?;
        let b = slots[second.slot()].take()?;
        Some((a, b))
    }
}
