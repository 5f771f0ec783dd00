//! Effect targeting.
//!
//! - `TargetSelector`: which combatant a played card was dropped on
//! - `select_cards`: which hand cards a transform effect picks

use serde::{Deserialize, Serialize};

use crate::cards::SelectionRule;
use crate::combat::CombatantRole;
use crate::core::{EntityId, GameRng};

/// Target of a played card, as chosen by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSelector {
    EnemyPet,
    OwnPet,
    OwnPlayer,
}

impl TargetSelector {
    /// The local ledger this selector refers to.
    #[must_use]
    pub const fn role(self) -> CombatantRole {
        match self {
            TargetSelector::EnemyPet => CombatantRole::OpponentPet,
            TargetSelector::OwnPet => CombatantRole::LocalPet,
            TargetSelector::OwnPlayer => CombatantRole::LocalPlayer,
        }
    }

    /// Whether the target belongs to this peer.
    #[must_use]
    pub const fn is_own(self) -> bool {
        !matches!(self, TargetSelector::EnemyPet)
    }
}

/// Pick up to `count` cards from `(entity, cost)` candidates without
/// replacement.
///
/// Cost ties keep hand order, so the choice is reproducible.
pub fn select_cards(
    candidates: &[(EntityId, i32)],
    count: usize,
    rule: SelectionRule,
    rng: &mut GameRng,
) -> Vec<EntityId> {
    let mut pool = candidates.to_vec();
    match rule {
        SelectionRule::Cheapest => pool.sort_by_key(|&(_, cost)| cost),
        SelectionRule::MostExpensive => pool.sort_by_key(|&(_, cost)| std::cmp::Reverse(cost)),
        SelectionRule::Random => rng.shuffle(&mut pool),
    }
    pool.into_iter().take(count).map(|(entity, _)| entity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> Vec<(EntityId, i32)> {
        vec![(EntityId(0), 3), (EntityId(1), 1), (EntityId(2), 2)]
    }

    #[test]
    fn test_cheapest_two_of_three() {
        let mut rng = GameRng::new(1);
        let picked = select_cards(&hand(), 2, SelectionRule::Cheapest, &mut rng);
        assert_eq!(picked, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn test_most_expensive() {
        let mut rng = GameRng::new(1);
        let picked = select_cards(&hand(), 1, SelectionRule::MostExpensive, &mut rng);
        assert_eq!(picked, vec![EntityId(0)]);
    }

    #[test]
    fn test_ties_keep_hand_order() {
        let mut rng = GameRng::new(1);
        let tied = vec![(EntityId(5), 1), (EntityId(3), 1), (EntityId(4), 1)];
        let picked = select_cards(&tied, 2, SelectionRule::Cheapest, &mut rng);
        assert_eq!(picked, vec![EntityId(5), EntityId(3)]);
    }

    #[test]
    fn test_random_is_without_replacement() {
        let mut rng = GameRng::new(99);
        let mut picked = select_cards(&hand(), 5, SelectionRule::Random, &mut rng);
        picked.sort();
        assert_eq!(picked, vec![EntityId(0), EntityId(1), EntityId(2)]);
    }

    #[test]
    fn test_selector_roles() {
        assert_eq!(TargetSelector::EnemyPet.role(), CombatantRole::OpponentPet);
        assert_eq!(TargetSelector::OwnPet.role(), CombatantRole::LocalPet);
        assert!(!TargetSelector::EnemyPet.is_own());
        assert!(TargetSelector::OwnPlayer.is_own());
    }
}
