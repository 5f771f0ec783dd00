//! Triggered effect variants and the ledger mutations they produce.
//!
//! Combo payoffs and discard triggers are small closed sets. Each variant
//! maps to a `Mutation` through a pure function, and ledger-level
//! mutations apply through `Mutation::apply_to`, so every variant can be
//! tested without building a whole combat.

use serde::{Deserialize, Serialize};

use super::targeting::TargetSelector;
use crate::combat::{
    compute, CombatantLedger, CombatantRole, DamageModifiers, DamageResult, StatusKind,
};

/// A single state change produced by a triggered effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Attackerless damage against the target.
    Damage { target: CombatantRole, amount: i32 },
    Block { target: CombatantRole, amount: i32 },
    Heal { target: CombatantRole, amount: i32 },
    Status { target: CombatantRole, kind: StatusKind, value: i32 },
    /// Draw cards into the local hand.
    Draw(u32),
    /// Gain energy this turn.
    Energy(i32),
}

/// What a ledger-level mutation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerChange {
    Hit(DamageResult),
    Blocked(i32),
    Healed(i32),
    Status,
}

impl Mutation {
    /// The combatant this mutation touches, if it touches one.
    #[must_use]
    pub const fn target(&self) -> Option<CombatantRole> {
        match *self {
            Mutation::Damage { target, .. }
            | Mutation::Block { target, .. }
            | Mutation::Heal { target, .. }
            | Mutation::Status { target, .. } => Some(target),
            Mutation::Draw(_) | Mutation::Energy(_) => None,
        }
    }

    /// Apply a ledger-level mutation to `ledger`.
    ///
    /// Returns `None` for `Draw` and `Energy`, which live outside ledgers.
    pub fn apply_to(
        &self,
        ledger: &mut CombatantLedger,
        modifiers: &DamageModifiers,
    ) -> Option<LedgerChange> {
        match *self {
            Mutation::Damage { amount, .. } => {
                let hit = compute(&ledger.environmental_input(amount), 0, modifiers);
                ledger.take_hit(&hit);
                Some(LedgerChange::Hit(hit))
            }
            Mutation::Block { amount, .. } => {
                ledger.add_block(amount);
                Some(LedgerChange::Blocked(amount.max(0)))
            }
            Mutation::Heal { amount, .. } => Some(LedgerChange::Healed(ledger.heal(amount))),
            Mutation::Status { kind, value, .. } => {
                ledger.apply_status(kind, value);
                Some(LedgerChange::Status)
            }
            Mutation::Draw(_) | Mutation::Energy(_) => None,
        }
    }
}

/// Payoff of a combo once its threshold is met.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboEffect {
    DealDamage(i32),
    GainBlock(i32),
    GainBlockForPet(i32),
    Heal(i32),
    HealPet(i32),
    DrawCards(u32),
    GainEnergy(i32),
    ApplyWeak(u32),
    ApplyBreak(u32),
}

impl ComboEffect {
    /// The declared target this effect needs, or `None` if any target works.
    #[must_use]
    pub const fn required_target(self) -> Option<TargetSelector> {
        match self {
            ComboEffect::DealDamage(_) | ComboEffect::ApplyWeak(_) | ComboEffect::ApplyBreak(_) => {
                Some(TargetSelector::EnemyPet)
            }
            ComboEffect::GainBlock(_) | ComboEffect::Heal(_) => Some(TargetSelector::OwnPlayer),
            ComboEffect::GainBlockForPet(_) | ComboEffect::HealPet(_) => {
                Some(TargetSelector::OwnPet)
            }
            ComboEffect::DrawCards(_) | ComboEffect::GainEnergy(_) => None,
        }
    }

    /// The mutation this payoff produces when declared against `declared`.
    ///
    /// A declared target that does not match the effect yields `None` and
    /// the payoff is skipped.
    #[must_use]
    pub fn mutation(self, declared: TargetSelector) -> Option<Mutation> {
        if let Some(required) = self.required_target() {
            if required != declared {
                return None;
            }
        }
        let target = declared.role();
        let mutation = match self {
            ComboEffect::DealDamage(amount) => Mutation::Damage { target, amount },
            ComboEffect::GainBlock(amount) | ComboEffect::GainBlockForPet(amount) => {
                Mutation::Block { target, amount }
            }
            ComboEffect::Heal(amount) | ComboEffect::HealPet(amount) => {
                Mutation::Heal { target, amount }
            }
            ComboEffect::DrawCards(count) => Mutation::Draw(count),
            ComboEffect::GainEnergy(amount) => Mutation::Energy(amount),
            ComboEffect::ApplyWeak(turns) => Mutation::Status {
                target,
                kind: StatusKind::Weak,
                value: turns as i32,
            },
            ComboEffect::ApplyBreak(turns) => Mutation::Status {
                target,
                kind: StatusKind::Break,
                value: turns as i32,
            },
        };
        Some(mutation)
    }
}

/// Effect fired when a card leaves hand by being discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscardEffect {
    DamageEnemyPet(i32),
    GainBlock(i32),
    GainPetBlock(i32),
    DrawCards(u32),
    GainEnergy(i32),
}

impl DiscardEffect {
    #[must_use]
    pub const fn mutation(self) -> Mutation {
        match self {
            DiscardEffect::DamageEnemyPet(amount) => Mutation::Damage {
                target: CombatantRole::OpponentPet,
                amount,
            },
            DiscardEffect::GainBlock(amount) => Mutation::Block {
                target: CombatantRole::LocalPlayer,
                amount,
            },
            DiscardEffect::GainPetBlock(amount) => Mutation::Block {
                target: CombatantRole::LocalPet,
                amount,
            },
            DiscardEffect::DrawCards(count) => Mutation::Draw(count),
            DiscardEffect::GainEnergy(amount) => Mutation::Energy(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_pet_block_needs_own_pet() {
        let effect = ComboEffect::GainBlockForPet(5);

        assert_eq!(
            effect.mutation(TargetSelector::OwnPet),
            Some(Mutation::Block { target: CombatantRole::LocalPet, amount: 5 })
        );
        assert_eq!(effect.mutation(TargetSelector::OwnPlayer), None);
        assert_eq!(effect.mutation(TargetSelector::EnemyPet), None);
    }

    #[test]
    fn test_combo_draw_accepts_any_target() {
        for target in [
            TargetSelector::EnemyPet,
            TargetSelector::OwnPet,
            TargetSelector::OwnPlayer,
        ] {
            assert_eq!(ComboEffect::DrawCards(2).mutation(target), Some(Mutation::Draw(2)));
        }
    }

    #[test]
    fn test_combo_weak_targets_enemy() {
        assert_eq!(
            ComboEffect::ApplyWeak(2).mutation(TargetSelector::EnemyPet),
            Some(Mutation::Status {
                target: CombatantRole::OpponentPet,
                kind: StatusKind::Weak,
                value: 2,
            })
        );
    }

    #[test]
    fn test_discard_mutations() {
        assert_eq!(DiscardEffect::DrawCards(2).mutation(), Mutation::Draw(2));
        assert_eq!(
            DiscardEffect::GainPetBlock(3).mutation().target(),
            Some(CombatantRole::LocalPet)
        );
    }

    #[test]
    fn test_apply_damage_is_environmental() {
        let mut ledger = CombatantLedger::new(20, 0);
        ledger.add_block(2);
        ledger.apply_status(StatusKind::Break, 1);

        let change = Mutation::Damage { target: CombatantRole::OpponentPet, amount: 8 }
            .apply_to(&mut ledger, &DamageModifiers::default());

        // 8 + 25% = 10, block 2 absorbs
        let Some(LedgerChange::Hit(hit)) = change else {
            panic!("expected a hit, got {:?}", change);
        };
        assert_eq!(hit.before_block, 10);
        assert_eq!(hit.after_block, 8);
        assert_eq!(ledger.health(), 12);
        assert_eq!(ledger.block(), 0);
    }

    #[test]
    fn test_apply_heal_and_block() {
        let mut ledger = CombatantLedger::new(20, 0);
        ledger.apply_remote_damage(3, 0);
        let mods = DamageModifiers::default();

        let healed = Mutation::Heal { target: CombatantRole::LocalPlayer, amount: 10 }
            .apply_to(&mut ledger, &mods);
        let blocked = Mutation::Block { target: CombatantRole::LocalPlayer, amount: 4 }
            .apply_to(&mut ledger, &mods);

        assert_eq!(healed, Some(LedgerChange::Healed(3)));
        assert_eq!(blocked, Some(LedgerChange::Blocked(4)));
        assert_eq!(ledger.block(), 4);
        assert_eq!(Mutation::Draw(1).apply_to(&mut ledger, &mods), None);
    }
}
