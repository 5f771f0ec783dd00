//! Applying hits between two ledgers, including thorns.
//!
//! Thorns reflect exactly one level deep: the reflected hit is tagged
//! `HitSource::Thorns` and a thorns-tagged hit never reflects. Two
//! combatants with thorns therefore trade one reflection, not an endless
//! loop.

use serde::{Deserialize, Serialize};

use super::damage::{compute, DamageModifiers, DamageResult};
use super::ledger::CombatantLedger;

/// Where a hit came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitSource {
    /// A card or pet attack: strength, weak and crit apply.
    Attack,
    /// A discard or combo trigger. Strength and crit do not apply but
    /// thorns still reflect onto the player who fired it.
    Effect,
    /// A thorns reflection. Never reflects again.
    Thorns,
}

/// Result of one strike and its reflection, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrikeOutcome {
    /// The hit on the target.
    pub hit: DamageResult,
    /// The thorns hit back on the attacker.
    pub reflected: Option<DamageResult>,
}

/// Hit `target` for `raw` damage and apply thorns back onto `attacker`.
///
/// `crit_roll` is only consulted for `HitSource::Attack`.
pub fn strike(
    attacker: &mut CombatantLedger,
    target: &mut CombatantLedger,
    raw: i32,
    source: HitSource,
    crit_roll: u32,
    modifiers: &DamageModifiers,
) -> StrikeOutcome {
    let input = match source {
        HitSource::Attack => attacker.attack_input(raw, target),
        HitSource::Effect | HitSource::Thorns => target.environmental_input(raw),
    };
    let hit = compute(&input, crit_roll, modifiers);
    target.take_hit(&hit);

    let reflected = if source != HitSource::Thorns && target.thorns() > 0 {
        let thorns = target.thorns();
        Some(strike(target, attacker, thorns, HitSource::Thorns, 0, modifiers).hit)
    } else {
        None
    };

    StrikeOutcome { hit, reflected }
}
