//! Damage calculation.
//!
//! `compute` is a pure function of its inputs and the crit roll. Every peer
//! that feeds it the same numbers gets the same result, which is what lets
//! an attacker apply damage to its mirror of a remote pet and ship only the
//! final number to the pet's owner.
//!
//! ## Order of operations
//!
//! 1. `raw + strength`
//! 2. crit: `roll < crit_percent` multiplies by `crit_multiplier`
//! 3. weak: subtract `floor(total * weak_percent / 100)`, never below 0
//! 4. break: add `floor(total * break_percent / 100)`
//! 5. block absorbs `min(total, block)`, the rest is damage after block
//!
//! ```
//! use pet_duel::combat::{compute, DamageInput, DamageModifiers};
//!
//! let input = DamageInput::attack(10)
//!     .with_strength(3)
//!     .with_target_block(4)
//!     .with_weak(true);
//!
//! // 13 -> weak 13 - 3 = 10 -> block 4 -> 6
//! let result = compute(&input, 99, &DamageModifiers::default());
//! assert_eq!(result.before_block, 10);
//! assert_eq!(result.block_consumed, 4);
//! assert_eq!(result.after_block, 6);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::CombatConfig;

/// Tunable multipliers shared by every calculation in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageModifiers {
    pub crit_multiplier: i32,
    pub weak_percent: i32,
    pub break_percent: i32,
}

impl Default for DamageModifiers {
    fn default() -> Self {
        Self {
            crit_multiplier: 2,
            weak_percent: 25,
            break_percent: 25,
        }
    }
}

impl From<&CombatConfig> for DamageModifiers {
    fn from(config: &CombatConfig) -> Self {
        Self {
            crit_multiplier: config.crit_multiplier,
            weak_percent: config.weak_percent,
            break_percent: config.break_percent,
        }
    }
}

/// Everything the calculator needs about one hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageInput {
    pub raw: i32,
    pub attacker_strength: i32,
    pub target_block: i32,
    pub attacker_weak: bool,
    pub target_broken: bool,
    pub attacker_crit_percent: i32,
}

impl DamageInput {
    /// A hit with no attacker modifiers yet.
    #[must_use]
    pub fn attack(raw: i32) -> Self {
        Self {
            raw,
            ..Self::default()
        }
    }

    /// A hit from a source with no attacker (damage over time, thorns,
    /// discard triggers). Strength, crit and weak never apply.
    #[must_use]
    pub fn environmental(raw: i32, target_block: i32, target_broken: bool) -> Self {
        Self {
            raw,
            target_block,
            target_broken,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strength(mut self, strength: i32) -> Self {
        self.attacker_strength = strength;
        self
    }

    #[must_use]
    pub fn with_target_block(mut self, block: i32) -> Self {
        self.target_block = block;
        self
    }

    #[must_use]
    pub fn with_weak(mut self, weak: bool) -> Self {
        self.attacker_weak = weak;
        self
    }

    #[must_use]
    pub fn with_broken(mut self, broken: bool) -> Self {
        self.target_broken = broken;
        self
    }

    #[must_use]
    pub fn with_crit_percent(mut self, percent: i32) -> Self {
        self.attacker_crit_percent = percent;
        self
    }
}

/// Outcome of one calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    pub before_block: i32,
    pub block_consumed: i32,
    pub after_block: i32,
    pub is_critical: bool,
}

/// Compute a hit. `crit_roll` is a uniform value in `0..100`.
#[must_use]
pub fn compute(input: &DamageInput, crit_roll: u32, modifiers: &DamageModifiers) -> DamageResult {
    let mut total = (input.raw + input.attacker_strength).max(0);

    let is_critical = input.attacker_crit_percent > 0
        && (crit_roll as i64) < i64::from(input.attacker_crit_percent);
    if is_critical {
        total *= modifiers.crit_multiplier;
    }

    if input.attacker_weak {
        total = (total - total * modifiers.weak_percent / 100).max(0);
    }

    if input.target_broken {
        total += total * modifiers.break_percent / 100;
    }

    let block_consumed = total.min(input.target_block.max(0));

    DamageResult {
        before_block: total,
        block_consumed,
        after_block: total - block_consumed,
        is_critical,
    }
}
