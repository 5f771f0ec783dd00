//! Status effect records.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Flag-style statuses a card can apply.
///
/// `Weak` and `Break` stack turns; `Strength` stacks its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Weak,
    Break,
    Strength,
}

impl StatusKind {
    /// Whether this status hurts whoever carries it.
    #[must_use]
    pub const fn is_debuff(self) -> bool {
        matches!(self, StatusKind::Weak | StatusKind::Break)
    }
}

/// A magnitude that lasts for a number of owner turns.
///
/// Entries with `remaining_turns == 0` are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimedEffect {
    pub amount: i32,
    pub remaining_turns: u32,
}

impl TimedEffect {
    #[must_use]
    pub const fn new(amount: i32, remaining_turns: u32) -> Self {
        Self { amount, remaining_turns }
    }
}

/// Inline storage for the handful of timed effects a combatant carries.
pub type EffectList = SmallVec<[TimedEffect; 4]>;

/// Decrement every entry by one turn and drop the ones that reach zero.
pub fn age_effects(list: &mut EffectList) {
    for effect in list.iter_mut() {
        effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
    }
    list.retain(|effect| effect.remaining_turns > 0);
}

/// Read-only view of a combatant's statuses for the UI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub weak_turns: u32,
    pub break_turns: u32,
    pub thorns: i32,
    pub strength: i32,
    pub crit_percent: i32,
    pub damage_over_time: Vec<TimedEffect>,
    pub heal_over_time: Vec<TimedEffect>,
    pub crit_buffs: Vec<TimedEffect>,
}
