//! Per-combatant status ledger.
//!
//! A `CombatantLedger` holds health, block, flag statuses and the timed
//! effect lists for one combatant. It never talks to the network: whether a
//! mutation needs replicating is decided by whoever owns the ledger (see
//! `sync`). All health changes after a hit go through a `DamageResult`, so
//! block and health stay consistent with what the calculator decided.
//!
//! ## Invariants
//!
//! - `0 <= health <= effective_max_health()`
//! - `block >= 0`
//! - no timed effect with `remaining_turns == 0` is stored

use serde::{Deserialize, Serialize};

use super::damage::{compute, DamageInput, DamageModifiers, DamageResult};
use super::status::{age_effects, EffectList, StatusKind, StatusSnapshot, TimedEffect};

/// Totals produced by one end-of-turn tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndOfTurnReport {
    /// Health lost to damage over time, after block.
    pub damage_taken: i32,
    /// Block absorbed by damage over time.
    pub block_consumed: i32,
    /// Health restored by heal over time.
    pub healed: i32,
}

/// Mutable combat record for one combatant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantLedger {
    health: i32,
    base_max_health: i32,
    temp_max_delta: i32,
    block: i32,
    base_crit_percent: i32,
    weak_turns: u32,
    break_turns: u32,
    thorns: i32,
    strength: i32,
    damage_over_time: EffectList,
    heal_over_time: EffectList,
    crit_buffs: EffectList,
}

impl CombatantLedger {
    /// Create a ledger at full health.
    #[must_use]
    pub fn new(max_health: i32, base_crit_percent: i32) -> Self {
        let max_health = max_health.max(0);
        Self {
            health: max_health,
            base_max_health: max_health,
            temp_max_delta: 0,
            block: 0,
            base_crit_percent,
            weak_turns: 0,
            break_turns: 0,
            thorns: 0,
            strength: 0,
            damage_over_time: EffectList::new(),
            heal_over_time: EffectList::new(),
            crit_buffs: EffectList::new(),
        }
    }

    /// Clear every status and restore full health for a new round.
    pub fn reset_for_round(&mut self) {
        *self = Self::new(self.base_max_health, self.base_crit_percent);
    }

    // === Health ===

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn base_max_health(&self) -> i32 {
        self.base_max_health
    }

    /// Base max health plus temporary deltas, never negative.
    #[must_use]
    pub fn effective_max_health(&self) -> i32 {
        (self.base_max_health + self.temp_max_delta).max(0)
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Apply a calculated hit: block absorbs first, health takes the rest.
    pub fn take_hit(&mut self, hit: &DamageResult) {
        self.apply_remote_damage(hit.after_block, hit.block_consumed);
    }

    /// Apply a hit that another peer already calculated.
    pub fn apply_remote_damage(&mut self, after_block: i32, block_consumed: i32) {
        self.block = (self.block - block_consumed.max(0)).max(0);
        self.health = (self.health - after_block.max(0)).max(0);
    }

    /// Restore health up to the effective max. Returns the amount healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.effective_max_health()).max(before);
        self.health - before
    }

    /// Grow or shrink max health for the rest of the round.
    ///
    /// A positive delta also raises current health by the same amount.
    pub fn add_temp_max_health(&mut self, delta: i32) {
        self.temp_max_delta += delta;
        if delta > 0 {
            self.health += delta;
        }
        self.clamp_health();
    }

    /// Overwrite health and max health with values reported by the owner.
    pub fn mirror_health(&mut self, health: i32, max_health: i32) {
        self.base_max_health = max_health.max(0);
        self.temp_max_delta = 0;
        self.health = health;
        self.clamp_health();
    }

    fn clamp_health(&mut self) {
        self.health = self.health.clamp(0, self.effective_max_health());
    }

    // === Block ===

    #[must_use]
    pub fn block(&self) -> i32 {
        self.block
    }

    pub fn add_block(&mut self, amount: i32) {
        self.block = (self.block + amount.max(0)).max(0);
    }

    pub fn set_block(&mut self, amount: i32) {
        self.block = amount.max(0);
    }

    pub fn reset_block(&mut self) {
        self.block = 0;
    }

    // === Flag statuses ===

    #[must_use]
    pub fn is_weak(&self) -> bool {
        self.weak_turns > 0
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.break_turns > 0
    }

    #[must_use]
    pub fn thorns(&self) -> i32 {
        self.thorns
    }

    #[must_use]
    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn apply_status(&mut self, kind: StatusKind, value: i32) {
        match kind {
            StatusKind::Weak => self.weak_turns += value.max(0) as u32,
            StatusKind::Break => self.break_turns += value.max(0) as u32,
            StatusKind::Strength => self.strength += value,
        }
    }

    pub fn add_thorns(&mut self, amount: i32) {
        self.thorns = (self.thorns + amount).max(0);
    }

    /// Count weak and break down by one owner turn.
    pub fn decrement_debuffs(&mut self) {
        self.weak_turns = self.weak_turns.saturating_sub(1);
        self.break_turns = self.break_turns.saturating_sub(1);
    }

    // === Timed effects ===

    pub fn add_damage_over_time(&mut self, amount: i32, turns: u32) {
        push_timed(&mut self.damage_over_time, amount, turns);
    }

    pub fn add_heal_over_time(&mut self, amount: i32, turns: u32) {
        push_timed(&mut self.heal_over_time, amount, turns);
    }

    pub fn add_crit_buff(&mut self, amount: i32, turns: u32) {
        push_timed(&mut self.crit_buffs, amount, turns);
    }

    #[must_use]
    pub fn damage_over_time(&self) -> &[TimedEffect] {
        &self.damage_over_time
    }

    #[must_use]
    pub fn heal_over_time(&self) -> &[TimedEffect] {
        &self.heal_over_time
    }

    #[must_use]
    pub fn crit_buffs(&self) -> &[TimedEffect] {
        &self.crit_buffs
    }

    /// Base crit plus every active buff, floored at 0.
    #[must_use]
    pub fn effective_crit_percent(&self) -> i32 {
        let buffs: i32 = self.crit_buffs.iter().map(|b| b.amount).sum();
        (self.base_crit_percent + buffs).max(0)
    }

    /// Apply damage over time, then heal over time, then age crit buffs.
    ///
    /// Damage over time is environmental: it meets block and break but
    /// never strength or crit.
    pub fn process_end_of_turn_effects(&mut self, modifiers: &DamageModifiers) -> EndOfTurnReport {
        let mut report = EndOfTurnReport::default();

        for index in 0..self.damage_over_time.len() {
            let amount = self.damage_over_time[index].amount;
            let input = DamageInput::environmental(amount, self.block, self.is_broken());
            let hit = compute(&input, 0, modifiers);
            self.take_hit(&hit);
            report.damage_taken += hit.after_block;
            report.block_consumed += hit.block_consumed;
        }
        age_effects(&mut self.damage_over_time);

        for index in 0..self.heal_over_time.len() {
            let amount = self.heal_over_time[index].amount;
            report.healed += self.heal(amount);
        }
        age_effects(&mut self.heal_over_time);

        age_effects(&mut self.crit_buffs);

        report
    }

    /// Age every timed list without applying magnitudes.
    ///
    /// Used for ledgers whose ticks are simulated on another peer.
    pub fn age_timed_effects(&mut self) {
        age_effects(&mut self.damage_over_time);
        age_effects(&mut self.heal_over_time);
        age_effects(&mut self.crit_buffs);
    }

    // === Calculator inputs ===

    /// Build a calculator input for an attack from this combatant.
    #[must_use]
    pub fn attack_input(&self, raw: i32, target: &CombatantLedger) -> DamageInput {
        DamageInput::attack(raw)
            .with_strength(self.strength)
            .with_weak(self.is_weak())
            .with_crit_percent(self.effective_crit_percent())
            .with_target_block(target.block)
            .with_broken(target.is_broken())
    }

    /// Build a calculator input for an attackerless hit on this combatant.
    #[must_use]
    pub fn environmental_input(&self, raw: i32) -> DamageInput {
        DamageInput::environmental(raw, self.block, self.is_broken())
    }

    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            weak_turns: self.weak_turns,
            break_turns: self.break_turns,
            thorns: self.thorns,
            strength: self.strength,
            crit_percent: self.effective_crit_percent(),
            damage_over_time: self.damage_over_time.to_vec(),
            heal_over_time: self.heal_over_time.to_vec(),
            crit_buffs: self.crit_buffs.to_vec(),
        }
    }
}

fn push_timed(list: &mut EffectList, amount: i32, turns: u32) {
    if turns > 0 {
        list.push(TimedEffect::new(amount, turns));
    }
}
