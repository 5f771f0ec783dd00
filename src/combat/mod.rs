//! Combat math and per-combatant bookkeeping.
//!
//! - `damage`: the pure damage calculator
//! - `status`: timed effects and status kinds
//! - `ledger`: one combatant's health, block and statuses
//! - `hit`: applying hits between ledgers, with one-level thorns
//! - `scaling`: scaling attack hit counters
//! - `role`: the four combatant roles a peer tracks

pub mod damage;
pub mod status;
pub mod ledger;
pub mod hit;
pub mod scaling;
pub mod role;

pub use damage::{compute, DamageInput, DamageModifiers, DamageResult};
pub use status::{EffectList, StatusKind, StatusSnapshot, TimedEffect};
pub use ledger::{CombatantLedger, EndOfTurnReport};
pub use hit::{strike, HitSource, StrikeOutcome};
pub use scaling::ScalingAttackCounter;
pub use role::{CombatantRole, Combatants};
