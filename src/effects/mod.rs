//! Card effect resolution.
//!
//! - `effect`: combo payoffs, discard triggers and the ledger mutations they produce
//! - `targeting`: play targets and hand card selection
//! - `context`: the mutable combat state a resolver works on
//! - `resolver`: playing, discarding and end-of-turn ticks

pub mod effect;
pub mod targeting;
pub mod context;
pub mod resolver;

pub use effect::{ComboEffect, DiscardEffect, LedgerChange, Mutation};
pub use targeting::{select_cards, TargetSelector};
pub use context::{ChangeSet, CombatRngs, CombatState, TurnState};
pub use resolver::{
    EffectResolver, PetTurnReport, ResolveReport, SkipReason, SkippedEffect, TurnEndReport,
};
