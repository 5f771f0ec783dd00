//! # pet-duel
//!
//! Combat, status and draft core for a peer-to-peer pet-battling
//! deckbuilder.
//!
//! Each peer controls a player and a pet. A peer's player fights another
//! peer's pet while a third peer fights its own pet, so every peer keeps
//! four ledgers: its own player and pet, which it owns, and mirrors of the
//! opponent pet and of the player attacking its pet.
//!
//! ## Design Principles
//!
//! 1. **Pure damage math**: `combat::compute` takes its crit roll as an
//!    argument. Any peer given the same inputs derives the same number.
//!
//! 2. **Ownership-partitioned sync**: a peer only writes ledgers it owns.
//!    Changes to a mirror are sent to the owner as final numbers, which the
//!    owner applies without recomputing.
//!
//! 3. **Configuration over constants**: health pools, energy, crit and
//!    debuff percentages and draft weights come from `SessionConfig`.
//!
//! ## Modules
//!
//! - `core`: player ids, card instance ids, RNG, configuration, errors
//! - `cards`: card definitions, instances and the catalog
//! - `zones`: deck, hand and discard piles
//! - `combat`: damage calculator and per-combatant ledgers
//! - `effects`: card resolution pipeline
//! - `sync`: peer messages, mirrors and the shared snapshot
//! - `draft`: packs, arbiter and client
//! - `session`: per-peer combat and draft drivers

pub mod core;
pub mod cards;
pub mod zones;
pub mod combat;
pub mod effects;
pub mod sync;
pub mod draft;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    CombatConfig, DraftConfig, EntityId, Error, GameRng, Phase, PlayerId, PlayerMap, Result,
    SessionConfig,
};

pub use crate::cards::{CardDefinition, CardId, CardInstance, CardRegistry, Rarity};

pub use crate::zones::{CardPiles, Pile};

pub use crate::combat::{
    compute, CombatantLedger, CombatantRole, DamageInput, DamageModifiers, DamageResult,
    StatusKind, StatusSnapshot, TimedEffect,
};

pub use crate::effects::{ComboEffect, DiscardEffect, EffectResolver, ResolveReport, TargetSelector};

pub use crate::sync::{
    Envelope, LocalPropertyStore, Outbox, PeerMessage, PeerTransport, PropertyStore, Recipient,
    SharedSnapshot, SnapshotEdit, SnapshotPublisher, SyncRoutes,
};

pub use crate::draft::{DraftArbiter, DraftClient, DraftOption, DraftPack, DraftPayload, Loadout};

pub use crate::session::{CombatSession, DraftSession, NullObserver, SessionObserver};
