//! Pack drafting between rounds.
//!
//! - `pack`: options and packs
//! - `generator`: weighted pack generation with fallback
//! - `state`: canonical queues and pick tally
//! - `coordinator`: arbiter and per-peer client
//! - `loadout`: the player's build that picks modify

pub mod pack;
pub mod generator;
pub mod state;
pub mod coordinator;
pub mod loadout;

pub use pack::{DraftOption, DraftPack, DraftPayload, StatUpgrade};
pub use generator::PackGenerator;
pub use state::DraftState;
pub use coordinator::{elect_arbiter, DraftArbiter, DraftClient, DraftPick, DraftView};
pub use loadout::{Loadout, LoadoutChange};
