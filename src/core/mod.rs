//! Core types: players, card instance ids, RNG, configuration, errors.
//!
//! Everything here is independent of combat rules and the sync protocol.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::EntityId;
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{CombatConfig, DraftConfig, Phase, SessionConfig};
pub use error::{Error, Result};
