//! Card piles for combat.
//!
//! ## Key Types
//!
//! - `CardPiles`: deck, hand and discard of one player
//! - `Pile`: names one of the three piles
//! - `DrawOutcome`: where a drawn card ended up

pub mod piles;

pub use piles::{CardPiles, DrawOutcome, Pile};
