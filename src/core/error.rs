//! Error types shared across the crate.
//!
//! Only validation failures surface to callers as `Err`. Lookup failures
//! inside a card resolution are logged and the sub-effect is skipped, and
//! malformed inbound peer traffic is dropped with a warning.

use thiserror::Error;

use super::{EntityId, PlayerId};
use crate::cards::CardId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("card costs {required} energy but only {available} is available")]
    InsufficientEnergy { required: i32, available: i32 },

    #[error("{0} is not in hand")]
    CardNotInHand(EntityId),

    #[error("{0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("{0} was registered twice")]
    DuplicateCard(CardId),

    #[error("{0} is not in the deck")]
    CardNotInDeck(CardId),

    #[error("{0} has no upgraded version")]
    NoUpgrade(CardId),

    #[error("{0} has no seat in this session")]
    UnknownPlayer(PlayerId),

    #[error("pack {pack_id} is not queued for {player}")]
    PackNotFound { player: PlayerId, pack_id: u64 },

    #[error("option {option_id} is not in pack {pack_id}")]
    OptionNotFound { pack_id: u64, option_id: u32 },

    #[error("no draft pack is waiting for a pick")]
    NoPackAvailable,

    #[error("shared snapshot moved from version {expected} to {found}")]
    SnapshotConflict { expected: u64, found: u64 },

    #[error("shared property store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("peer message could not be decoded")]
    Codec(#[from] bincode::Error),
}
