//! Peer-to-peer messages and their wire encoding.
//!
//! Messages carry results, never inputs: a damage message holds the
//! post-block number the sender already computed, and the receiver applies
//! it verbatim.

use serde::{Deserialize, Serialize};

use crate::combat::StatusKind;
use crate::core::{PlayerId, Result};

/// Fire-and-forget message between two peers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerMessage {
    // === Attacker -> pet owner ===
    /// The owner's pet lost `amount` health after `block_consumed` block.
    PetTookDamage { amount: i32, block_consumed: i32 },
    /// The attacker's player health, for the owner's display mirror.
    PlayerHealthMirror { health: i32, max_health: i32 },
    /// Health the owner's pet regained on the attacker's mirror, from heal
    /// over time ticks or the pet's own cards.
    OpponentPetHealed { amount: i32 },

    // === Pet owner -> attacker ===
    PetBlockSet { block: i32 },
    PetBlockReset,
    PetStatusApplied { kind: StatusKind, value: i32 },
    PetThornsApplied { amount: i32 },
    PetDotApplied { amount: i32, turns: u32 },
    PetHotApplied { amount: i32, turns: u32 },
    PetCritBuffApplied { amount: i32, turns: u32 },
    PetMaxHealthChanged { health: i32, max_health: i32 },
    /// The owner healed its pet.
    PetHealed { amount: i32 },

    // === Draft ===
    /// Client -> arbiter: the sender took `option_id` from `pack_id`.
    DraftPickMade { pack_id: u64, option_id: u32 },
    /// Arbiter -> client: the pick was not valid and must be undone.
    DraftPickRejected { pack_id: u64, option_id: u32 },
}

impl PeerMessage {
    /// Whether this message belongs to the draft protocol.
    #[must_use]
    pub const fn is_draft(&self) -> bool {
        matches!(
            self,
            PeerMessage::DraftPickMade { .. } | PeerMessage::DraftPickRejected { .. }
        )
    }
}

/// A message together with its sender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub from: PlayerId,
    pub message: PeerMessage,
}

impl Envelope {
    #[must_use]
    pub fn new(from: PlayerId, message: PeerMessage) -> Self {
        Self { from, message }
    }

    /// Encode for the wire.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes received from a peer.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
