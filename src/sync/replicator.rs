//! Outbound replication of locally made changes.
//!
//! Each peer is the only writer of its own player and pet. `SyncRoutes`
//! names the two peers this one talks to during a combat:
//!
//! - `pet_owner`: owns the pet we fight. Gets damage we deal to it and
//!   our player's health for display.
//! - `pet_attacker`: fights our pet on their peer. Gets every change we
//!   make to our pet so their mirror stays close.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::message::PeerMessage;
use super::transport::{PeerTransport, Recipient};
use crate::combat::{CombatantLedger, DamageResult, StatusKind};
use crate::core::PlayerId;

/// The peers this one exchanges combat messages with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRoutes {
    pub local: PlayerId,
    pub pet_owner: Option<PlayerId>,
    pub pet_attacker: Option<PlayerId>,
}

impl SyncRoutes {
    /// Routes for a peer that is not paired (solo testing, byes).
    #[must_use]
    pub fn unpaired(local: PlayerId) -> Self {
        Self {
            local,
            pet_owner: None,
            pet_attacker: None,
        }
    }

    #[must_use]
    pub fn new(local: PlayerId, pet_owner: PlayerId, pet_attacker: PlayerId) -> Self {
        Self {
            local,
            pet_owner: Some(pet_owner),
            pet_attacker: Some(pet_attacker),
        }
    }
}

/// Queues the messages that keep remote mirrors in step.
pub struct Replicator<'a, T: PeerTransport + ?Sized> {
    routes: &'a SyncRoutes,
    transport: &'a mut T,
}

impl<'a, T: PeerTransport + ?Sized> Replicator<'a, T> {
    pub fn new(routes: &'a SyncRoutes, transport: &'a mut T) -> Self {
        Self { routes, transport }
    }

    fn to_owner(&mut self, message: PeerMessage) {
        match self.routes.pet_owner {
            Some(owner) => self.transport.send(Recipient::Peer(owner), message),
            None => debug!(?message, "no pet owner to notify"),
        }
    }

    fn to_attacker(&mut self, message: PeerMessage) {
        match self.routes.pet_attacker {
            Some(attacker) => self.transport.send(Recipient::Peer(attacker), message),
            None => debug!(?message, "no pet attacker to notify"),
        }
    }

    // === Opponent pet (mirror) -> owner ===

    /// Report a hit on the opponent pet mirror. Zero hits are not sent.
    pub fn opponent_pet_hit(&mut self, hit: &DamageResult) {
        self.opponent_pet_damage(hit.after_block, hit.block_consumed);
    }

    pub fn opponent_pet_damage(&mut self, amount: i32, block_consumed: i32) {
        if amount > 0 || block_consumed > 0 {
            self.to_owner(PeerMessage::PetTookDamage { amount, block_consumed });
        }
    }

    pub fn opponent_pet_healed(&mut self, amount: i32) {
        if amount > 0 {
            self.to_owner(PeerMessage::OpponentPetHealed { amount });
        }
    }

    pub fn player_health(&mut self, player: &CombatantLedger) {
        self.to_owner(PeerMessage::PlayerHealthMirror {
            health: player.health(),
            max_health: player.effective_max_health(),
        });
    }

    // === Local pet -> attacker ===

    pub fn pet_block(&mut self, pet: &CombatantLedger) {
        self.to_attacker(PeerMessage::PetBlockSet { block: pet.block() });
    }

    pub fn pet_block_reset(&mut self) {
        self.to_attacker(PeerMessage::PetBlockReset);
    }

    pub fn pet_healed(&mut self, amount: i32) {
        if amount > 0 {
            self.to_attacker(PeerMessage::PetHealed { amount });
        }
    }

    pub fn pet_max_health(&mut self, pet: &CombatantLedger) {
        self.to_attacker(PeerMessage::PetMaxHealthChanged {
            health: pet.health(),
            max_health: pet.effective_max_health(),
        });
    }

    pub fn pet_status(&mut self, kind: StatusKind, value: i32) {
        self.to_attacker(PeerMessage::PetStatusApplied { kind, value });
    }

    pub fn pet_thorns(&mut self, amount: i32) {
        self.to_attacker(PeerMessage::PetThornsApplied { amount });
    }

    pub fn pet_damage_over_time(&mut self, amount: i32, turns: u32) {
        self.to_attacker(PeerMessage::PetDotApplied { amount, turns });
    }

    pub fn pet_heal_over_time(&mut self, amount: i32, turns: u32) {
        self.to_attacker(PeerMessage::PetHotApplied { amount, turns });
    }

    pub fn pet_crit_buff(&mut self, amount: i32, turns: u32) {
        self.to_attacker(PeerMessage::PetCritBuffApplied { amount, turns });
    }
}
