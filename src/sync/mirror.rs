//! Inbound application of peer messages to local ledgers.
//!
//! Remote writes are commands: the numbers in a message are applied as-is,
//! never fed back through the calculator. A message is only accepted from
//! the peer that is allowed to send it; anything else is logged and
//! dropped.

use tracing::{debug, warn};

use super::message::{Envelope, PeerMessage};
use super::replicator::SyncRoutes;
use crate::combat::{CombatantRole, Combatants};

/// Apply one inbound pet or player message.
///
/// Returns the role whose ledger changed, or `None` if the message was
/// dropped.
pub fn apply_inbound(
    routes: &SyncRoutes,
    combatants: &mut Combatants,
    envelope: &Envelope,
) -> Option<CombatantRole> {
    let from_owner = routes.pet_owner == Some(envelope.from);
    let from_attacker = routes.pet_attacker == Some(envelope.from);

    let role = match envelope.message {
        PeerMessage::PetTookDamage { amount, block_consumed } if from_attacker => {
            combatants.local_pet.apply_remote_damage(amount, block_consumed);
            CombatantRole::LocalPet
        }
        PeerMessage::PlayerHealthMirror { health, max_health } if from_attacker => {
            combatants.opponent_player.mirror_health(health, max_health);
            CombatantRole::OpponentPlayer
        }
        PeerMessage::OpponentPetHealed { amount } if from_attacker => {
            combatants.local_pet.heal(amount);
            CombatantRole::LocalPet
        }
        PeerMessage::PetHealed { amount } if from_owner => {
            combatants.opponent_pet.heal(amount);
            CombatantRole::OpponentPet
        }
        PeerMessage::PetBlockSet { block } if from_owner => {
            combatants.opponent_pet.set_block(block);
            CombatantRole::OpponentPet
        }
        PeerMessage::PetBlockReset if from_owner => {
            combatants.opponent_pet.reset_block();
            CombatantRole::OpponentPet
        }
        PeerMessage::PetStatusApplied { kind, value } if from_owner => {
            combatants.opponent_pet.apply_status(kind, value);
            CombatantRole::OpponentPet
        }
        PeerMessage::PetThornsApplied { amount } if from_owner => {
            combatants.opponent_pet.add_thorns(amount);
            CombatantRole::OpponentPet
        }
        PeerMessage::PetDotApplied { amount, turns } if from_owner => {
            combatants.opponent_pet.add_damage_over_time(amount, turns);
            CombatantRole::OpponentPet
        }
        PeerMessage::PetHotApplied { amount, turns } if from_owner => {
            combatants.opponent_pet.add_heal_over_time(amount, turns);
            CombatantRole::OpponentPet
        }
        PeerMessage::PetCritBuffApplied { amount, turns } if from_owner => {
            combatants.opponent_pet.add_crit_buff(amount, turns);
            CombatantRole::OpponentPet
        }
        PeerMessage::PetMaxHealthChanged { health, max_health } if from_owner => {
            combatants.opponent_pet.mirror_health(health, max_health);
            CombatantRole::OpponentPet
        }
        ref message => {
            warn!(from = %envelope.from, ?message, "dropping message from unexpected sender");
            return None;
        }
    };

    debug!(from = %envelope.from, ?role, "applied inbound update");
    Some(role)
}
