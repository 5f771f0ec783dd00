//! Peer synchronization tests.
//!
//! Several `CombatSession`s exchange their queued messages the way the
//! network would deliver them. These verify:
//! - Mirrors and owners agree after every exchange
//! - Messages only reach the peer they are routed to
//! - Messages from peers without authority are dropped

use std::collections::BTreeMap;

use pet_duel::session::RecordingObserver;
use pet_duel::{
    CardDefinition, CardId, CardRegistry, CombatConfig, CombatSession, CombatantRole, Envelope,
    Error, Loadout, Outbox, PeerMessage, PlayerId, Recipient, SharedSnapshot, SnapshotEdit,
    TargetSelector,
};

const STRIKE: CardId = CardId(1);
const GUARD: CardId = CardId(2);
const HEX: CardId = CardId(3);
const BITE: CardId = CardId(4);
const BULWARK: CardId = CardId(5);
const MEND: CardId = CardId(6);

fn registry() -> CardRegistry {
    CardRegistry::from_cards([
        CardDefinition::new(STRIKE, "Strike").with_cost(1).with_damage(6),
        CardDefinition::new(GUARD, "Guard").with_cost(1).with_block(5),
        CardDefinition::new(HEX, "Hex").with_cost(1).with_damage_over_time(3, 2),
        CardDefinition::new(BITE, "Bite").with_damage(8),
        CardDefinition::new(BULWARK, "Bulwark").with_cost(1).with_thorns(2),
        CardDefinition::new(MEND, "Mend").with_cost(1).with_heal(5),
    ])
    .unwrap()
}

fn config() -> CombatConfig {
    CombatConfig::default().with_base_crit(0)
}

/// Seat `i` fights the pet of seat `i + 1`, wrapping around.
fn ring_snapshot(players: u8) -> SharedSnapshot {
    let mut snapshot = SharedSnapshot::new(players as usize, 40);
    let pairings: BTreeMap<PlayerId, PlayerId> = (0..players)
        .map(|i| (PlayerId::new(i), PlayerId::new((i + 1) % players)))
        .collect();
    snapshot.apply(&SnapshotEdit::Pairings(pairings));
    snapshot
}

fn start_all<'a>(
    decks: &[CardId],
    snapshot: &SharedSnapshot,
    registry: &'a CardRegistry,
    config: &'a CombatConfig,
) -> Vec<CombatSession<'a, RecordingObserver>> {
    decks
        .iter()
        .enumerate()
        .map(|(seat, &card)| {
            let loadout = Loadout::new(vec![card; 10], config);
            CombatSession::start(
                PlayerId::new(seat as u8),
                &loadout,
                snapshot,
                registry,
                config,
                seat as u64,
                RecordingObserver::new(),
            )
        })
        .collect()
}

/// Deliver every queued message. Returns how many changed a ledger.
fn exchange(sessions: &mut [CombatSession<'_, RecordingObserver>]) -> usize {
    let mut mail = Vec::new();
    for session in sessions.iter_mut() {
        let from = session.routes().local;
        let mut wire = Outbox::new();
        session.flush(&mut wire);
        mail.extend(wire.drain().into_iter().map(|(to, message)| (from, to, message)));
    }

    let mut applied = 0;
    for (from, to, message) in mail {
        for session in sessions.iter_mut() {
            let me = session.routes().local;
            let addressed = match to {
                Recipient::Peer(peer) => peer == me,
                Recipient::Broadcast => me != from,
            };
            if addressed && session.handle_message(&Envelope::new(from, message.clone())) {
                applied += 1;
            }
        }
    }
    applied
}

fn first_card(session: &CombatSession<'_, RecordingObserver>) -> pet_duel::EntityId {
    session.hand()[0].entity
}

/// Block the owner puts on its pet is consumed identically on both peers.
#[test]
fn test_block_and_damage_agree() {
    let registry = registry();
    let config = config();
    let snapshot = ring_snapshot(2);
    let mut sessions = start_all(&[STRIKE, GUARD], &snapshot, &registry, &config);
    exchange(&mut sessions);

    let guard = first_card(&sessions[1]);
    sessions[1].play_card(guard, TargetSelector::OwnPet).unwrap();
    exchange(&mut sessions);
    assert_eq!(sessions[0].combatant(CombatantRole::OpponentPet).block(), 5);

    let strike = first_card(&sessions[0]);
    sessions[0].play_card(strike, TargetSelector::EnemyPet).unwrap();
    exchange(&mut sessions);

    let mirror = sessions[0].combatant(CombatantRole::OpponentPet);
    let owned = sessions[1].combatant(CombatantRole::LocalPet);
    assert_eq!(mirror.health(), 39);
    assert_eq!(mirror.health(), owned.health());
    assert_eq!(mirror.block(), owned.block());
}

/// Damage over time on the enemy pet ticks on the attacker and reaches the owner.
#[test]
fn test_damage_over_time_is_forwarded() {
    let registry = registry();
    let config = config();
    let snapshot = ring_snapshot(2);
    let mut sessions = start_all(&[HEX, GUARD], &snapshot, &registry, &config);

    let hex = first_card(&sessions[0]);
    sessions[0].play_card(hex, TargetSelector::EnemyPet).unwrap();

    for expected in [37, 34] {
        sessions[0].end_turn();
        sessions[1].end_turn();
        exchange(&mut sessions);
        assert_eq!(sessions[0].combatant(CombatantRole::OpponentPet).health(), expected);
        assert_eq!(sessions[1].combatant(CombatantRole::LocalPet).health(), expected);
        sessions[0].start_turn();
        sessions[1].start_turn();
    }

    sessions[0].end_turn();
    exchange(&mut sessions);
    assert_eq!(sessions[1].combatant(CombatantRole::LocalPet).health(), 34);
}

/// The opponent pet's attack lands on our player and is mirrored by its owner.
#[test]
fn test_pet_attack_mirrors_player_health() {
    let registry = registry();
    let config = config();
    let snapshot = ring_snapshot(2);
    let mut sessions = start_all(&[STRIKE, STRIKE], &snapshot, &registry, &config);

    sessions[0].resolve_pet_card(BITE).unwrap();
    exchange(&mut sessions);

    assert_eq!(sessions[0].combatant(CombatantRole::LocalPlayer).health(), 42);
    assert_eq!(sessions[1].combatant(CombatantRole::OpponentPlayer).health(), 42);
}

/// Thorns granted by the owner reflect on the attacker's peer.
#[test]
fn test_owner_thorns_reflect_on_attacker() {
    let registry = registry();
    let config = config();
    let snapshot = ring_snapshot(2);
    let mut sessions = start_all(&[STRIKE, BULWARK], &snapshot, &registry, &config);

    let bulwark = first_card(&sessions[1]);
    sessions[1].play_card(bulwark, TargetSelector::OwnPet).unwrap();
    exchange(&mut sessions);
    assert_eq!(sessions[0].combatant(CombatantRole::OpponentPet).thorns(), 2);

    let strike = first_card(&sessions[0]);
    let report = sessions[0].play_card(strike, TargetSelector::EnemyPet).unwrap();
    exchange(&mut sessions);

    assert_eq!(report.hit.and_then(|h| h.reflected).map(|r| r.after_block), Some(2));
    assert_eq!(sessions[0].combatant(CombatantRole::LocalPlayer).health(), 48);
    assert_eq!(sessions[1].combatant(CombatantRole::OpponentPlayer).health(), 48);
    assert_eq!(sessions[1].combatant(CombatantRole::LocalPet).health(), 34);
}

/// With two seats the owner also attacks us; its pet heal must reach our
/// mirror of its pet, never our own pet.
#[test]
fn test_two_seat_owner_heal_updates_mirror_only() {
    let registry = registry();
    let config = config();
    let snapshot = ring_snapshot(2);
    let mut sessions = start_all(&[STRIKE, MEND], &snapshot, &registry, &config);
    exchange(&mut sessions);
    assert_eq!(sessions[0].routes().pet_owner, sessions[0].routes().pet_attacker);

    let strike = first_card(&sessions[0]);
    sessions[0].play_card(strike, TargetSelector::EnemyPet).unwrap();
    exchange(&mut sessions);
    assert_eq!(sessions[1].combatant(CombatantRole::LocalPet).health(), 34);

    let mend = first_card(&sessions[1]);
    sessions[1].play_card(mend, TargetSelector::OwnPet).unwrap();
    exchange(&mut sessions);

    assert_eq!(sessions[1].combatant(CombatantRole::LocalPet).health(), 39);
    assert_eq!(sessions[0].combatant(CombatantRole::OpponentPet).health(), 39);
    assert_eq!(sessions[0].combatant(CombatantRole::LocalPet).health(), 40);
}

/// In a three-seat ring an attack only reaches the pet's owner.
#[test]
fn test_three_seat_routing() {
    let registry = registry();
    let config = config();
    let snapshot = ring_snapshot(3);
    let mut sessions = start_all(&[STRIKE, STRIKE, STRIKE], &snapshot, &registry, &config);
    exchange(&mut sessions);

    assert_eq!(sessions[0].routes().pet_owner, Some(PlayerId::new(1)));
    assert_eq!(sessions[0].routes().pet_attacker, Some(PlayerId::new(2)));

    let strike = first_card(&sessions[0]);
    sessions[0].play_card(strike, TargetSelector::EnemyPet).unwrap();
    exchange(&mut sessions);

    assert_eq!(sessions[1].combatant(CombatantRole::LocalPet).health(), 34);
    assert_eq!(sessions[2].combatant(CombatantRole::LocalPet).health(), 40);
    assert_eq!(sessions[0].combatant(CombatantRole::LocalPet).health(), 40);
}

/// A peer that does not fight our pet cannot damage it.
#[test]
fn test_forged_damage_is_dropped() {
    let registry = registry();
    let config = config();
    let snapshot = ring_snapshot(3);
    let mut sessions = start_all(&[STRIKE, STRIKE, STRIKE], &snapshot, &registry, &config);

    let forged = Envelope::new(
        PlayerId::new(2),
        PeerMessage::PetTookDamage { amount: 10, block_consumed: 0 },
    );
    assert!(!sessions[1].handle_message(&forged));
    assert_eq!(sessions[1].combatant(CombatantRole::LocalPet).health(), 40);
}

/// Envelopes survive the wire codec; garbage does not decode.
#[test]
fn test_envelope_codec() {
    let envelope = Envelope::new(
        PlayerId::new(3),
        PeerMessage::PetDotApplied { amount: 4, turns: 2 },
    );
    let bytes = envelope.encode().unwrap();
    assert_eq!(Envelope::decode(&bytes).unwrap(), envelope);

    assert!(matches!(Envelope::decode(&[0xff; 3]), Err(Error::Codec(_))));
}
