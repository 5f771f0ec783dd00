//! Draft coordination tests.
//!
//! These run complete drafts between several `DraftSession`s sharing one
//! `LocalPropertyStore`:
//! - Every option is picked exactly once
//! - Pet health upgrades are republished for later opponents
//! - Rejected picks are undone on the picking peer
//! - Option counts only ever drop by one per accepted pick

use pet_duel::draft::{DraftArbiter, DraftPayload, DraftView, PackGenerator, StatUpgrade};
use pet_duel::session::{ObservedEvent, RecordingObserver};
use pet_duel::{
    CardDefinition, CardId, CardRegistry, CombatConfig, CombatSession, CombatantRole,
    DraftConfig, DraftSession, Envelope, GameRng, LocalPropertyStore, Loadout, NullObserver,
    Outbox, PlayerId, PropertyStore, Recipient, SharedSnapshot, SnapshotEdit,
};
use proptest::prelude::*;

fn registry() -> CardRegistry {
    CardRegistry::from_cards([
        CardDefinition::new(CardId::new(1), "Strike").with_upgrade(CardId::new(101)),
        CardDefinition::new(CardId::new(101), "Strike+").as_upgrade(),
        CardDefinition::new(CardId::new(2), "Guard"),
        CardDefinition::new(CardId::new(3), "Hex"),
    ])
    .unwrap()
}

fn join_all<'a>(
    players: u8,
    snapshot: &SharedSnapshot,
    registry: &'a CardRegistry,
    config: &'a DraftConfig,
) -> Vec<DraftSession<'a, RecordingObserver>> {
    let combat = CombatConfig::default();
    (0..players)
        .map(|seat| {
            let loadout = Loadout::new(vec![CardId::new(1), CardId::new(2)], &combat);
            DraftSession::join(
                PlayerId::new(seat),
                loadout,
                snapshot,
                registry,
                config,
                u64::from(seat),
                RecordingObserver::new(),
            )
            .unwrap()
        })
        .collect()
}

/// Flush every session and deliver what they sent. Returns messages delivered.
fn exchange(
    sessions: &mut [DraftSession<'_, RecordingObserver>],
    store: &LocalPropertyStore,
) -> usize {
    let mut mail = Vec::new();
    for (seat, session) in sessions.iter_mut().enumerate() {
        let mut wire = Outbox::new();
        session.flush(store, &mut wire).unwrap();
        let from = PlayerId::new(seat as u8);
        mail.extend(wire.drain().into_iter().map(|(to, message)| (from, to, message)));
    }

    let delivered = mail.len();
    for (from, to, message) in mail {
        if let Recipient::Peer(peer) = to {
            sessions[peer.index()].handle_message(&Envelope::new(from, message));
        }
    }
    delivered
}

/// Pet health upgrades first, otherwise the first option.
fn preferred_option(view: &DraftView) -> Option<u32> {
    let DraftView::HasPack(pack) = view else {
        return None;
    };
    pack.options
        .iter()
        .find(|o| matches!(o.payload, DraftPayload::UpgradeStat(StatUpgrade::PetMaxHealth(_))))
        .or_else(|| pack.options.front())
        .map(|o| o.id)
}

#[test]
fn test_full_draft_between_three_peers() {
    let registry = registry();
    let config = DraftConfig::default();
    let snapshot = SharedSnapshot::new(3, 40);
    let store = LocalPropertyStore::new(snapshot.clone());
    let mut sessions = join_all(3, &snapshot, &registry, &config);

    sessions[0].deal_round();
    exchange(&mut sessions, &store);

    let mut finished = false;
    for _ in 0..50 {
        let latest = store.load().unwrap();
        for session in sessions.iter_mut() {
            session.on_snapshot(&latest);
            if let Some(option_id) = preferred_option(session.client().view()) {
                session.pick(option_id).unwrap();
            }
        }
        while exchange(&mut sessions, &store) > 0 {}
        exchange(&mut sessions, &store);

        let latest = store.load().unwrap();
        for session in sessions.iter_mut() {
            session.on_snapshot(&latest);
        }
        if sessions.iter().all(|s| s.is_finished(&latest)) {
            finished = true;
            break;
        }
    }
    assert!(finished, "draft did not finish");

    let published = store.load().unwrap();
    let total_picks: u32 = published.draft.picks.values().sum();
    assert_eq!(total_picks, 9);
    assert_eq!(published.draft.total_options(), 0);

    for (seat, session) in sessions.iter().enumerate() {
        let player = PlayerId::new(seat as u8);
        assert_eq!(
            published.base_pet_max_health.get(player),
            Some(&session.loadout().pet_max_health)
        );
    }

    // The drafted loadouts feed the next combat.
    let mut paired = published.clone();
    paired.apply(&SnapshotEdit::Pairings(
        (0..3u8)
            .map(|i| (PlayerId::new(i), PlayerId::new((i + 1) % 3)))
            .collect(),
    ));
    let loadouts: Vec<Loadout> = sessions.into_iter().map(DraftSession::into_loadout).collect();
    let combat_config = CombatConfig::default();
    let combat = CombatSession::start(
        PlayerId::new(0),
        &loadouts[0],
        &paired,
        &registry,
        &combat_config,
        7,
        NullObserver,
    );
    assert_eq!(
        combat.combatant(CombatantRole::LocalPet).effective_max_health(),
        loadouts[0].pet_max_health
    );
    assert_eq!(
        combat.combatant(CombatantRole::OpponentPet).effective_max_health(),
        loadouts[1].pet_max_health
    );
}

/// An arbiter that never dealt the pack rejects the pick and the picker reverts.
#[test]
fn test_rejected_pick_is_reverted() {
    let registry = registry();
    let config = DraftConfig::default();
    let fresh = SharedSnapshot::new(2, 40);
    let store = LocalPropertyStore::new(fresh.clone());
    let mut sessions = join_all(2, &fresh, &registry, &config);

    sessions[0].deal_round();
    exchange(&mut sessions, &store);
    sessions[1].poll(&store).unwrap();

    let before = sessions[1].loadout().clone();
    let option_id = preferred_option(sessions[1].client().view()).unwrap();
    let pick = sessions[1].pick(option_id).unwrap();
    assert!(pick.applied);
    assert_ne!(sessions[1].loadout(), &before);

    // A stand-in arbiter that only knows the empty draft.
    let stale_store = LocalPropertyStore::new(fresh.clone());
    let mut stale = join_all(1, &fresh, &registry, &config).remove(0);
    assert!(stale.is_arbiter());

    let mut wire = Outbox::new();
    sessions[1].flush(&store, &mut wire).unwrap();
    for (_, message) in wire.drain() {
        stale.handle_message(&Envelope::new(PlayerId::new(1), message));
    }
    let mut replies = Outbox::new();
    stale.flush(&stale_store, &mut replies).unwrap();
    for (to, message) in replies.drain() {
        assert_eq!(to, Recipient::Peer(PlayerId::new(1)));
        sessions[1].handle_message(&Envelope::new(PlayerId::new(0), message));
    }

    assert_eq!(sessions[1].loadout(), &before);
    assert!(matches!(sessions[1].client().view(), DraftView::HasPack(_)));
    let pack_events = sessions[1]
        .observer()
        .events
        .iter()
        .filter(|e| matches!(e, ObservedEvent::DraftPack(_)))
        .count();
    assert_eq!(pack_events, 2);
}

proptest! {
    /// Accepted picks remove exactly one option; a pack leaves circulation
    /// only when its last option is taken.
    #[test]
    fn prop_accepted_pick_removes_one_option(
        seed in any::<u64>(),
        players in 1usize..5,
        attempts in prop::collection::vec((0u8..5, 0u32..4), 1..40),
    ) {
        let registry = registry();
        let config = DraftConfig::default();
        let generator = PackGenerator::new(&registry, &config);
        let mut arbiter = DraftArbiter::new(players);
        arbiter.generate_round(&generator, &mut GameRng::new(seed));

        for (seat, option_id) in attempts {
            let player = PlayerId::new(seat);
            let options_before = arbiter.state().total_options();
            let packs_before = arbiter.state().total_packs();
            let head = arbiter.state().head(player).cloned();

            let pack_id = head.as_ref().map_or(u64::MAX, |p| p.id);
            match arbiter.handle_pick(player, pack_id, option_id) {
                Ok(_) => {
                    prop_assert_eq!(arbiter.state().total_options(), options_before - 1);
                    let emptied = head.is_some_and(|p| p.len() == 1);
                    let expected_packs = if emptied { packs_before - 1 } else { packs_before };
                    prop_assert_eq!(arbiter.state().total_packs(), expected_packs);
                }
                Err(_) => {
                    prop_assert_eq!(arbiter.state().total_options(), options_before);
                    prop_assert_eq!(arbiter.state().total_packs(), packs_before);
                }
            }
        }
    }
}
