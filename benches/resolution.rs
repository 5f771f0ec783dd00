//! Benchmarks for damage math and card resolution.
//!
//! Run with: cargo bench --bench resolution

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use pet_duel::combat::{compute, DamageInput, DamageModifiers};
use pet_duel::{
    CardDefinition, CardId, CardRegistry, CombatConfig, CombatSession, Loadout, NullObserver,
    PlayerId, SharedSnapshot, SnapshotEdit, StatusKind, TargetSelector,
};

fn catalog() -> CardRegistry {
    CardRegistry::from_cards([
        CardDefinition::new(CardId::new(1), "Strike").with_cost(1).with_damage(6),
        CardDefinition::new(CardId::new(2), "Guard").with_cost(1).with_block(5),
        CardDefinition::new(CardId::new(3), "Hex")
            .with_cost(1)
            .with_status(StatusKind::Weak, 2)
            .with_damage_over_time(2, 3),
        CardDefinition::new(CardId::new(4), "Rampage")
            .with_cost(1)
            .with_damage(4)
            .with_scaling("rampage", 2),
        CardDefinition::new(CardId::new(5), "Second Wind").with_draw(2).with_energy_gain(1),
    ])
    .expect("catalog ids are unique")
}

fn paired_snapshot() -> SharedSnapshot {
    let mut snapshot = SharedSnapshot::new(2, 40);
    let mut pairings = BTreeMap::new();
    pairings.insert(PlayerId::new(0), PlayerId::new(1));
    pairings.insert(PlayerId::new(1), PlayerId::new(0));
    snapshot.apply(&SnapshotEdit::Pairings(pairings));
    snapshot
}

fn benchmark_compute(c: &mut Criterion) {
    let modifiers = DamageModifiers::default();
    let input = DamageInput::attack(10)
        .with_strength(3)
        .with_weak(true)
        .with_broken(true)
        .with_target_block(4)
        .with_crit_percent(20);

    c.bench_function("damage_compute", |b| {
        let mut roll = 0u32;
        b.iter(|| {
            roll = (roll + 7) % 100;
            black_box(compute(black_box(&input), black_box(roll), &modifiers))
        });
    });
}

fn benchmark_turn(c: &mut Criterion) {
    let registry = catalog();
    let config = CombatConfig::default().with_health(1_000, 1_000);
    let snapshot = paired_snapshot();
    let deck: Vec<CardId> = (1..=5).cycle().take(20).map(CardId::new).collect();
    let loadout = Loadout::new(deck, &config);

    c.bench_function("full_turn", |b| {
        b.iter_batched(
            || {
                CombatSession::start(
                    PlayerId::new(0),
                    &loadout,
                    &snapshot,
                    &registry,
                    &config,
                    42,
                    NullObserver,
                )
            },
            |mut session| {
                while let Some(card) = session.hand().first().copied() {
                    let target = if card.card == CardId::new(2) {
                        TargetSelector::OwnPet
                    } else {
                        TargetSelector::EnemyPet
                    };
                    if session.play_card(card.entity, target).is_err() {
                        break;
                    }
                }
                black_box(session.end_turn())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, benchmark_compute, benchmark_turn);
criterion_main!(benches);
