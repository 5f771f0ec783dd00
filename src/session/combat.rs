//! One peer's side of a combat.
//!
//! A `CombatSession` owns the four ledgers, the card piles and the turn
//! state for one combat. Each public action resolves completely, queues its
//! peer messages, then reports the touched state to the observer. The
//! caller flushes the queued messages to the network with `flush`.

use tracing::{debug, info, warn};

use super::observer::SessionObserver;
use crate::cards::{CardId, CardInstance, CardRegistry};
use crate::combat::{CombatantLedger, CombatantRole, Combatants, DamageModifiers};
use crate::core::{CombatConfig, EntityId, Phase, PlayerId, Result};
use crate::draft::Loadout;
use crate::effects::{
    CombatRngs, CombatState, EffectResolver, PetTurnReport, ResolveReport, TargetSelector,
    TurnEndReport, TurnState,
};
use crate::sync::{
    apply_inbound, Envelope, Outbox, PeerTransport, Replicator, SharedSnapshot, SnapshotEdit,
    SnapshotPublisher, SyncRoutes,
};
use crate::zones::CardPiles;

/// How a combat ended for this peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatOutcome {
    /// The opponent's pet fell and our player survived.
    pub won: bool,
    pub player_health: i32,
    pub opponent_pet_health: i32,
}

pub struct CombatSession<'a, O: SessionObserver> {
    registry: &'a CardRegistry,
    config: &'a CombatConfig,
    modifiers: DamageModifiers,
    routes: SyncRoutes,
    state: CombatState,
    outbox: Outbox,
    observer: O,
    outcome: Option<CombatOutcome>,
}

impl<'a, O: SessionObserver> CombatSession<'a, O> {
    /// Set up a combat from the local loadout and the shared snapshot, then
    /// start the first turn.
    ///
    /// The snapshot's pairing map decides whose pet we fight and who fights
    /// ours. Our pet's max health comes from the loadout; the opponent
    /// pet's comes from what its owner published.
    pub fn start(
        local: PlayerId,
        loadout: &Loadout,
        snapshot: &SharedSnapshot,
        registry: &'a CardRegistry,
        config: &'a CombatConfig,
        seed: u64,
        observer: O,
    ) -> Self {
        let routes = SyncRoutes {
            local,
            pet_owner: snapshot.pet_owner_of(local),
            pet_attacker: snapshot.attacker_of(local),
        };
        if routes.pet_owner.is_none() {
            warn!(%local, "no pairing for this peer, combat runs unsynchronized");
        }

        let opponent_pet_health = routes
            .pet_owner
            .and_then(|owner| snapshot.base_pet_max_health.get(owner).copied())
            .unwrap_or(config.pet_max_health);
        let combatants = Combatants::new(
            CombatantLedger::new(loadout.player_max_health, loadout.base_crit_percent),
            CombatantLedger::new(loadout.pet_max_health, config.base_crit_percent),
            CombatantLedger::new(opponent_pet_health, config.base_crit_percent),
            CombatantLedger::new(config.player_max_health, config.base_crit_percent),
        );

        let mut rngs = CombatRngs::from_seed(seed);
        let piles = CardPiles::from_deck(&loadout.deck, config.max_hand_size, &mut rngs.piles);

        let mut session = Self {
            registry,
            config,
            modifiers: DamageModifiers::from(config),
            routes,
            state: CombatState::new(combatants, piles, rngs),
            outbox: Outbox::new(),
            observer,
            outcome: None,
        };

        info!(
            %local,
            owner = ?routes.pet_owner,
            attacker = ?routes.pet_attacker,
            deck = loadout.deck.len(),
            "combat started"
        );
        session.observer.on_phase_changed(Phase::Combat);
        for role in CombatantRole::ALL {
            session.state.changes.mark(role);
        }
        session.start_turn();
        session
    }

    #[must_use]
    pub fn routes(&self) -> &SyncRoutes {
        &self.routes
    }

    #[must_use]
    pub fn state(&self) -> &CombatState {
        &self.state
    }

    #[must_use]
    pub fn combatant(&self, role: CombatantRole) -> &CombatantLedger {
        self.state.combatants.get(role)
    }

    #[must_use]
    pub fn hand(&self) -> &[CardInstance] {
        self.state.piles.hand()
    }

    #[must_use]
    pub fn energy(&self) -> i32 {
        self.state.turn.energy
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    #[must_use]
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Either side of our fight is down, or the combat was already closed.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
            || self.state.combatants.local_player.is_defeated()
            || self.state.combatants.opponent_pet.is_defeated()
    }

    /// Refill energy, drop last turn's block and draw up to the hand size.
    pub fn start_turn(&mut self) {
        self.state.turn = TurnState::start(self.config.energy_per_turn);
        self.state.combatants.local_player.reset_block();
        self.state.combatants.local_pet.reset_block();
        Replicator::new(&self.routes, &mut self.outbox).pet_block_reset();

        let held = u32::try_from(self.state.piles.hand().len()).unwrap_or(u32::MAX);
        let drawn = self
            .state
            .piles
            .draw_many(self.config.hand_draw.saturating_sub(held), &mut self.state.rngs.piles);
        debug!(drawn = drawn.len(), energy = self.state.turn.energy, "turn started");

        self.state.changes.hand = true;
        self.state.changes.energy = true;
        self.state.changes.mark(CombatantRole::LocalPlayer);
        self.state.changes.mark(CombatantRole::LocalPet);
        self.notify();
    }

    pub fn play_card(&mut self, entity: EntityId, target: TargetSelector) -> Result<ResolveReport> {
        let resolver = EffectResolver::new(self.registry, self.modifiers, &self.routes);
        let report = resolver.play_card(&mut self.state, &mut self.outbox, entity, target);
        self.notify();
        report
    }

    pub fn discard_card(&mut self, entity: EntityId) -> Result<CardId> {
        let resolver = EffectResolver::new(self.registry, self.modifiers, &self.routes);
        let discarded = resolver.discard_card(&mut self.state, &mut self.outbox, entity);
        self.notify();
        discarded
    }

    /// The opponent's pet takes its turn against our player.
    pub fn resolve_pet_card(&mut self, card: CardId) -> Result<PetTurnReport> {
        let resolver = EffectResolver::new(self.registry, self.modifiers, &self.routes);
        let report = resolver.play_pet_card(&mut self.state, &mut self.outbox, card);
        self.notify();
        report
    }

    /// Discard the hand, firing discard triggers, then run end-of-turn ticks.
    pub fn end_turn(&mut self) -> TurnEndReport {
        let resolver = EffectResolver::new(self.registry, self.modifiers, &self.routes);
        let discarded = resolver.discard_hand(&mut self.state, &mut self.outbox);
        let report = resolver.process_end_of_turn(&mut self.state, &mut self.outbox);
        debug!(discarded = discarded.len(), "turn ended");
        self.notify();
        report
    }

    /// Apply a message from another peer to our ledgers.
    ///
    /// Returns whether anything changed. Draft traffic is not handled here.
    pub fn handle_message(&mut self, envelope: &Envelope) -> bool {
        if envelope.message.is_draft() {
            debug!(from = %envelope.from, "not a combat message");
            return false;
        }
        match apply_inbound(&self.routes, &mut self.state.combatants, envelope) {
            Some(role) => {
                self.state.changes.mark(role);
                self.notify();
                true
            }
            None => false,
        }
    }

    /// Hand queued messages to the network.
    pub fn flush<T: PeerTransport + ?Sized>(&mut self, transport: &mut T) {
        self.outbox.flush_into(transport);
    }

    /// Close the combat, stage our finished flag and score, then reset all
    /// four ledgers to full health with no statuses.
    ///
    /// Calling it again returns the same outcome without staging twice.
    pub fn end_combat(&mut self, publisher: &mut SnapshotPublisher) -> CombatOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        let combatants = &self.state.combatants;
        let outcome = CombatOutcome {
            won: combatants.opponent_pet.is_defeated() && !combatants.local_player.is_defeated(),
            player_health: combatants.local_player.health(),
            opponent_pet_health: combatants.opponent_pet.health(),
        };

        let local = self.routes.local;
        publisher.stage(SnapshotEdit::CombatFinished {
            player: local,
            finished: true,
        });
        if outcome.won {
            publisher.stage(SnapshotEdit::AddScore {
                player: local,
                delta: 1,
            });
        }

        for role in CombatantRole::ALL {
            self.state.combatants.get_mut(role).reset_for_round();
            self.state.changes.mark(role);
        }
        self.notify();

        info!(%local, won = outcome.won, "combat finished");
        self.outcome = Some(outcome);
        self.observer.on_phase_changed(Phase::RoundEnd);
        outcome
    }

    fn notify(&mut self) {
        let changes = self.state.take_changes();
        if changes.is_empty() {
            return;
        }
        if changes.hand {
            self.observer.on_hand_changed(self.state.piles.hand());
        }
        if changes.energy {
            self.observer.on_energy_changed(self.state.turn.energy);
        }
        for &role in changes.roles() {
            let ledger = self.state.combatants.get(role);
            self.observer
                .on_health_or_block_changed(role, ledger.health(), ledger.block());
            self.observer.on_status_changed(role, &ledger.snapshot());
        }
    }
}
