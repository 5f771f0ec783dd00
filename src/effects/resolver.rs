//! Card resolution - turning a played card into ledger mutations.
//!
//! Resolution of one card always runs to completion:
//!
//! 1. Validate: the card is in hand and its effective cost is affordable.
//!    Failure returns `Err` with nothing changed.
//! 2. Pay and remove the card from hand.
//! 3. Read the scaling bonus, then apply targeted effects in order:
//!    damage, block, heal, max health, status, damage over time, heal over
//!    time, thorns.
//! 4. Apply target-independent effects in order: energy, draw, random
//!    discard, combo, cost modifier, crit buff, temporary upgrade,
//!    transform, copy.
//! 5. Record the scaling hit, then move the card to discard.
//!
//! A sub-effect that cannot apply is skipped and listed in the report; its
//! siblings still resolve. Changes that a remote peer mirrors are queued in
//! the outbox as they happen.

use tracing::{debug, warn};

use super::context::CombatState;
use super::effect::{LedgerChange, Mutation};
use super::targeting::{select_cards, TargetSelector};
use crate::cards::{
    CardDefinition, CardId, CardRegistry, CopyDestination, CostModifier, CostScope, TransformSpec,
};
use crate::combat::{
    strike, CombatantRole, DamageModifiers, EndOfTurnReport, HitSource, StatusKind, StrikeOutcome,
};
use crate::core::{EntityId, Error, Result};
use crate::sync::{Outbox, Replicator, SyncRoutes};
use crate::zones::Pile;

/// Why a sub-effect did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The effect cannot land on the chosen target.
    WrongTarget(TargetSelector),
    /// The combo's declared target does not suit its payoff.
    ComboTargetMismatch,
    /// No card qualified for the effect.
    NoCandidate,
    /// The opponent's pet has not played a card this combat.
    NothingToCopy,
    UnknownCard(CardId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedEffect {
    pub effect: &'static str,
    pub reason: SkipReason,
}

/// What resolving one card did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub card: CardId,
    pub energy_spent: i32,
    /// The attack on the enemy pet, with any thorns reflection.
    pub hit: Option<StrikeOutcome>,
    pub drawn: usize,
    pub discarded: Vec<CardId>,
    pub combo_fired: bool,
    pub upgraded: Option<(CardId, CardId)>,
    pub transformed: Vec<(CardId, CardId)>,
    pub copied: Option<CardId>,
    pub skipped: Vec<SkippedEffect>,
}

impl ResolveReport {
    fn new(card: CardId, energy_spent: i32) -> Self {
        Self {
            card,
            energy_spent,
            ..Self::default()
        }
    }

    fn skip(&mut self, effect: &'static str, reason: SkipReason) {
        if reason == SkipReason::ComboTargetMismatch {
            debug!(effect, "combo target does not match its effect");
        } else {
            warn!(effect, ?reason, "sub-effect skipped");
        }
        self.skipped.push(SkippedEffect { effect, reason });
    }
}

/// What the opponent pet's card did on this peer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PetTurnReport {
    pub card: CardId,
    pub hit: Option<StrikeOutcome>,
}

/// End-of-turn ticks for the ledgers this peer simulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnEndReport {
    pub player: EndOfTurnReport,
    pub opponent_pet: EndOfTurnReport,
}

/// Resolves cards against a `CombatState`.
pub struct EffectResolver<'a> {
    registry: &'a CardRegistry,
    modifiers: DamageModifiers,
    routes: &'a SyncRoutes,
}

impl<'a> EffectResolver<'a> {
    #[must_use]
    pub fn new(
        registry: &'a CardRegistry,
        modifiers: DamageModifiers,
        routes: &'a SyncRoutes,
    ) -> Self {
        Self {
            registry,
            modifiers,
            routes,
        }
    }

    /// Cost to play a hand card right now, including a pending discount.
    pub fn playable_cost(&self, state: &CombatState, entity: EntityId) -> Result<i32> {
        let instance = state
            .piles
            .hand_card(entity)
            .ok_or(Error::CardNotInHand(entity))?;
        let definition = self.registry.require(instance.card)?;
        Ok((instance.effective_cost(definition) - state.turn.next_card_discount).max(0))
    }

    /// Play a card from hand onto `target`.
    pub fn play_card(
        &self,
        state: &mut CombatState,
        outbox: &mut Outbox,
        entity: EntityId,
        target: TargetSelector,
    ) -> Result<ResolveReport> {
        let cost = self.playable_cost(state, entity)?;
        if cost > state.turn.energy {
            return Err(Error::InsufficientEnergy {
                required: cost,
                available: state.turn.energy,
            });
        }

        let played = state
            .piles
            .remove_from_hand(entity)
            .ok_or(Error::CardNotInHand(entity))?;
        let definition = self.registry.require(played.card)?;
        state.turn.energy -= cost;
        state.turn.next_card_discount = 0;
        state.changes.hand = true;
        state.changes.energy = true;
        debug!(card = %definition.id, %entity, ?target, cost, "resolving card");

        let mut report = ResolveReport::new(definition.id, cost);
        let mut replicator = Replicator::new(self.routes, outbox);

        let bonus = definition
            .scaling
            .as_ref()
            .map_or(0, |s| state.scaling.bonus(&s.id, s.per_hit));

        self.apply_targeted(definition, bonus, target, state, &mut replicator, &mut report);
        self.apply_untargeted(definition, target, state, &mut replicator, &mut report);

        if let (Some(scaling), Some(_)) = (&definition.scaling, report.hit) {
            state.scaling.record_hit(&scaling.id);
        }
        state.piles.push_discard(played);

        Ok(report)
    }

    /// Discard a card from hand by choice, firing its discard effect.
    pub fn discard_card(
        &self,
        state: &mut CombatState,
        outbox: &mut Outbox,
        entity: EntityId,
    ) -> Result<CardId> {
        let card = state
            .piles
            .remove_from_hand(entity)
            .ok_or(Error::CardNotInHand(entity))?;
        state.piles.push_discard(card);
        state.changes.hand = true;

        let mut replicator = Replicator::new(self.routes, outbox);
        let mut report = ResolveReport::default();
        self.fire_discard_trigger(card.card, state, &mut replicator, &mut report);
        Ok(card.card)
    }

    /// Discard the whole hand at end of turn, in hand order.
    pub fn discard_hand(&self, state: &mut CombatState, outbox: &mut Outbox) -> Vec<CardId> {
        let hand = state.piles.take_hand();
        if hand.is_empty() {
            return Vec::new();
        }
        state.changes.hand = true;

        let mut replicator = Replicator::new(self.routes, outbox);
        let mut report = ResolveReport::default();
        let mut discarded = Vec::with_capacity(hand.len());
        for card in hand {
            state.piles.push_discard(card);
            discarded.push(card.card);
            self.fire_discard_trigger(card.card, state, &mut replicator, &mut report);
        }
        discarded
    }

    /// Resolve a card played by the opponent's pet against our player.
    ///
    /// The pet mirror is the attacker. Damage and debuffs land on our
    /// player; block, strength, thorns, crit and heals land on the mirror.
    pub fn play_pet_card(
        &self,
        state: &mut CombatState,
        outbox: &mut Outbox,
        card: CardId,
    ) -> Result<PetTurnReport> {
        let definition = self.registry.require(card)?;
        state.last_opponent_pet_card = Some(card);
        let mut replicator = Replicator::new(self.routes, outbox);
        let mut report = PetTurnReport { card, hit: None };
        let combatants = &mut state.combatants;

        if definition.damage > 0 {
            let roll = state.rngs.crit.roll_percent();
            let outcome = strike(
                &mut combatants.opponent_pet,
                &mut combatants.local_player,
                definition.damage,
                HitSource::Attack,
                roll,
                &self.modifiers,
            );
            if let Some(reflected) = outcome.reflected {
                replicator.opponent_pet_hit(&reflected);
                state.changes.mark(CombatantRole::OpponentPet);
            }
            replicator.player_health(&combatants.local_player);
            state.changes.mark(CombatantRole::LocalPlayer);
            report.hit = Some(outcome);
        }

        let pet = &mut combatants.opponent_pet;
        pet.add_block(definition.block);
        replicator.opponent_pet_healed(pet.heal(definition.heal));
        pet.add_thorns(definition.thorns);
        if let Some(buff) = definition.crit_buff {
            pet.add_crit_buff(buff.amount, buff.remaining_turns);
        }
        if let Some(hot) = definition.heal_over_time {
            pet.add_heal_over_time(hot.amount, hot.remaining_turns);
        }

        let player = &mut combatants.local_player;
        if let Some(grant) = definition.status {
            match grant.kind {
                StatusKind::Weak | StatusKind::Break => {
                    player.apply_status(grant.kind, grant.value);
                }
                StatusKind::Strength => {
                    combatants.opponent_pet.apply_status(grant.kind, grant.value);
                }
            }
        }
        if let Some(dot) = definition.damage_over_time {
            combatants
                .local_player
                .add_damage_over_time(dot.amount, dot.remaining_turns);
        }

        state.changes.mark(CombatantRole::OpponentPet);
        state.changes.mark(CombatantRole::LocalPlayer);
        debug!(%card, "opponent pet card resolved");
        Ok(report)
    }

    /// Run end-of-turn ticks for every ledger this peer simulates.
    ///
    /// Our player and the opponent pet mirror tick in full, and the mirror's
    /// results are forwarded to the pet's owner. Our own pet is ticked by
    /// the peer fighting it, so here its timed effects only age.
    pub fn process_end_of_turn(
        &self,
        state: &mut CombatState,
        outbox: &mut Outbox,
    ) -> TurnEndReport {
        let mut replicator = Replicator::new(self.routes, outbox);
        let combatants = &mut state.combatants;

        let player = combatants.local_player.process_end_of_turn_effects(&self.modifiers);
        combatants.local_player.decrement_debuffs();
        replicator.player_health(&combatants.local_player);

        let opponent_pet = combatants.opponent_pet.process_end_of_turn_effects(&self.modifiers);
        combatants.opponent_pet.decrement_debuffs();
        replicator.opponent_pet_damage(opponent_pet.damage_taken, opponent_pet.block_consumed);
        replicator.opponent_pet_healed(opponent_pet.healed);

        combatants.local_pet.age_timed_effects();
        combatants.local_pet.decrement_debuffs();

        for role in [
            CombatantRole::LocalPlayer,
            CombatantRole::LocalPet,
            CombatantRole::OpponentPet,
        ] {
            state.changes.mark(role);
        }

        TurnEndReport {
            player,
            opponent_pet,
        }
    }

    fn apply_targeted(
        &self,
        definition: &CardDefinition,
        scaling_bonus: i32,
        target: TargetSelector,
        state: &mut CombatState,
        replicator: &mut Replicator<'_, Outbox>,
        report: &mut ResolveReport,
    ) {
        let role = target.role();
        let combatants = &mut state.combatants;

        if definition.is_attack() {
            if target == TargetSelector::EnemyPet {
                let roll = state.rngs.crit.roll_percent();
                let outcome = strike(
                    &mut combatants.local_player,
                    &mut combatants.opponent_pet,
                    definition.damage + scaling_bonus,
                    HitSource::Attack,
                    roll,
                    &self.modifiers,
                );
                replicator.opponent_pet_hit(&outcome.hit);
                state.changes.mark(CombatantRole::OpponentPet);
                if outcome.reflected.is_some() {
                    replicator.player_health(&combatants.local_player);
                    state.changes.mark(CombatantRole::LocalPlayer);
                }
                debug!(
                    damage = outcome.hit.after_block,
                    critical = outcome.hit.is_critical,
                    "enemy pet hit"
                );
                report.hit = Some(outcome);
            } else {
                report.skip("damage", SkipReason::WrongTarget(target));
            }
        }

        let beneficial = definition.block > 0
            || definition.heal > 0
            || definition.max_health_delta != 0
            || definition.heal_over_time.is_some()
            || definition.thorns > 0;
        if beneficial && !target.is_own() {
            report.skip("buff", SkipReason::WrongTarget(target));
        }

        if target.is_own() {
            let ledger = combatants.get_mut(role);

            if definition.block > 0 {
                ledger.add_block(definition.block);
                if target == TargetSelector::OwnPet {
                    replicator.pet_block(ledger);
                }
            }

            if definition.heal > 0 {
                let healed = ledger.heal(definition.heal);
                match target {
                    TargetSelector::OwnPet => replicator.pet_healed(healed),
                    _ => replicator.player_health(ledger),
                }
            }

            if definition.max_health_delta != 0 {
                ledger.add_temp_max_health(definition.max_health_delta);
                match target {
                    TargetSelector::OwnPet => replicator.pet_max_health(ledger),
                    _ => replicator.player_health(ledger),
                }
            }
        }

        // Statuses and damage over time land on any target. On the enemy
        // pet they stay on the mirror, which is where that pet's turns and
        // ticks are simulated.
        if let Some(grant) = definition.status {
            combatants.get_mut(role).apply_status(grant.kind, grant.value);
            if target == TargetSelector::OwnPet {
                replicator.pet_status(grant.kind, grant.value);
            }
        }

        if let Some(dot) = definition.damage_over_time {
            combatants
                .get_mut(role)
                .add_damage_over_time(dot.amount, dot.remaining_turns);
            if target == TargetSelector::OwnPet {
                replicator.pet_damage_over_time(dot.amount, dot.remaining_turns);
            }
        }

        if target.is_own() {
            let ledger = combatants.get_mut(role);
            if let Some(hot) = definition.heal_over_time {
                ledger.add_heal_over_time(hot.amount, hot.remaining_turns);
                if target == TargetSelector::OwnPet {
                    replicator.pet_heal_over_time(hot.amount, hot.remaining_turns);
                }
            }
            if definition.thorns > 0 {
                ledger.add_thorns(definition.thorns);
                if target == TargetSelector::OwnPet {
                    replicator.pet_thorns(definition.thorns);
                }
            }
        }

        state.changes.mark(role);
    }

    fn apply_untargeted(
        &self,
        definition: &CardDefinition,
        target: TargetSelector,
        state: &mut CombatState,
        replicator: &mut Replicator<'_, Outbox>,
        report: &mut ResolveReport,
    ) {
        if definition.energy_gain != 0 {
            state.turn.energy += definition.energy_gain;
            state.changes.energy = true;
        }

        if definition.draw > 0 {
            self.draw(definition.draw, state, report);
        }

        for _ in 0..definition.discard_random {
            let Some(card) = state.piles.take_random_from_hand(&mut state.rngs.effects) else {
                break;
            };
            state.piles.push_discard(card);
            state.changes.hand = true;
            report.discarded.push(card.card);
            self.fire_discard_trigger(card.card, state, replicator, report);
        }

        if definition.combo_starter {
            state.turn.combo_count += 1;
        }
        if let Some(combo) = definition.combo {
            if state.turn.combo_count >= combo.threshold {
                state.turn.combo_count = 0;
                match combo.effect.mutation(combo.target) {
                    Some(mutation) => {
                        debug!(effect = ?combo.effect, "combo triggered");
                        self.apply_mutation(mutation, state, replicator, report);
                        report.combo_fired = true;
                    }
                    None => report.skip("combo", SkipReason::ComboTargetMismatch),
                }
            }
        }

        if let Some(modifier) = definition.cost_modifier {
            self.apply_cost_modifier(modifier, state, report);
        }

        if let Some(buff) = definition.crit_buff {
            if target == TargetSelector::OwnPet {
                state
                    .combatants
                    .local_pet
                    .add_crit_buff(buff.amount, buff.remaining_turns);
                replicator.pet_crit_buff(buff.amount, buff.remaining_turns);
                state.changes.mark(CombatantRole::LocalPet);
            } else {
                state
                    .combatants
                    .local_player
                    .add_crit_buff(buff.amount, buff.remaining_turns);
                state.changes.mark(CombatantRole::LocalPlayer);
            }
        }

        if definition.temporary_upgrade {
            self.upgrade_random_hand_card(state, report);
        }

        if let Some(spec) = definition.transform {
            self.transform(spec, definition.id, state, report);
        }

        if let Some(destination) = definition.copy {
            self.copy_last_pet_card(destination, state, report);
        }
    }

    fn draw(&self, count: u32, state: &mut CombatState, report: &mut ResolveReport) {
        let outcomes = state.piles.draw_many(count, &mut state.rngs.piles);
        report.drawn += outcomes.len();
        state.changes.hand = true;
    }

    fn fire_discard_trigger(
        &self,
        card: CardId,
        state: &mut CombatState,
        replicator: &mut Replicator<'_, Outbox>,
        report: &mut ResolveReport,
    ) {
        let Some(definition) = self.registry.get(card) else {
            warn!(%card, "discarded card missing from catalog");
            report.skip("discard trigger", SkipReason::UnknownCard(card));
            return;
        };
        if let Some(effect) = definition.on_discard {
            debug!(%card, ?effect, "discard trigger");
            self.apply_mutation(effect.mutation(), state, replicator, report);
        }
    }

    /// Apply a combo or discard mutation and replicate what it changed.
    fn apply_mutation(
        &self,
        mutation: Mutation,
        state: &mut CombatState,
        replicator: &mut Replicator<'_, Outbox>,
        report: &mut ResolveReport,
    ) {
        match mutation {
            Mutation::Draw(count) => self.draw(count, state, report),
            Mutation::Energy(amount) => {
                state.turn.energy += amount;
                state.changes.energy = true;
            }
            Mutation::Damage {
                target: CombatantRole::OpponentPet,
                amount,
            } => self.effect_strike(amount, state, replicator),
            _ => self.apply_ledger_mutation(mutation, state, replicator),
        }
    }

    /// Trigger damage on the enemy pet. Thorns on the pet reflect onto our
    /// player.
    fn effect_strike(
        &self,
        amount: i32,
        state: &mut CombatState,
        replicator: &mut Replicator<'_, Outbox>,
    ) {
        let combatants = &mut state.combatants;
        let outcome = strike(
            &mut combatants.local_player,
            &mut combatants.opponent_pet,
            amount,
            HitSource::Effect,
            0,
            &self.modifiers,
        );
        replicator.opponent_pet_hit(&outcome.hit);
        state.changes.mark(CombatantRole::OpponentPet);
        if outcome.reflected.is_some() {
            replicator.player_health(&combatants.local_player);
            state.changes.mark(CombatantRole::LocalPlayer);
        }
        debug!(damage = outcome.hit.after_block, "trigger hit enemy pet");
    }

    fn apply_ledger_mutation(
        &self,
        mutation: Mutation,
        state: &mut CombatState,
        replicator: &mut Replicator<'_, Outbox>,
    ) {
        let Some(target) = mutation.target() else {
            return;
        };
        let ledger = state.combatants.get_mut(target);
        let Some(change) = mutation.apply_to(ledger, &self.modifiers) else {
            return;
        };
        state.changes.mark(target);

        match (target, change) {
            (CombatantRole::OpponentPet, LedgerChange::Hit(hit)) => {
                replicator.opponent_pet_hit(&hit);
            }
            (CombatantRole::OpponentPet, LedgerChange::Healed(amount)) => {
                replicator.opponent_pet_healed(amount);
            }
            (CombatantRole::LocalPet, LedgerChange::Blocked(_)) => replicator.pet_block(ledger),
            (CombatantRole::LocalPet, LedgerChange::Healed(amount)) => {
                replicator.pet_healed(amount);
            }
            (CombatantRole::LocalPet, LedgerChange::Status) => {
                if let Mutation::Status { kind, value, .. } = mutation {
                    replicator.pet_status(kind, value);
                }
            }
            (CombatantRole::LocalPlayer, LedgerChange::Hit(_) | LedgerChange::Healed(_)) => {
                replicator.player_health(ledger);
            }
            _ => {}
        }
    }

    fn apply_cost_modifier(
        &self,
        modifier: CostModifier,
        state: &mut CombatState,
        report: &mut ResolveReport,
    ) {
        match modifier.scope {
            CostScope::NextCard => state.turn.next_card_discount += modifier.reduction.max(0),
            CostScope::RandomCardInHand => {
                let hand = state.piles.hand_mut();
                if hand.is_empty() {
                    report.skip("cost modifier", SkipReason::NoCandidate);
                    return;
                }
                let index = state.rngs.effects.gen_range_usize(0..hand.len());
                hand[index].reduce_cost(modifier.reduction);
            }
            CostScope::AllCardsInHand => {
                for card in state.piles.hand_mut() {
                    card.reduce_cost(modifier.reduction);
                }
            }
        }
        state.changes.hand = true;
    }

    fn upgrade_random_hand_card(&self, state: &mut CombatState, report: &mut ResolveReport) {
        let candidates: Vec<(EntityId, CardId)> = state
            .piles
            .hand()
            .iter()
            .filter(|c| !c.is_temporarily_upgraded())
            .filter_map(|c| self.registry.upgraded_of(c.card).map(|up| (c.entity, up.id)))
            .collect();

        let Some(&(entity, upgraded)) = state.rngs.effects.choose(&candidates) else {
            report.skip("temporary upgrade", SkipReason::NoCandidate);
            return;
        };
        if let Some(card) = state.piles.hand_card_mut(entity) {
            let original = card.card;
            card.upgrade_temporarily(upgraded);
            report.upgraded = Some((original, upgraded));
            state.changes.hand = true;
        }
    }

    /// Replace hand cards with random cards of a shifted rarity.
    ///
    /// Each selected card transforms independently; one without a
    /// candidate is skipped and the rest still transform.
    fn transform(
        &self,
        spec: TransformSpec,
        trigger: CardId,
        state: &mut CombatState,
        report: &mut ResolveReport,
    ) {
        let candidates: Vec<(EntityId, i32)> = state
            .piles
            .hand()
            .iter()
            .filter_map(|c| {
                self.registry
                    .get(c.card)
                    .map(|d| (c.entity, c.effective_cost(d)))
            })
            .collect();
        let selected = select_cards(&candidates, spec.count, spec.rule, &mut state.rngs.effects);

        for entity in selected {
            let Some(current) = state
                .piles
                .hand_card(entity)
                .and_then(|c| self.registry.get(c.card))
            else {
                continue;
            };
            let rarity = current.rarity.shifted(spec.rarity_delta);
            let pool: Vec<CardId> = self
                .registry
                .pool_with_rarity(rarity)
                .into_iter()
                .filter(|&id| id != current.id && id != trigger)
                .collect();

            match state.rngs.effects.choose(&pool).copied() {
                Some(replacement) => {
                    if let Some(card) = state.piles.hand_card_mut(entity) {
                        card.transform_into(replacement);
                        report.transformed.push((current.id, replacement));
                        state.changes.hand = true;
                    }
                }
                None => report.skip("transform", SkipReason::NoCandidate),
            }
        }
    }

    fn copy_last_pet_card(
        &self,
        destination: CopyDestination,
        state: &mut CombatState,
        report: &mut ResolveReport,
    ) {
        let Some(card) = state.last_opponent_pet_card else {
            report.skip("copy", SkipReason::NothingToCopy);
            return;
        };
        if !self.registry.contains(card) {
            warn!(%card, "copied card missing from catalog");
            report.skip("copy", SkipReason::UnknownCard(card));
            return;
        }

        let pile = match destination {
            CopyDestination::Hand => Pile::Hand,
            CopyDestination::Discard => Pile::Discard,
        };
        state.piles.add_card(card, pile);
        report.copied = Some(card);
        state.changes.hand = true;
    }
}
