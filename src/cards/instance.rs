//! Card instances - one physical copy of a card in a deck.
//!
//! A `CardInstance` points at a `CardDefinition` and carries the only
//! per-copy state this game needs: cost reductions and a marker for
//! temporary upgrades. Piles are rebuilt from the deck list every combat,
//! so both vanish when combat ends.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};
use crate::core::entity::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique id of this copy, stable while it moves between piles.
    pub entity: EntityId,

    /// Current definition. Temporary upgrades swap this.
    pub card: CardId,

    /// Cost change applied by cost modifiers. Usually negative.
    pub cost_delta: i32,

    /// Definition before a temporary upgrade.
    pub temp_upgraded_from: Option<CardId>,
}

impl CardInstance {
    #[must_use]
    pub fn new(entity: EntityId, card: CardId) -> Self {
        Self {
            entity,
            card,
            cost_delta: 0,
            temp_upgraded_from: None,
        }
    }

    /// Cost to play this copy, never below zero.
    #[must_use]
    pub fn effective_cost(&self, definition: &CardDefinition) -> i32 {
        (definition.cost + self.cost_delta).max(0)
    }

    /// Reduce the cost of this copy for the rest of combat.
    pub fn reduce_cost(&mut self, amount: i32) {
        self.cost_delta -= amount.max(0);
    }

    /// Swap to `upgraded` for the rest of combat.
    pub fn upgrade_temporarily(&mut self, upgraded: CardId) {
        if self.temp_upgraded_from.is_none() {
            self.temp_upgraded_from = Some(self.card);
        }
        self.card = upgraded;
    }

    #[must_use]
    pub fn is_temporarily_upgraded(&self) -> bool {
        self.temp_upgraded_from.is_some()
    }

    /// Turn this copy into a different card, dropping per-copy tweaks.
    pub fn transform_into(&mut self, card: CardId) {
        self.card = card;
        self.cost_delta = 0;
        self.temp_upgraded_from = None;
    }
}
