//! A player's persistent build between combats.
//!
//! Draft picks mutate the loadout. Each application returns a
//! `LoadoutChange` so a pick the arbiter rejects can be undone exactly.

use serde::{Deserialize, Serialize};

use super::pack::{DraftPayload, StatUpgrade};
use crate::cards::{CardId, CardRegistry};
use crate::core::{CombatConfig, Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub deck: Vec<CardId>,
    pub player_max_health: i32,
    pub pet_max_health: i32,
    pub base_crit_percent: i32,
}

/// Undo record for one applied payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadoutChange {
    AddedCard { index: usize },
    Stat(StatUpgrade),
    UpgradedCard { index: usize, from: CardId },
}

impl Loadout {
    /// Starting loadout for `deck` with health and crit from `config`.
    #[must_use]
    pub fn new(deck: Vec<CardId>, config: &CombatConfig) -> Self {
        Self {
            deck,
            player_max_health: config.player_max_health,
            pet_max_health: config.pet_max_health,
            base_crit_percent: config.base_crit_percent,
        }
    }

    /// Apply a draft payload.
    ///
    /// Fails without changing anything if the card is unknown, absent from
    /// the deck, or has no upgraded version.
    pub fn apply(
        &mut self,
        payload: DraftPayload,
        registry: &CardRegistry,
    ) -> Result<LoadoutChange> {
        match payload {
            DraftPayload::AddCard(card) => {
                registry.require(card)?;
                self.deck.push(card);
                Ok(LoadoutChange::AddedCard { index: self.deck.len() - 1 })
            }
            DraftPayload::UpgradeStat(stat) => {
                self.adjust_stat(stat, 1);
                Ok(LoadoutChange::Stat(stat))
            }
            DraftPayload::UpgradeCard(card) => {
                let index = self
                    .deck
                    .iter()
                    .position(|&c| c == card)
                    .ok_or(Error::CardNotInDeck(card))?;
                let upgraded = registry.upgraded_of(card).ok_or(Error::NoUpgrade(card))?;
                self.deck[index] = upgraded.id;
                Ok(LoadoutChange::UpgradedCard { index, from: card })
            }
        }
    }

    /// Undo a change returned by `apply`.
    pub fn revert(&mut self, change: LoadoutChange) {
        match change {
            LoadoutChange::AddedCard { index } => {
                if index < self.deck.len() {
                    self.deck.remove(index);
                }
            }
            LoadoutChange::Stat(stat) => self.adjust_stat(stat, -1),
            LoadoutChange::UpgradedCard { index, from } => {
                if let Some(slot) = self.deck.get_mut(index) {
                    *slot = from;
                }
            }
        }
    }

    fn adjust_stat(&mut self, stat: StatUpgrade, sign: i32) {
        match stat {
            StatUpgrade::PetMaxHealth(amount) => self.pet_max_health += sign * amount,
            StatUpgrade::PlayerMaxHealth(amount) => self.player_max_health += sign * amount,
            StatUpgrade::CritChance(amount) => self.base_crit_percent += sign * amount,
        }
    }
}
