//! Card registry for definition lookup.
//!
//! The `CardRegistry` is the shared catalog: loaded once at startup and
//! read by the resolver, the transform effect and the draft generator.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, Rarity};
use crate::core::error::{Error, Result};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use pet_duel::cards::{CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardDefinition::new(CardId::new(1), "Strike").with_damage(6))
///     .unwrap();
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Strike");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a catalog, rejecting duplicate ids.
    pub fn from_cards(cards: impl IntoIterator<Item = CardDefinition>) -> Result<Self> {
        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Register a card definition.
    pub fn register(&mut self, card: CardDefinition) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(Error::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a definition or an `UnknownCard` error.
    pub fn require(&self, id: CardId) -> Result<&CardDefinition> {
        self.get(id).ok_or(Error::UnknownCard(id))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Base cards of `rarity`, sorted so random picks are reproducible
    /// from a seed. Upgraded definitions are never part of the pool.
    #[must_use]
    pub fn pool_with_rarity(&self, rarity: Rarity) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .cards
            .values()
            .filter(|c| c.rarity == rarity && !c.is_upgrade)
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of base (non-upgrade) cards, sorted.
    #[must_use]
    pub fn draftable_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .cards
            .values()
            .filter(|c| !c.is_upgrade)
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The upgraded definition linked from `id`, if it exists.
    #[must_use]
    pub fn upgraded_of(&self, id: CardId) -> Option<&CardDefinition> {
        self.get(id)
            .and_then(|c| c.upgraded)
            .and_then(|up| self.get(up))
    }
}
