//! Deck, hand and discard for one player during combat.
//!
//! The deck is a stack: the last element is the top card. Cards never leave
//! the three piles during combat, so `total()` only changes when an effect
//! creates a card (copy) and never when cards move.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardInstance};
use crate::core::entity::EntityId;
use crate::core::rng::GameRng;

/// One of the three combat piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Deck,
    Hand,
    Discard,
}

/// What happened to one draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The card went to hand.
    Drawn(CardInstance),
    /// Hand was full; the card went straight to discard.
    Overflowed(CardInstance),
    /// Deck and discard are both empty.
    Exhausted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPiles {
    deck: Vec<CardInstance>,
    hand: Vec<CardInstance>,
    discard: Vec<CardInstance>,
    next_entity: u32,
    max_hand_size: usize,
}

impl CardPiles {
    /// Build shuffled piles from a deck list.
    #[must_use]
    pub fn from_deck(cards: &[CardId], max_hand_size: usize, rng: &mut GameRng) -> Self {
        let mut piles = Self {
            deck: Vec::with_capacity(cards.len()),
            hand: Vec::new(),
            discard: Vec::new(),
            next_entity: 0,
            max_hand_size,
        };
        for &card in cards {
            piles.add_card(card, Pile::Deck);
        }
        rng.shuffle(&mut piles.deck);
        piles
    }

    #[must_use]
    pub fn deck(&self) -> &[CardInstance] {
        &self.deck
    }

    #[must_use]
    pub fn hand(&self) -> &[CardInstance] {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut [CardInstance] {
        &mut self.hand
    }

    #[must_use]
    pub fn discard(&self) -> &[CardInstance] {
        &self.discard
    }

    #[must_use]
    pub fn max_hand_size(&self) -> usize {
        self.max_hand_size
    }

    /// Cards across all three piles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len()
    }

    #[must_use]
    pub fn hand_card(&self, entity: EntityId) -> Option<&CardInstance> {
        self.hand.iter().find(|c| c.entity == entity)
    }

    pub fn hand_card_mut(&mut self, entity: EntityId) -> Option<&mut CardInstance> {
        self.hand.iter_mut().find(|c| c.entity == entity)
    }

    /// Draw the top card, reshuffling discard into the deck when needed.
    pub fn draw(&mut self, rng: &mut GameRng) -> DrawOutcome {
        if self.deck.is_empty() {
            if self.discard.is_empty() {
                return DrawOutcome::Exhausted;
            }
            self.deck.append(&mut self.discard);
            rng.shuffle(&mut self.deck);
        }

        let Some(card) = self.deck.pop() else {
            return DrawOutcome::Exhausted;
        };
        if self.hand.len() >= self.max_hand_size {
            self.discard.push(card);
            DrawOutcome::Overflowed(card)
        } else {
            self.hand.push(card);
            DrawOutcome::Drawn(card)
        }
    }

    /// Draw up to `count` cards, stopping early when both piles run dry.
    pub fn draw_many(&mut self, count: u32, rng: &mut GameRng) -> Vec<DrawOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..count {
            let outcome = self.draw(rng);
            if outcome == DrawOutcome::Exhausted {
                break;
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Take a specific card out of hand, keeping the order of the rest.
    pub fn remove_from_hand(&mut self, entity: EntityId) -> Option<CardInstance> {
        let index = self.hand.iter().position(|c| c.entity == entity)?;
        Some(self.hand.remove(index))
    }

    /// Take a uniformly random card out of hand.
    pub fn take_random_from_hand(&mut self, rng: &mut GameRng) -> Option<CardInstance> {
        if self.hand.is_empty() {
            return None;
        }
        let index = rng.gen_range_usize(0..self.hand.len());
        Some(self.hand.remove(index))
    }

    /// Empty the hand, returning the cards in hand order.
    pub fn take_hand(&mut self) -> Vec<CardInstance> {
        std::mem::take(&mut self.hand)
    }

    pub fn push_discard(&mut self, card: CardInstance) {
        self.discard.push(card);
    }

    /// Create a new instance of `card` and put it on `pile`.
    ///
    /// A full hand sends the new card to discard instead. Returns the pile
    /// the card actually landed on.
    pub fn add_card(&mut self, card: CardId, pile: Pile) -> (EntityId, Pile) {
        let entity = EntityId(self.next_entity);
        self.next_entity += 1;
        let instance = CardInstance::new(entity, card);

        let landed = match pile {
            Pile::Hand if self.hand.len() >= self.max_hand_size => Pile::Discard,
            other => other,
        };
        match landed {
            Pile::Deck => self.deck.push(instance),
            Pile::Hand => self.hand.push(instance),
            Pile::Discard => self.discard.push(instance),
        }
        (entity, landed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piles(cards: u32, max_hand: usize) -> (CardPiles, GameRng) {
        let mut rng = GameRng::new(7);
        let ids: Vec<CardId> = (0..cards).map(CardId::new).collect();
        (CardPiles::from_deck(&ids, max_hand, &mut rng), rng)
    }

    #[test]
    fn test_from_deck_assigns_unique_entities() {
        let (piles, _) = piles(6, 10);
        let mut entities: Vec<_> = piles.deck().iter().map(|c| c.entity).collect();
        entities.sort();
        entities.dedup();
        assert_eq!(entities.len(), 6);
        assert_eq!(piles.total(), 6);
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let (mut piles, mut rng) = piles(2, 10);
        piles.draw_many(2, &mut rng);
        for card in piles.take_hand() {
            piles.push_discard(card);
        }
        assert!(piles.deck().is_empty());

        assert!(matches!(piles.draw(&mut rng), DrawOutcome::Drawn(_)));
        assert_eq!(piles.deck().len(), 1);
        assert!(piles.discard().is_empty());
    }

    #[test]
    fn test_draw_exhausted() {
        let (mut piles, mut rng) = piles(2, 10);
        let drawn = piles.draw_many(5, &mut rng);
        assert_eq!(drawn.len(), 2);
        assert_eq!(piles.draw(&mut rng), DrawOutcome::Exhausted);
    }

    #[test]
    fn test_overflow_goes_to_discard() {
        let (mut piles, mut rng) = piles(4, 2);
        let outcomes = piles.draw_many(4, &mut rng);

        assert_eq!(piles.hand().len(), 2);
        assert_eq!(piles.discard().len(), 2);
        assert!(matches!(outcomes[3], DrawOutcome::Overflowed(_)));
        assert_eq!(piles.total(), 4);
    }

    #[test]
    fn test_remove_from_hand_keeps_order() {
        let (mut piles, mut rng) = piles(3, 10);
        piles.draw_many(3, &mut rng);
        let order: Vec<_> = piles.hand().iter().map(|c| c.entity).collect();

        let removed = piles.remove_from_hand(order[1]).unwrap();
        assert_eq!(removed.entity, order[1]);
        assert_eq!(
            piles.hand().iter().map(|c| c.entity).collect::<Vec<_>>(),
            vec![order[0], order[2]]
        );
        assert!(piles.remove_from_hand(order[1]).is_none());
    }

    #[test]
    fn test_add_card_to_full_hand_lands_in_discard() {
        let (mut piles, mut rng) = piles(1, 1);
        piles.draw(&mut rng);

        let (_, landed) = piles.add_card(CardId::new(9), Pile::Hand);
        assert_eq!(landed, Pile::Discard);
        assert_eq!(piles.discard().len(), 1);
        assert_eq!(piles.total(), 2);
    }
}
