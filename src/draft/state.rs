//! Canonical draft state: per-player pack queues, pick tally, seat order.
//!
//! The arbiter owns the authoritative copy and publishes it inside the
//! shared snapshot. Queues are `im::Vector`s so publishing a new snapshot
//! shares structure with the previous one instead of deep-copying packs.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::pack::DraftPack;
use crate::core::{PlayerId, PlayerMap};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    pub queues: PlayerMap<Vector<DraftPack>>,
    pub picks: PlayerMap<u32>,
    /// Seat order packs are passed in.
    pub player_order: Vec<PlayerId>,
    pub next_pack_id: u64,
}

impl DraftState {
    /// Empty state with seats passed in ascending id order.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            queues: PlayerMap::with_default(player_count),
            picks: PlayerMap::with_value(player_count, 0),
            player_order: PlayerId::all(player_count).collect(),
            next_pack_id: 0,
        }
    }

    /// The pack waiting for `player`'s pick, if any.
    #[must_use]
    pub fn head(&self, player: PlayerId) -> Option<&DraftPack> {
        self.queues.get(player).and_then(|q| q.front())
    }

    /// The seat after `player` in pass order, wrapping around.
    #[must_use]
    pub fn next_in_order(&self, player: PlayerId) -> Option<PlayerId> {
        let index = self.player_order.iter().position(|&p| p == player)?;
        self.player_order
            .get((index + 1) % self.player_order.len())
            .copied()
    }

    /// Options still in circulation across every queue.
    #[must_use]
    pub fn total_options(&self) -> usize {
        self.queues
            .values()
            .flat_map(|queue| queue.iter())
            .map(DraftPack::len)
            .sum()
    }

    /// Packs still in circulation.
    #[must_use]
    pub fn total_packs(&self) -> usize {
        self.queues.values().map(Vector::len).sum()
    }

    /// Every queue is empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.queues.values().all(Vector::is_empty)
    }
}
