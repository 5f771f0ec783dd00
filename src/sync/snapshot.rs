//! Shared, versioned session state.
//!
//! State that any peer may need later (starting pet health after draft
//! upgrades, scores, draft queues, pairings) lives in one typed
//! `SharedSnapshot`. Writers go through `PropertyStore::compare_and_swap`:
//! a write only lands if nobody else published since it was read.
//!
//! `SnapshotPublisher` keeps local edits staged until a write lands. A
//! rejected write keeps its edits; they are replayed on top of the newer
//! snapshot at the next flush.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{Error, PlayerId, PlayerMap, Result};
use crate::draft::DraftState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSnapshot {
    /// Bumped by every successful write.
    pub version: u64,
    pub base_pet_max_health: PlayerMap<i32>,
    pub combat_finished: PlayerMap<bool>,
    pub scores: PlayerMap<i32>,
    pub draft: DraftState,
    /// Attacker -> owner of the pet they fight.
    pub pairings: BTreeMap<PlayerId, PlayerId>,
}

impl SharedSnapshot {
    #[must_use]
    pub fn new(player_count: usize, pet_max_health: i32) -> Self {
        Self {
            version: 0,
            base_pet_max_health: PlayerMap::with_value(player_count, pet_max_health),
            combat_finished: PlayerMap::with_value(player_count, false),
            scores: PlayerMap::with_value(player_count, 0),
            draft: DraftState::new(player_count),
            pairings: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.scores.player_count()
    }

    /// Owner of the pet `attacker` fights.
    #[must_use]
    pub fn pet_owner_of(&self, attacker: PlayerId) -> Option<PlayerId> {
        self.pairings.get(&attacker).copied()
    }

    /// The peer fighting `owner`'s pet.
    #[must_use]
    pub fn attacker_of(&self, owner: PlayerId) -> Option<PlayerId> {
        self.pairings
            .iter()
            .find(|(_, &pet_owner)| pet_owner == owner)
            .map(|(&attacker, _)| attacker)
    }

    /// Every paired player has finished combat.
    #[must_use]
    pub fn all_combat_finished(&self) -> bool {
        self.pairings
            .keys()
            .all(|&p| self.combat_finished.get(p).copied().unwrap_or(true))
    }

    /// Apply one edit. Edits for unknown seats are ignored.
    pub fn apply(&mut self, edit: &SnapshotEdit) {
        match edit {
            SnapshotEdit::BasePetMaxHealth { player, value } => {
                if let Some(slot) = self.base_pet_max_health.get_mut(*player) {
                    *slot = *value;
                }
            }
            SnapshotEdit::CombatFinished { player, finished } => {
                if let Some(slot) = self.combat_finished.get_mut(*player) {
                    *slot = *finished;
                }
            }
            SnapshotEdit::AddScore { player, delta } => {
                if let Some(slot) = self.scores.get_mut(*player) {
                    *slot += delta;
                }
            }
            SnapshotEdit::Draft(state) => self.draft = state.clone(),
            SnapshotEdit::Pairings(pairings) => {
                self.pairings = pairings.clone();
                for (_, finished) in self.combat_finished.iter_mut() {
                    *finished = false;
                }
            }
        }
    }
}

/// One staged change to the shared snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotEdit {
    BasePetMaxHealth { player: PlayerId, value: i32 },
    CombatFinished { player: PlayerId, finished: bool },
    AddScore { player: PlayerId, delta: i32 },
    /// Replace the draft state (arbiter only).
    Draft(DraftState),
    /// Replace the pairing map and clear every combat-finished flag.
    Pairings(BTreeMap<PlayerId, PlayerId>),
}

/// Eventually consistent key-value storage shared by all peers.
pub trait PropertyStore {
    /// Read the latest published snapshot.
    fn load(&self) -> Result<SharedSnapshot>;

    /// Publish `next` if the stored version still equals `expected`.
    ///
    /// On success the stored version becomes `expected + 1`, whatever
    /// `next.version` held, and the new version is returned.
    fn compare_and_swap(&self, expected: u64, next: SharedSnapshot) -> Result<u64>;
}

/// In-process store. Clones share the same snapshot, so one store can
/// stand in for the network in tests and single-process sessions.
#[derive(Clone, Debug)]
pub struct LocalPropertyStore {
    inner: Arc<RwLock<SharedSnapshot>>,
}

impl LocalPropertyStore {
    #[must_use]
    pub fn new(initial: SharedSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }
}

impl PropertyStore for LocalPropertyStore {
    fn load(&self) -> Result<SharedSnapshot> {
        let snapshot = self
            .inner
            .read()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Ok(snapshot.clone())
    }

    fn compare_and_swap(&self, expected: u64, mut next: SharedSnapshot) -> Result<u64> {
        let mut current = self
            .inner
            .write()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        if current.version != expected {
            return Err(Error::SnapshotConflict {
                expected,
                found: current.version,
            });
        }
        next.version = expected + 1;
        *current = next;
        Ok(current.version)
    }
}

/// Stages local edits and publishes them with an optimistic guard.
#[derive(Clone, Debug, Default)]
pub struct SnapshotPublisher {
    pending: Vec<SnapshotEdit>,
}

impl SnapshotPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, edit: SnapshotEdit) {
        self.pending.push(edit);
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Publish staged edits on top of the latest snapshot.
    ///
    /// Returns the published snapshot, or `None` if nothing was staged.
    /// On `SnapshotConflict` the edits stay staged for the next flush.
    pub fn flush(&mut self, store: &impl PropertyStore) -> Result<Option<SharedSnapshot>> {
        if self.pending.is_empty() {
            return Ok(None);
        }

        let current = store.load()?;
        let mut next = current.clone();
        for edit in &self.pending {
            next.apply(edit);
        }

        match store.compare_and_swap(current.version, next.clone()) {
            Ok(version) => {
                next.version = version;
                info!(version, edits = self.pending.len(), "published shared snapshot");
                self.pending.clear();
                Ok(Some(next))
            }
            Err(err @ Error::SnapshotConflict { .. }) => {
                debug!(%err, "snapshot write lost a race, keeping edits staged");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
