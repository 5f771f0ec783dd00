//! Draft packs and the choices they carry.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// A permanent stat bump offered by the draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatUpgrade {
    PetMaxHealth(i32),
    PlayerMaxHealth(i32),
    /// Base crit percent, in points.
    CritChance(i32),
}

/// What picking an option does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftPayload {
    AddCard(CardId),
    UpgradeStat(StatUpgrade),
    /// Replace one copy of the card in the deck with its upgraded version.
    UpgradeCard(CardId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftOption {
    /// Unique within its pack.
    pub id: u32,
    pub description: String,
    pub payload: DraftPayload,
}

impl DraftOption {
    #[must_use]
    pub fn new(id: u32, description: impl Into<String>, payload: DraftPayload) -> Self {
        Self {
            id,
            description: description.into(),
            payload,
        }
    }
}

/// An ordered set of options passed from player to player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftPack {
    /// Unique within the session.
    pub id: u64,
    pub options: Vector<DraftOption>,
}

impl DraftPack {
    #[must_use]
    pub fn new(id: u64, options: impl IntoIterator<Item = DraftOption>) -> Self {
        Self {
            id,
            options: options.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    #[must_use]
    pub fn option(&self, option_id: u32) -> Option<&DraftOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Remove and return an option by id.
    pub fn take_option(&mut self, option_id: u32) -> Option<DraftOption> {
        let index = self.options.iter().position(|o| o.id == option_id)?;
        Some(self.options.remove(index))
    }
}
