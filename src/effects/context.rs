//! Mutable combat state the resolver works on.
//!
//! `CombatState` is everything one peer mutates while a combat runs. The
//! resolver borrows it for a single action and records what changed in
//! `changes`, which the session drains to notify the UI.

use smallvec::SmallVec;

use crate::cards::CardId;
use crate::combat::{CombatantRole, Combatants, ScalingAttackCounter};
use crate::core::GameRng;
use crate::zones::CardPiles;

/// Per-turn counters, reset by `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnState {
    pub energy: i32,
    /// Combo starters played this turn.
    pub combo_count: u32,
    /// Reduction waiting for the next card played.
    pub next_card_discount: i32,
}

impl TurnState {
    #[must_use]
    pub fn start(energy: i32) -> Self {
        Self {
            energy,
            ..Self::default()
        }
    }
}

/// Independent random streams, so a crit roll never shifts a shuffle.
#[derive(Clone, Debug)]
pub struct CombatRngs {
    pub crit: GameRng,
    pub piles: GameRng,
    pub effects: GameRng,
}

impl CombatRngs {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let root = GameRng::new(seed);
        Self {
            crit: root.for_context("crit"),
            piles: root.for_context("piles"),
            effects: root.for_context("effects"),
        }
    }
}

/// What an action touched, for UI refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    roles: SmallVec<[CombatantRole; 4]>,
    pub hand: bool,
    pub energy: bool,
}

impl ChangeSet {
    pub fn mark(&mut self, role: CombatantRole) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    #[must_use]
    pub fn roles(&self) -> &[CombatantRole] {
        &self.roles
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && !self.hand && !self.energy
    }
}

#[derive(Clone, Debug)]
pub struct CombatState {
    pub combatants: Combatants,
    pub piles: CardPiles,
    pub turn: TurnState,
    pub scaling: ScalingAttackCounter,
    /// Last card the opponent's pet played this combat.
    pub last_opponent_pet_card: Option<CardId>,
    pub rngs: CombatRngs,
    pub changes: ChangeSet,
}

impl CombatState {
    #[must_use]
    pub fn new(combatants: Combatants, piles: CardPiles, rngs: CombatRngs) -> Self {
        Self {
            combatants,
            piles,
            turn: TurnState::default(),
            scaling: ScalingAttackCounter::new(),
            last_opponent_pet_card: None,
            rngs,
            changes: ChangeSet::default(),
        }
    }

    /// Take the accumulated change set, leaving an empty one.
    pub fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.changes)
    }
}
