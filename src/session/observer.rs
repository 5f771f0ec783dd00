//! UI-facing callbacks.
//!
//! The core never renders anything. After every action a session reports
//! what changed through a `SessionObserver`; every method has a no-op
//! default so a front end only implements what it shows.

use crate::cards::CardInstance;
use crate::combat::{CombatantRole, StatusSnapshot};
use crate::core::Phase;
use crate::draft::DraftPack;

pub trait SessionObserver {
    fn on_hand_changed(&mut self, _hand: &[CardInstance]) {}

    fn on_health_or_block_changed(&mut self, _role: CombatantRole, _health: i32, _block: i32) {}

    fn on_status_changed(&mut self, _role: CombatantRole, _status: &StatusSnapshot) {}

    fn on_energy_changed(&mut self, _energy: i32) {}

    fn on_draft_pack_available(&mut self, _pack: &DraftPack) {}

    fn on_phase_changed(&mut self, _phase: Phase) {}
}

/// Ignores every callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// One recorded callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservedEvent {
    Hand(usize),
    HealthOrBlock { role: CombatantRole, health: i32, block: i32 },
    Status(CombatantRole),
    Energy(i32),
    DraftPack(u64),
    Phase(Phase),
}

/// Keeps a log of callbacks, for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObservedEvent>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest health and block reported for `role`.
    #[must_use]
    pub fn last_health_or_block(&self, role: CombatantRole) -> Option<(i32, i32)> {
        self.events.iter().rev().find_map(|event| match *event {
            ObservedEvent::HealthOrBlock { role: r, health, block } if r == role => {
                Some((health, block))
            }
            _ => None,
        })
    }

    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ObservedEvent::Phase(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_hand_changed(&mut self, hand: &[CardInstance]) {
        self.events.push(ObservedEvent::Hand(hand.len()));
    }

    fn on_health_or_block_changed(&mut self, role: CombatantRole, health: i32, block: i32) {
        self.events.push(ObservedEvent::HealthOrBlock { role, health, block });
    }

    fn on_status_changed(&mut self, role: CombatantRole, _status: &StatusSnapshot) {
        self.events.push(ObservedEvent::Status(role));
    }

    fn on_energy_changed(&mut self, energy: i32) {
        self.events.push(ObservedEvent::Energy(energy));
    }

    fn on_draft_pack_available(&mut self, pack: &DraftPack) {
        self.events.push(ObservedEvent::DraftPack(pack.id));
    }

    fn on_phase_changed(&mut self, phase: Phase) {
        self.events.push(ObservedEvent::Phase(phase));
    }
}
