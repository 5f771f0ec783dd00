//! Session configuration.
//!
//! The bootstrap builds a `SessionConfig` once at startup (from code or any
//! serde format) and hands the relevant slices to each component:
//! - `CombatConfig`: health pools, energy, hand size, damage modifiers
//! - `DraftConfig`: pack size, category weights, stat upgrade amounts
//!
//! Nothing in the core reads configuration from globals.

use serde::{Deserialize, Serialize};

/// Session phase, surfaced to the UI through `on_phase_changed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Players are picking from draft packs.
    #[default]
    Draft,
    /// Players are fighting their paired opponent pets.
    Combat,
    /// Combat finished; waiting for every peer to report.
    RoundEnd,
}

/// Combat tuning values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Starting (base) max health of a player.
    pub player_max_health: i32,

    /// Starting (base) max health of a pet.
    pub pet_max_health: i32,

    /// Energy refilled at the start of every turn.
    pub energy_per_turn: i32,

    /// Cards drawn at the start of every turn.
    pub hand_draw: u32,

    /// Hand capacity. Draws past this go straight to discard.
    pub max_hand_size: usize,

    /// Base critical hit chance in percent.
    pub base_crit_percent: i32,

    /// Damage multiplier applied on a critical hit.
    pub crit_multiplier: i32,

    /// Outgoing damage reduction while weak, in percent (floored).
    pub weak_percent: i32,

    /// Incoming damage increase while broken, in percent (floored).
    pub break_percent: i32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_max_health: 50,
            pet_max_health: 40,
            energy_per_turn: 3,
            hand_draw: 5,
            max_hand_size: 10,
            base_crit_percent: 5,
            crit_multiplier: 2,
            weak_percent: 25,
            break_percent: 25,
        }
    }
}

impl CombatConfig {
    /// Set the starting health pools.
    #[must_use]
    pub fn with_health(mut self, player: i32, pet: i32) -> Self {
        self.player_max_health = player;
        self.pet_max_health = pet;
        self
    }

    /// Set the per-turn energy.
    #[must_use]
    pub fn with_energy(mut self, energy: i32) -> Self {
        self.energy_per_turn = energy;
        self
    }

    /// Set the per-turn draw and hand capacity.
    #[must_use]
    pub fn with_hand(mut self, draw: u32, max_hand_size: usize) -> Self {
        self.hand_draw = draw;
        self.max_hand_size = max_hand_size;
        self
    }

    /// Set the base crit chance.
    #[must_use]
    pub fn with_base_crit(mut self, percent: i32) -> Self {
        self.base_crit_percent = percent;
        self
    }
}

/// Draft tuning values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Options generated per pack.
    pub options_per_pack: usize,

    /// Relative weight of "add a card to your deck" options.
    pub add_card_weight: f32,

    /// Relative weight of "upgrade a stat" options.
    pub upgrade_stat_weight: f32,

    /// Relative weight of "upgrade a card in your deck" options.
    pub upgrade_card_weight: f32,

    /// Pet max health gained from a pet health upgrade.
    pub pet_health_step: i32,

    /// Player max health gained from a player health upgrade.
    pub player_health_step: i32,

    /// Crit percent gained from a crit upgrade.
    pub crit_step: i32,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            options_per_pack: 3,
            add_card_weight: 0.5,
            upgrade_stat_weight: 0.25,
            upgrade_card_weight: 0.25,
            pet_health_step: 5,
            player_health_step: 5,
            crit_step: 5,
        }
    }
}

impl DraftConfig {
    /// Set the number of options per pack.
    #[must_use]
    pub fn with_options_per_pack(mut self, count: usize) -> Self {
        self.options_per_pack = count;
        self
    }

    /// Set the category weights (add card, upgrade stat, upgrade card).
    #[must_use]
    pub fn with_weights(mut self, add_card: f32, upgrade_stat: f32, upgrade_card: f32) -> Self {
        self.add_card_weight = add_card;
        self.upgrade_stat_weight = upgrade_stat;
        self.upgrade_card_weight = upgrade_card;
        self
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of seats (1-255).
    pub player_count: usize,

    /// Combat tuning.
    #[serde(default)]
    pub combat: CombatConfig,

    /// Draft tuning.
    #[serde(default)]
    pub draft: DraftConfig,
}

impl SessionConfig {
    /// Create a configuration with default tuning.
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            combat: CombatConfig::default(),
            draft: DraftConfig::default(),
        }
    }

    /// Replace the combat tuning.
    #[must_use]
    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    /// Replace the draft tuning.
    #[must_use]
    pub fn with_draft(mut self, draft: DraftConfig) -> Self {
        self.draft = draft;
        self
    }
}
