//! Card definitions - immutable catalog entries.
//!
//! A `CardDefinition` lists everything a card can do. The resolver walks
//! these fields in a fixed order, so a definition is data only: no
//! callbacks, no per-card code. Upgraded cards are separate definitions
//! linked through `upgraded`.

use serde::{Deserialize, Serialize};

use crate::combat::{StatusKind, TimedEffect};
use crate::effects::{ComboEffect, DiscardEffect, TargetSelector};

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card rarity, ordered from most to least common.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub const MIN: Rarity = Rarity::Common;
    pub const MAX: Rarity = Rarity::Legendary;

    #[must_use]
    pub const fn rank(self) -> i32 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Legendary => 3,
        }
    }

    /// Rarity for a rank, clamped into `MIN..=MAX`.
    #[must_use]
    pub const fn from_rank(rank: i32) -> Self {
        match rank {
            i32::MIN..=0 => Rarity::Common,
            1 => Rarity::Uncommon,
            2 => Rarity::Rare,
            _ => Rarity::Legendary,
        }
    }

    /// Move `delta` steps up (or down) the rarity ladder, clamped.
    #[must_use]
    pub const fn shifted(self, delta: i32) -> Self {
        Self::from_rank(self.rank().saturating_add(delta))
    }
}

/// A flag status applied by a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGrant {
    pub kind: StatusKind,
    /// Turns for weak/break, amount for strength.
    pub value: i32,
}

/// Which cards a cost modifier touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostScope {
    /// The next card played this turn.
    NextCard,
    /// One random card currently in hand.
    RandomCardInHand,
    /// Every card currently in hand.
    AllCardsInHand,
}

/// Cost reduction granted by a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostModifier {
    /// Energy removed from the cost. Costs never drop below zero.
    pub reduction: i32,
    pub scope: CostScope,
}

/// Bonus damage that grows with hits of the same identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingSpec {
    pub id: String,
    pub per_hit: i32,
}

/// Payoff fired once enough combo starters were played this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboSpec {
    pub threshold: u32,
    pub effect: ComboEffect,
    pub target: TargetSelector,
}

/// How transform picks cards from hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionRule {
    Cheapest,
    MostExpensive,
    Random,
}

/// Replace cards in hand with cards of a shifted rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSpec {
    pub count: usize,
    pub rarity_delta: i32,
    pub rule: SelectionRule,
}

/// Where a copied card lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyDestination {
    Hand,
    Discard,
}

/// Static card definition.
///
/// ```
/// use pet_duel::cards::{CardDefinition, CardId};
///
/// let strike = CardDefinition::new(CardId::new(1), "Strike")
///     .with_cost(1)
///     .with_damage(6);
///
/// assert_eq!(strike.damage, 6);
/// assert!(strike.is_attack());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub rarity: Rarity,
    pub cost: i32,

    // === Targeted effects, in resolution order ===
    pub damage: i32,
    pub block: i32,
    pub heal: i32,
    pub max_health_delta: i32,
    pub status: Option<StatusGrant>,
    pub damage_over_time: Option<TimedEffect>,
    pub heal_over_time: Option<TimedEffect>,
    pub thorns: i32,

    // === Target-independent effects, in resolution order ===
    pub energy_gain: i32,
    pub draw: u32,
    pub discard_random: u32,
    pub combo_starter: bool,
    pub combo: Option<ComboSpec>,
    pub cost_modifier: Option<CostModifier>,
    pub crit_buff: Option<TimedEffect>,
    pub temporary_upgrade: bool,
    pub transform: Option<TransformSpec>,
    pub copy: Option<CopyDestination>,

    pub scaling: Option<ScalingSpec>,
    pub on_discard: Option<DiscardEffect>,

    /// Upgraded version of this card, if any.
    pub upgraded: Option<CardId>,
    /// Set on the upgraded definitions themselves.
    pub is_upgrade: bool,
}

impl Default for CardDefinition {
    fn default() -> Self {
        Self::new(CardId::default(), "")
    }
}

impl CardDefinition {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rarity: Rarity::Common,
            cost: 0,
            damage: 0,
            block: 0,
            heal: 0,
            max_health_delta: 0,
            status: None,
            damage_over_time: None,
            heal_over_time: None,
            thorns: 0,
            energy_gain: 0,
            draw: 0,
            discard_random: 0,
            combo_starter: false,
            combo: None,
            cost_modifier: None,
            crit_buff: None,
            temporary_upgrade: false,
            transform: None,
            copy: None,
            scaling: None,
            on_discard: None,
            upgraded: None,
            is_upgrade: false,
        }
    }

    /// Whether playing this card hits the enemy pet.
    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.damage > 0 || self.scaling.is_some()
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: i32) -> Self {
        self.block = block;
        self
    }

    #[must_use]
    pub fn with_heal(mut self, heal: i32) -> Self {
        self.heal = heal;
        self
    }

    #[must_use]
    pub fn with_max_health_delta(mut self, delta: i32) -> Self {
        self.max_health_delta = delta;
        self
    }

    #[must_use]
    pub fn with_status(mut self, kind: StatusKind, value: i32) -> Self {
        self.status = Some(StatusGrant { kind, value });
        self
    }

    #[must_use]
    pub fn with_damage_over_time(mut self, amount: i32, turns: u32) -> Self {
        self.damage_over_time = Some(TimedEffect::new(amount, turns));
        self
    }

    #[must_use]
    pub fn with_heal_over_time(mut self, amount: i32, turns: u32) -> Self {
        self.heal_over_time = Some(TimedEffect::new(amount, turns));
        self
    }

    #[must_use]
    pub fn with_thorns(mut self, thorns: i32) -> Self {
        self.thorns = thorns;
        self
    }

    #[must_use]
    pub fn with_energy_gain(mut self, energy: i32) -> Self {
        self.energy_gain = energy;
        self
    }

    #[must_use]
    pub fn with_draw(mut self, count: u32) -> Self {
        self.draw = count;
        self
    }

    #[must_use]
    pub fn with_discard_random(mut self, count: u32) -> Self {
        self.discard_random = count;
        self
    }

    #[must_use]
    pub fn combo_starter(mut self) -> Self {
        self.combo_starter = true;
        self
    }

    #[must_use]
    pub fn with_combo(
        mut self,
        threshold: u32,
        effect: ComboEffect,
        target: TargetSelector,
    ) -> Self {
        self.combo = Some(ComboSpec { threshold, effect, target });
        self
    }

    #[must_use]
    pub fn with_cost_modifier(mut self, reduction: i32, scope: CostScope) -> Self {
        self.cost_modifier = Some(CostModifier { reduction, scope });
        self
    }

    #[must_use]
    pub fn with_crit_buff(mut self, amount: i32, turns: u32) -> Self {
        self.crit_buff = Some(TimedEffect::new(amount, turns));
        self
    }

    #[must_use]
    pub fn with_temporary_upgrade(mut self) -> Self {
        self.temporary_upgrade = true;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, count: usize, rarity_delta: i32, rule: SelectionRule) -> Self {
        self.transform = Some(TransformSpec { count, rarity_delta, rule });
        self
    }

    #[must_use]
    pub fn with_copy(mut self, destination: CopyDestination) -> Self {
        self.copy = Some(destination);
        self
    }

    #[must_use]
    pub fn with_scaling(mut self, id: impl Into<String>, per_hit: i32) -> Self {
        self.scaling = Some(ScalingSpec { id: id.into(), per_hit });
        self
    }

    #[must_use]
    pub fn with_on_discard(mut self, effect: DiscardEffect) -> Self {
        self.on_discard = Some(effect);
        self
    }

    #[must_use]
    pub fn with_upgrade(mut self, upgraded: CardId) -> Self {
        self.upgraded = Some(upgraded);
        self
    }

    #[must_use]
    pub fn as_upgrade(mut self) -> Self {
        self.is_upgrade = true;
        self
    }
}
