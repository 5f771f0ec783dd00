//! Draft pack generation.
//!
//! Each option draws a category by weight. If that category has nothing
//! left to offer, the next category in `CATEGORIES` is tried, wrapping
//! around, and a pet health upgrade closes the chain so every slot is
//! always filled.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::pack::{DraftOption, DraftPack, DraftPayload, StatUpgrade};
use crate::cards::{CardId, CardRegistry};
use crate::core::{DraftConfig, GameRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Category {
    AddCard,
    UpgradeStat,
    UpgradeCard,
}

const CATEGORIES: [Category; 3] = [Category::AddCard, Category::UpgradeStat, Category::UpgradeCard];

/// Builds draft packs from the card catalog.
pub struct PackGenerator<'a> {
    registry: &'a CardRegistry,
    config: &'a DraftConfig,
}

impl<'a> PackGenerator<'a> {
    #[must_use]
    pub fn new(registry: &'a CardRegistry, config: &'a DraftConfig) -> Self {
        Self { registry, config }
    }

    /// Build one shuffled pack of `options_per_pack` options.
    pub fn generate(&self, pack_id: u64, rng: &mut GameRng) -> DraftPack {
        let weights = [
            self.config.add_card_weight,
            self.config.upgrade_stat_weight,
            self.config.upgrade_card_weight,
        ];
        let mut offered = FxHashSet::default();
        let mut options = Vec::with_capacity(self.config.options_per_pack);

        for slot in 0..self.config.options_per_pack {
            let start = rng.choose_weighted(&weights).unwrap_or(1);
            let payload = (0..CATEGORIES.len())
                .map(|step| CATEGORIES[(start + step) % CATEGORIES.len()])
                .find_map(|category| self.candidate(category, &offered, rng))
                .unwrap_or(DraftPayload::UpgradeStat(StatUpgrade::PetMaxHealth(
                    self.config.pet_health_step,
                )));

            offered.insert(payload);
            options.push(DraftOption::new(slot as u32, self.describe(payload), payload));
        }

        rng.shuffle(&mut options);
        debug!(pack_id, options = options.len(), "generated draft pack");
        DraftPack::new(pack_id, options)
    }

    fn candidate(
        &self,
        category: Category,
        offered: &FxHashSet<DraftPayload>,
        rng: &mut GameRng,
    ) -> Option<DraftPayload> {
        let candidates: Vec<DraftPayload> = match category {
            Category::AddCard => self
                .registry
                .draftable_ids()
                .into_iter()
                .map(DraftPayload::AddCard)
                .collect(),
            Category::UpgradeStat => [
                StatUpgrade::PetMaxHealth(self.config.pet_health_step),
                StatUpgrade::PlayerMaxHealth(self.config.player_health_step),
                StatUpgrade::CritChance(self.config.crit_step),
            ]
            .into_iter()
            .map(DraftPayload::UpgradeStat)
            .collect(),
            Category::UpgradeCard => self
                .upgradable_ids()
                .into_iter()
                .map(DraftPayload::UpgradeCard)
                .collect(),
        };
        let fresh: Vec<DraftPayload> = candidates
            .into_iter()
            .filter(|payload| !offered.contains(payload))
            .collect();
        rng.choose(&fresh).copied()
    }

    fn upgradable_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .registry
            .iter()
            .filter(|c| !c.is_upgrade && c.upgraded.is_some_and(|up| self.registry.contains(up)))
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn describe(&self, payload: DraftPayload) -> String {
        let name = |id: CardId| {
            self.registry
                .get(id)
                .map_or_else(|| id.to_string(), |c| c.name.clone())
        };
        match payload {
            DraftPayload::AddCard(id) => format!("Add {} to your deck", name(id)),
            DraftPayload::UpgradeCard(id) => format!("Upgrade {}", name(id)),
            DraftPayload::UpgradeStat(StatUpgrade::PetMaxHealth(n)) => {
                format!("+{n} pet max health")
            }
            DraftPayload::UpgradeStat(StatUpgrade::PlayerMaxHealth(n)) => {
                format!("+{n} max health")
            }
            DraftPayload::UpgradeStat(StatUpgrade::CritChance(n)) => format!("+{n}% crit chance"),
        }
    }
}
