//! Scaling attack counters.
//!
//! A scaling attack's bonus is `hits_landed_before_this_one * per_hit`.
//! The resolver reads the bonus before damage and records the hit after the
//! whole card has resolved, so the counter only ever reflects finished hits.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Hits landed per scaling identifier during the current combat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingAttackCounter {
    hits: FxHashMap<String, u32>,
}

impl ScalingAttackCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hits already landed for `id`.
    #[must_use]
    pub fn hits(&self, id: &str) -> u32 {
        self.hits.get(id).copied().unwrap_or(0)
    }

    /// Bonus damage for the next hit of `id`.
    #[must_use]
    pub fn bonus(&self, id: &str, per_hit: i32) -> i32 {
        self.hits(id) as i32 * per_hit
    }

    /// Record one resolved hit of `id`.
    pub fn record_hit(&mut self, id: &str) {
        *self.hits.entry(id.to_string()).or_insert(0) += 1;
    }

    /// Forget every counter (combat start).
    pub fn reset(&mut self) {
        self.hits.clear();
    }
}
