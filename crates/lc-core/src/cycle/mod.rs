//! Kill cycle reconstruction.
//!
//! A kill cycle is the cost of a contiguous run of shots together with the
//! loot received right after it. [`KillCycleAccumulator`] folds the event
//! stream into cycles; [`ShrapnelResolver`] and [`EfficiencyNormalizer`]
//! are applied per event.

mod accumulator;
mod normalize;
mod shrapnel;

pub use accumulator::{
    fold_events, try_fold_events, AccumulatorStats, CostParams, KillCycleAccumulator, Phase,
};
pub use normalize::EfficiencyNormalizer;
pub use shrapnel::{FnResolver, ShrapnelResolver};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One completed engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillCycle {
    /// Attributed cost in PED, never below the ratio floor.
    pub cost: f64,
    /// Loot in PED; enhancer refunds may push it negative.
    pub loot: f64,
    /// Scrap attributed to the bonus payout (already inside `loot`).
    pub bonus_shrap: f64,
    /// Timestamp of the shot that closed the cycle.
    pub timestamp: NaiveDateTime,
    /// Number of scrap samples seen in the cycle.
    pub shrap_count: usize,
}

impl KillCycle {
    /// Return multiplier `loot / cost`.
    pub fn multiplier(&self) -> f64 {
        lc_math::guarded_ratio(self.loot, self.cost)
    }
}
