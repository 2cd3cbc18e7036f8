//! Kill cycles of one analysis run plus the run's scalar metadata.

use crate::cycle::{CostParams, KillCycle};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Ordered kill cycles with the parameters they were accumulated under.
///
/// Built fresh per run; merging concatenates per-file datasets, keeping
/// intra-file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub cycles: Vec<KillCycle>,
    /// Cost of one shot in PED.
    pub ped_per_shot: f64,
    pub efficiency: f64,
    pub looter_bonus: f64,
    pub shots_fired: u64,
    /// Earliest event timestamp seen, the origin for elapsed times.
    pub first_timestamp: Option<NaiveDateTime>,
}

/// One exported row. `multiplier == loot / cost` as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub timestamp: NaiveDateTime,
    pub elapsed_secs: i64,
    pub cost: f64,
    pub loot: f64,
    pub multiplier: f64,
    pub bonus_shrap: f64,
    pub shrap_count: usize,
}

impl Dataset {
    pub fn new(cost: CostParams) -> Self {
        Dataset {
            cycles: Vec::new(),
            ped_per_shot: cost.ped_per_shot,
            efficiency: cost.efficiency,
            looter_bonus: cost.looter,
            shots_fired: 0,
            first_timestamp: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Track the earliest timestamp seen.
    pub fn observe_timestamp(&mut self, ts: NaiveDateTime) {
        self.first_timestamp = Some(match self.first_timestamp {
            Some(first) => first.min(ts),
            None => ts,
        });
    }

    /// Append `other`'s cycles after ours and sum the shot counters.
    ///
    /// Scalar parameters are kept from `self` unless it has seen nothing
    /// yet, in which case they are taken from `other`.
    pub fn merge(&mut self, other: Dataset) {
        if self.cycles.is_empty() && self.shots_fired == 0 {
            self.ped_per_shot = other.ped_per_shot;
            self.efficiency = other.efficiency;
            self.looter_bonus = other.looter_bonus;
        }
        if let Some(ts) = other.first_timestamp {
            self.observe_timestamp(ts);
        }
        self.shots_fired += other.shots_fired;
        self.cycles.extend(other.cycles);
    }

    /// Per-cycle return multipliers in cycle order.
    pub fn multipliers(&self) -> Vec<f64> {
        self.cycles.iter().map(KillCycle::multiplier).collect()
    }

    /// Tabular export of every cycle.
    pub fn rows(&self) -> Vec<ExportRow> {
        self.cycles
            .iter()
            .map(|c| ExportRow {
                timestamp: c.timestamp,
                elapsed_secs: self
                    .first_timestamp
                    .map(|first| (c.timestamp - first).num_seconds())
                    .unwrap_or(0),
                cost: c.cost,
                loot: c.loot,
                multiplier: c.multiplier(),
                bonus_shrap: c.bonus_shrap,
                shrap_count: c.shrap_count,
            })
            .collect()
    }
}
