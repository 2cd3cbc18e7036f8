//! Aggregate return statistics over a dataset.

use crate::dataset::Dataset;
use lc_common::{Error, Result};
use lc_config::BandSettings;
use lc_math::{guarded_ratio, stable_sum, RATIO_FLOOR};
use serde::{Deserialize, Serialize};

/// Returns of the cycles whose multiplier falls in `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnBand {
    pub lower: f64,
    /// `None` for the open-ended top band.
    pub upper: Option<f64>,
    pub count: usize,
    pub cost: f64,
    pub loot: f64,
    /// `loot / cost` within the band (0 for an empty band).
    pub return_ratio: f64,
    /// This band's share of all loot (0 when net loot is not positive).
    pub share_of_loot: f64,
}

impl ReturnBand {
    pub fn label(&self) -> String {
        match self.upper {
            Some(upper) => format!("{} - {}", self.lower, upper),
            None => format!("{} - inf", self.lower),
        }
    }
}

/// Headline numbers for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub kills: usize,
    pub shots_fired: u64,
    pub total_cost: f64,
    pub total_loot: f64,
    /// `total_loot / total_cost`.
    pub total_return: f64,
    pub bonus_shrap_total: f64,
    pub bonus_shrap_share: f64,
    pub cycles_with_bonus: usize,
    pub avg_cost_per_kill: f64,
    pub bands: Vec<ReturnBand>,
}

impl Summary {
    /// Total return as a percentage.
    pub fn total_return_percent(&self) -> f64 {
        self.total_return * 100.0
    }
}

/// Summarize `dataset` using the band edges in `bands`.
pub fn summarize(dataset: &Dataset, bands: &BandSettings) -> Result<Summary> {
    if dataset.cycles.is_empty() {
        return Err(Error::DegenerateDataset(
            "no kill cycles were reconstructed".to_string(),
        ));
    }

    let total_cost = stable_sum(dataset.cycles.iter().map(|c| c.cost));
    if total_cost <= RATIO_FLOOR {
        return Err(Error::DegenerateDataset(format!(
            "total cost {total_cost:e} is not positive"
        )));
    }
    let total_loot = stable_sum(dataset.cycles.iter().map(|c| c.loot));
    let bonus_shrap_total = stable_sum(dataset.cycles.iter().map(|c| c.bonus_shrap));

    let mut lowers = vec![0.0];
    lowers.extend(bands.edges.iter().copied());
    let mut out: Vec<ReturnBand> = lowers
        .iter()
        .enumerate()
        .map(|(i, lower)| ReturnBand {
            lower: *lower,
            upper: bands.edges.get(i).copied(),
            count: 0,
            cost: 0.0,
            loot: 0.0,
            return_ratio: 0.0,
            share_of_loot: 0.0,
        })
        .collect();

    for cycle in &dataset.cycles {
        let multiplier = cycle.multiplier();
        let idx = bands
            .edges
            .iter()
            .position(|edge| multiplier < *edge)
            .unwrap_or(bands.edges.len());
        let band = &mut out[idx];
        band.count += 1;
        band.cost += cycle.cost;
        band.loot += cycle.loot;
    }
    for band in &mut out {
        band.return_ratio = if band.count == 0 {
            0.0
        } else {
            guarded_ratio(band.loot, band.cost)
        };
        band.share_of_loot = loot_share(band.loot, total_loot);
    }

    let kills = dataset.cycles.len();
    Ok(Summary {
        kills,
        shots_fired: dataset.shots_fired,
        total_cost,
        total_loot,
        total_return: total_loot / total_cost,
        bonus_shrap_total,
        bonus_shrap_share: loot_share(bonus_shrap_total, total_loot),
        cycles_with_bonus: dataset.cycles.iter().filter(|c| c.bonus_shrap > 0.0).count(),
        avg_cost_per_kill: total_cost / kills as f64,
        bands: out,
    })
}

/// Fraction of the total loot; 0 when the net loot is not positive.
fn loot_share(part: f64, total_loot: f64) -> f64 {
    if total_loot > RATIO_FLOOR {
        part / total_loot
    } else {
        0.0
    }
}

impl Dataset {
    /// See [`summarize`].
    pub fn summary(&self, bands: &BandSettings) -> Result<Summary> {
        summarize(self, bands)
    }
}
