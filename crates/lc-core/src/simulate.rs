//! Synthetic loot generator.
//!
//! Draws kills from a tiered multiplier table so the summary and the
//! segmenter can be checked against a known distribution.

use crate::cycle::{CostParams, EfficiencyNormalizer, KillCycle};
use crate::dataset::Dataset;
use crate::logging::{event_names, Stage};
use chrono::{DateTime, TimeDelta, Utc};
use lc_common::{Error, Result};
use lc_math::{approx_eq, stable_sum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tier probabilities; must sum to 1.
pub const DEFAULT_PROBABILITIES: [f64; 16] = [
    0.100, 0.100, 0.250, 0.350, 0.120, 0.040, 0.020, 0.01, 0.0025, 0.0035, 0.002, 0.0018733,
    0.00006, 0.00004, 0.00002, 0.0000067,
];

/// Tier centers as multiples of the kill cost.
pub const DEFAULT_MULTIPLIERS: [f64; 16] = [
    0.282, 0.376, 0.469, 0.525, 0.941, 1.883, 3.765, 7.53, 11.275, 15.045, 18.87, 33.5, 150.0,
    250.0, 700.0, 1500.0,
];

/// Half-width of the uniform draw around each center.
pub const DEFAULT_SPREADS: [f64; 16] = [
    0.028, 0.038, 0.046, 0.099, 0.094, 0.188, 0.375, 0.75, 1.025, 1.495, 2.33, 10.0, 50.0, 100.0,
    200.0, 500.0,
];

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Seconds between synthetic kills.
const KILL_INTERVAL_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub kills: usize,
    pub seed: u64,
    pub efficiency: f64,
    pub looter: f64,
    /// Mean cost of one kill in PED.
    pub cost_per_kill: f64,
    /// Relative half-width of the per-kill cost draw.
    pub cost_jitter: f64,
    pub probabilities: Vec<f64>,
    pub multipliers: Vec<f64>,
    pub spreads: Vec<f64>,
    /// Chance of an extra scrap payout on a kill.
    pub bonus_probability: f64,
    pub bonus_multiplier: f64,
    pub bonus_spread: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            kills: 10_000,
            seed: 0,
            efficiency: 100.0,
            looter: 100.0,
            cost_per_kill: 1.0,
            cost_jitter: 0.10,
            probabilities: DEFAULT_PROBABILITIES.to_vec(),
            multipliers: DEFAULT_MULTIPLIERS.to_vec(),
            spreads: DEFAULT_SPREADS.to_vec(),
            bonus_probability: 0.1,
            bonus_multiplier: 0.6,
            bonus_spread: 0.05,
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Simulation(message.into())
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.kills == 0 {
            return Err(invalid("kills must be at least 1"));
        }
        let tiers = self.probabilities.len();
        if tiers == 0 {
            return Err(invalid("the tier table is empty"));
        }
        if self.multipliers.len() != tiers || self.spreads.len() != tiers {
            return Err(invalid(format!(
                "tier tables differ in length: {} probabilities, {} multipliers, {} spreads",
                tiers,
                self.multipliers.len(),
                self.spreads.len()
            )));
        }
        if self
            .probabilities
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0)
        {
            return Err(invalid("probabilities must be finite and non-negative"));
        }
        let total = stable_sum(self.probabilities.iter().copied());
        if !approx_eq(total, 1.0, PROBABILITY_TOLERANCE) {
            return Err(invalid(format!("probabilities sum to {total}, not 1")));
        }
        for (m, s) in self.multipliers.iter().zip(&self.spreads) {
            if !m.is_finite() || !s.is_finite() || *s < 0.0 || m - s < 0.0 {
                return Err(invalid(format!(
                    "tier {m} ± {s} must be finite and non-negative"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.bonus_probability) {
            return Err(invalid("bonus probability must be within [0, 1]"));
        }
        if self.bonus_spread < 0.0 || self.bonus_multiplier - self.bonus_spread < 0.0 {
            return Err(invalid("bonus payout must be non-negative"));
        }
        if !(self.cost_per_kill.is_finite() && self.cost_per_kill > 0.0) {
            return Err(invalid("cost per kill must be positive"));
        }
        if !(0.0..1.0).contains(&self.cost_jitter) {
            return Err(invalid("cost jitter must be within [0, 1)"));
        }
        for (field, value) in [("efficiency", self.efficiency), ("looter", self.looter)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::InvalidParameter {
                    field: field.to_string(),
                    message: format!("{value} is outside 0..=100"),
                });
            }
        }
        Ok(())
    }

    fn normalizer(&self) -> EfficiencyNormalizer {
        EfficiencyNormalizer::new(self.efficiency, self.looter)
    }

    /// Analytic return: `(Σ p·m + p_bonus·m_bonus) · factor`.
    pub fn expected_return(&self) -> f64 {
        let base = stable_sum(
            self.probabilities
                .iter()
                .zip(&self.multipliers)
                .map(|(p, m)| p * m),
        );
        self.normalizer()
            .apply(base + self.bonus_probability * self.bonus_multiplier)
    }
}

/// A generated dataset and the return it should converge to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub dataset: Dataset,
    pub expected_return: f64,
}

/// Generate `config.kills` kills. Same config, same output.
pub fn simulate(config: &SimulationConfig) -> Result<Simulation> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let factor = config.normalizer().factor();
    let origin = DateTime::<Utc>::UNIX_EPOCH.naive_utc();

    let mut dataset = Dataset::new(CostParams {
        ped_per_shot: config.cost_per_kill,
        efficiency: config.efficiency,
        looter: config.looter,
    });
    dataset.observe_timestamp(origin);
    dataset.cycles.reserve(config.kills);

    let last_tier = config.probabilities.len() - 1;
    for i in 0..config.kills {
        let cost = config.cost_per_kill
            * uniform(&mut rng, 1.0 - config.cost_jitter, 1.0 + config.cost_jitter);

        let draw: f64 = rng.random();
        let mut cumulative = 0.0_f64;
        let tier = config
            .probabilities
            .iter()
            .position(|p| {
                cumulative += *p;
                draw < cumulative
            })
            .unwrap_or(last_tier);
        let (m, s) = (config.multipliers[tier], config.spreads[tier]);
        let mut loot = cost * uniform(&mut rng, m - s, m + s);

        let mut bonus = 0.0;
        if rng.random::<f64>() < config.bonus_probability {
            bonus = cost
                * uniform(
                    &mut rng,
                    config.bonus_multiplier - config.bonus_spread,
                    config.bonus_multiplier + config.bonus_spread,
                )
                * factor;
        }
        loot = loot * factor + bonus;

        dataset.cycles.push(KillCycle {
            cost,
            loot,
            bonus_shrap: bonus,
            timestamp: origin + TimeDelta::seconds(i as i64 * KILL_INTERVAL_SECS),
            shrap_count: usize::from(bonus > 0.0),
        });
    }
    dataset.shots_fired = config.kills as u64;

    let expected_return = config.expected_return();
    info!(
        event = event_names::SIMULATE_FINISHED,
        stage = %Stage::Analyze,
        kills = config.kills,
        seed = config.seed,
        expected_return,
        "simulation finished"
    );
    Ok(Simulation {
        dataset,
        expected_return,
    })
}

fn uniform(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}
