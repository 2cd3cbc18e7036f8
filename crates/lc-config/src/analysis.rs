//! Analysis configuration types.
//!
//! These types mirror `config.toml`. Every section and field is optional;
//! missing values fall back to the defaults tuned against real hunting logs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Complete analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub accumulator: AccumulatorSettings,

    #[serde(default)]
    pub segmenter: SegmenterSettings,

    #[serde(default)]
    pub bands: BandSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            schema_version: default_schema_version(),
            accumulator: AccumulatorSettings::default(),
            segmenter: SegmenterSettings::default(),
            bands: BandSettings::default(),
        }
    }
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

/// Which scrap sample in a kill cycle carries the bonus payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusPolicy {
    /// With exactly two scrap samples, the second one is the bonus.
    #[default]
    SecondSample,
    /// Never attribute a bonus.
    None,
}

impl std::fmt::Display for BonusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BonusPolicy::SecondSample => write!(f, "second_sample"),
            BonusPolicy::None => write!(f, "none"),
        }
    }
}

/// Kill cycle accumulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorSettings {
    /// Item name of the fungible scrap drop.
    #[serde(default = "default_scrap_item")]
    pub scrap_item: String,

    /// Scrap units per PED. Scrap value is derived from the count to avoid
    /// the rounding in the logged value.
    #[serde(default = "default_scrap_units_per_ped")]
    pub scrap_units_per_ped: f64,

    /// Items never counted as loot (e.g. ammo restock currency).
    #[serde(default = "default_ignore_items")]
    pub ignore_items: BTreeSet<String>,

    /// Charge the per-shot cost for shots that did not land.
    #[serde(default = "default_true")]
    pub charge_misses: bool,

    /// Rescale loot to the 100/100 efficiency/looter reference.
    #[serde(default)]
    pub normalize: bool,

    /// Cycles whose return ratio reaches this value are discarded.
    #[serde(default = "default_spurious_ratio")]
    pub spurious_ratio: f64,

    /// Cycles with more scrap samples than this are discarded.
    #[serde(default = "default_max_scrap_samples")]
    pub max_scrap_samples: usize,

    #[serde(default)]
    pub bonus_policy: BonusPolicy,
}

fn default_scrap_item() -> String {
    "Shrapnel".to_string()
}

fn default_scrap_units_per_ped() -> f64 {
    10_000.0
}

fn default_ignore_items() -> BTreeSet<String> {
    BTreeSet::from(["Universal Ammo".to_string()])
}

fn default_true() -> bool {
    true
}

fn default_spurious_ratio() -> f64 {
    100_000.0
}

fn default_max_scrap_samples() -> usize {
    2
}

impl Default for AccumulatorSettings {
    fn default() -> Self {
        AccumulatorSettings {
            scrap_item: default_scrap_item(),
            scrap_units_per_ped: default_scrap_units_per_ped(),
            ignore_items: default_ignore_items(),
            charge_misses: true,
            normalize: false,
            spurious_ratio: default_spurious_ratio(),
            max_scrap_samples: default_max_scrap_samples(),
            bonus_policy: BonusPolicy::default(),
        }
    }
}

/// Initial guess for where one multiplier tier sits in the sorted population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierGuess {
    /// Guessed tier location as a fraction of the population.
    pub center: f64,
    /// Width of the threshold window as a fraction of the population.
    pub window: f64,
}

impl TierGuess {
    pub const fn new(center: f64, window: f64) -> Self {
        TierGuess { center, window }
    }
}

/// Tuned tier guesses. Later tiers are rarer, so their windows shrink.
pub const DEFAULT_TIERS: [TierGuess; 6] = [
    TierGuess::new(0.05, 0.05),
    TierGuess::new(0.15, 0.015),
    TierGuess::new(0.325, 0.05),
    TierGuess::new(0.625, 0.03),
    TierGuess::new(0.86, 0.01),
    TierGuess::new(0.94, 0.005),
];

/// Distribution segmentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmenterSettings {
    /// A gap must exceed `gap_factor` times the local max difference.
    #[serde(default = "default_gap_factor")]
    pub gap_factor: f64,

    /// Absolute lower bound on the gap threshold.
    #[serde(default)]
    pub min_gap: f64,

    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierGuess>,
}

fn default_gap_factor() -> f64 {
    4.0
}

fn default_tiers() -> Vec<TierGuess> {
    DEFAULT_TIERS.to_vec()
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        SegmenterSettings {
            gap_factor: default_gap_factor(),
            min_gap: 0.0,
            tiers: default_tiers(),
        }
    }
}

/// Fixed multiplier bands used by the summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSettings {
    /// Upper edges of every band except the last (open-ended) one.
    #[serde(default = "default_band_edges")]
    pub edges: Vec<f64>,
}

fn default_band_edges() -> Vec<f64> {
    vec![0.6, 2.0, 5.0]
}

impl Default for BandSettings {
    fn default() -> Self {
        BandSettings {
            edges: default_band_edges(),
        }
    }
}
