//! lootcycle configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for `config.toml` (accumulator, segmenter, bands)
//! - Sidecar run metadata (`<log>.yaml`) and per-file cost resolution
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod analysis;
pub mod load;
pub mod resolve;
pub mod sidecar;
pub mod validate;

pub use analysis::{
    AccumulatorSettings, AnalysisConfig, BandSettings, BonusPolicy, SegmenterSettings, TierGuess,
};
pub use load::{load_config, ConfigError, ConfigOptions, ResolvedConfig};
pub use resolve::{resolve_config_path, ConfigSource};
pub use sidecar::{resolve_run_params, CostSource, RunMetadata, RunParams};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
