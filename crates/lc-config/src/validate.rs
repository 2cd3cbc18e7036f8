//! Configuration validation errors and semantic validation.

use crate::analysis::{AnalysisConfig, TierGuess};
use crate::sidecar::RunMetadata;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

/// Validate the analysis configuration semantically.
pub fn validate_analysis(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let acc = &config.accumulator;
    if acc.scrap_item.trim().is_empty() {
        return Err(invalid("accumulator.scrap_item", "Must not be empty"));
    }
    if !(acc.scrap_units_per_ped > 0.0) {
        return Err(invalid(
            "accumulator.scrap_units_per_ped",
            format!("Must be positive, got {}", acc.scrap_units_per_ped),
        ));
    }
    if !(acc.spurious_ratio > 0.0) {
        return Err(invalid(
            "accumulator.spurious_ratio",
            format!("Must be positive, got {}", acc.spurious_ratio),
        ));
    }
    if acc.ignore_items.contains(&acc.scrap_item) {
        return Err(ValidationError::SemanticError(format!(
            "scrap item '{}' is also on the ignore list",
            acc.scrap_item
        )));
    }

    let seg = &config.segmenter;
    if !(seg.gap_factor > 0.0) {
        return Err(invalid(
            "segmenter.gap_factor",
            format!("Must be positive, got {}", seg.gap_factor),
        ));
    }
    if !(seg.min_gap >= 0.0) {
        return Err(invalid(
            "segmenter.min_gap",
            format!("Must be non-negative, got {}", seg.min_gap),
        ));
    }
    for (i, tier) in seg.tiers.iter().enumerate() {
        validate_tier(i, tier)?;
    }

    let edges = &config.bands.edges;
    if let Some(first) = edges.first() {
        if !(*first > 0.0) {
            return Err(invalid("bands.edges", format!("Must be positive, got {}", first)));
        }
    }
    if edges.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(invalid("bands.edges", "Must be strictly increasing"));
    }

    Ok(())
}

fn validate_tier(index: usize, tier: &TierGuess) -> ValidationResult<()> {
    if !(tier.center > 0.0 && tier.center <= 1.0) {
        return Err(invalid(
            format!("segmenter.tiers[{}].center", index),
            format!("Must be in (0, 1], got {}", tier.center),
        ));
    }
    if !(tier.window > 0.0 && tier.window <= 1.0) {
        return Err(invalid(
            format!("segmenter.tiers[{}].window", index),
            format!("Must be in (0, 1], got {}", tier.window),
        ));
    }
    Ok(())
}

/// Validate a sidecar record.
pub fn validate_metadata(meta: &RunMetadata) -> ValidationResult<()> {
    validate_percentage("looter", meta.looter)?;
    validate_percentage("efficiency", meta.efficiency)?;
    if let Some(pec) = meta.pec_per_use {
        if !pec.is_finite() || pec < 0.0 {
            return Err(invalid(
                "pec-per-use",
                format!("Must be finite and >= 0, got {}", pec),
            ));
        }
    }
    Ok(())
}

/// Percentages are on the 0-100 scale.
pub fn validate_percentage(field: &str, value: f64) -> ValidationResult<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(field, format!("Must be in [0, 100], got {}", value)));
    }
    Ok(())
}
