//! Error types for lootcycle.
//!
//! Every error carries:
//! - A stable numeric code for machine parsing
//! - A category for grouping
//! - A remediation hint for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Missing Shot Cost
//!   Reason: no per-shot cost configured for hunt.log
//!   Fix: Pass '--cost <PEC>' or add 'pec-per-use' to the sidecar YAML next to the log.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 11,
//!   "category": "config",
//!   "message": "no per-shot cost configured for hunt.log",
//!   "context": { "log": "hunt.log" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for lootcycle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping used in the JSON `category` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration, sidecar and cost errors.
    Config,
    /// Input log discovery errors.
    Input,
    /// Dataset statistics and segmentation errors.
    Analysis,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for lootcycle.
#[derive(Error, Debug)]
pub enum Error {
    // config
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no per-shot cost configured for {log}")]
    MissingCost { log: String },

    #[error("invalid value for {field}: {message}")]
    InvalidParameter { field: String, message: String },

    // input
    #[error("input log not found: {path}")]
    InputNotFound { path: String },

    // analysis
    #[error("degenerate dataset: {0}")]
    DegenerateDataset(String),

    #[error("segmentation failed: {0}")]
    Segmentation(String),

    #[error("invalid simulation table: {0}")]
    Simulation(String),

    // io
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code: 1x config, 2x input, 3x analysis, 6x I/O.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::MissingCost { .. } => 11,
            Error::InvalidParameter { .. } => 12,
            Error::InputNotFound { .. } => 20,
            Error::DegenerateDataset(_) => 30,
            Error::Segmentation(_) => 31,
            Error::Simulation(_) => 32,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::MissingCost { .. } | Error::InvalidParameter { .. } => {
                ErrorCategory::Config
            }
            Error::InputNotFound { .. } => ErrorCategory::Input,
            Error::DegenerateDataset(_) | Error::Segmentation(_) | Error::Simulation(_) => {
                ErrorCategory::Analysis
            }
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// One-sentence hint printed after `Fix:`.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'lootcycle check' to validate configuration, or check syntax in config.toml."
            }
            Error::MissingCost { .. } => {
                "Pass '--cost <PEC>' or add 'pec-per-use' to the sidecar YAML next to the log."
            }
            Error::InvalidParameter { .. } => {
                "Efficiency and looter values are percentages in [0, 100]; costs must be positive."
            }
            Error::InputNotFound { .. } => "Check the log path. Globs are expanded by your shell.",
            Error::DegenerateDataset(_) => {
                "The logs produced no complete kill cycles. Check that the log contains shots followed by loot."
            }
            Error::Segmentation(_) => {
                "Segmentation needs at least one multiplier. Analyze a log with completed kills."
            }
            Error::Simulation(_) => {
                "Probabilities must sum to 1 and the multiplier, probability and spread tables must match in length."
            }
            Error::Io(_) => "Check that the file exists and is readable. Retry the operation.",
            Error::Json(_) => "Internal serialization failure. Please report it with the input log.",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::MissingCost { .. } => "Missing Shot Cost",
            Error::InvalidParameter { .. } => "Invalid Parameter",
            Error::InputNotFound { .. } => "Input Not Found",
            Error::DegenerateDataset(_) => "Degenerate Dataset",
            Error::Segmentation(_) => "Segmentation Failed",
            Error::Simulation(_) => "Invalid Simulation",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Error payload written to stderr in JSON mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,

    pub category: ErrorCategory,

    pub message: String,

    /// The offending log, path or field, plus whatever the caller adds.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let context = match err {
            Error::MissingCost { log } => Some(("log", log)),
            Error::InvalidParameter { field, .. } => Some(("field", field)),
            Error::InputNotFound { path } => Some(("path", path)),
            _ => None,
        }
        .map(|(key, value)| BTreeMap::from([(key.to_string(), serde_json::json!(value))]))
        .unwrap_or_default();

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            context,
        }
    }
}

impl StructuredError {
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Single-line JSON; never fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Three-line stderr rendering: headline, reason, fix.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let paint = |code: &str, text: &str| {
        if use_color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    };
    format!(
        "{} {}\n  Reason: {}\n  {} {}",
        paint("31", "✗"),
        err.headline(),
        err,
        paint("36", "Fix:"),
        err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(Error::MissingCost { log: "a.log".into() }.code(), 11);
        assert_eq!(Error::DegenerateDataset("empty".into()).code(), 30);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::Config("test".into()).category(), ErrorCategory::Config);
        assert_eq!(
            Error::InputNotFound { path: "x".into() }.category(),
            ErrorCategory::Input
        );
        assert_eq!(
            Error::Segmentation("empty".into()).category(),
            ErrorCategory::Analysis
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert_eq!(err.code(), 60);
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_structured_error_from_error() {
        let err = Error::MissingCost {
            log: "hunt.log".into(),
        };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 11);
        assert_eq!(structured.category, ErrorCategory::Config);
        assert_eq!(
            structured.context.get("log"),
            Some(&serde_json::json!("hunt.log"))
        );
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::DegenerateDataset("no kill cycles".into());
        let json = StructuredError::from(&err).to_json();

        assert!(json.contains(r#""code":30"#));
        assert!(json.contains(r#""category":"analysis""#));
        assert!(!json.contains("context"));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::MissingCost {
            log: "hunt.log".into(),
        };
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Missing Shot Cost"));
        assert!(formatted.contains("no per-shot cost configured for hunt.log"));
        assert!(formatted.contains("--cost"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Config.to_string(), "config");
        assert_eq!(ErrorCategory::Analysis.to_string(), "analysis");
    }
}
