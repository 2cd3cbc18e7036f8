//! Configuration loading.

use crate::analysis::AnalysisConfig;
use crate::resolve::{resolve_config_path, ConfigSource};
use crate::validate::{validate_analysis, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading configuration or sidecars.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid YAML in sidecar {path}: {source}")]
    SidecarParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No per-shot cost for {log}: pass --cost or set pec-per-use in the sidecar")]
    MissingCost { log: PathBuf },
}

impl From<ConfigError> for lc_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingCost { log } => lc_common::Error::MissingCost {
                log: log.display().to_string(),
            },
            ConfigError::ValidationError(ValidationError::InvalidValue { field, message }) => {
                lc_common::Error::InvalidParameter { field, message }
            }
            ConfigError::IoError { source, .. } => lc_common::Error::Io(source),
            other => lc_common::Error::Config(other.to_string()),
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit config file path (highest priority).
    pub config_path: Option<PathBuf>,
}

/// Loaded configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AnalysisConfig,
    /// Path the config came from (`None` for built-in defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Load configuration with the standard resolution order.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let (path, source) = resolve_config_path(options.config_path.as_deref());

    let Some(path) = path else {
        debug!(event = "config.default_used", "no config file found, using defaults");
        return Ok(ResolvedConfig {
            config: AnalysisConfig::default(),
            path: None,
            source,
        });
    };

    let config = load_config_file(&path)?;
    info!(
        event = "config.loaded",
        path = %path.display(),
        source = %source,
        normalize = config.accumulator.normalize,
        "configuration loaded"
    );
    Ok(ResolvedConfig {
        config,
        path: Some(path),
        source,
    })
}

/// Read, parse and validate a single config file.
pub fn load_config_file(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AnalysisConfig =
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
    validate_analysis(&config)?;
    Ok(config)
}
