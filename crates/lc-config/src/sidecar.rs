//! Sidecar run metadata and per-file cost resolution.
//!
//! A hunting log `<dir>/<stem>.log` may have a YAML file next to it,
//! `<dir>/<stem>.yaml` (or `.yml`), describing the setup used:
//!
//! ```yaml
//! looter: 45
//! efficiency: 78.5
//! pec-per-use: 3.2
//! mob: Atrox Young
//! weapon: ArMatrix LP-35 (L)
//! comment: morning session
//! ```
//!
//! `mob`, `weapon` and `comment` are opaque to the analysis and only
//! carried into reports.

use crate::load::ConfigError;
use crate::validate::validate_metadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SIDECAR_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Sidecar metadata for one log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunMetadata {
    #[serde(default = "default_percentage")]
    pub looter: f64,

    #[serde(default = "default_percentage")]
    pub efficiency: f64,

    /// Fixed cost per use in PEC; supersedes the CLI cost when > 0.
    #[serde(default)]
    pub pec_per_use: Option<f64>,

    #[serde(default)]
    pub mob: Option<String>,

    #[serde(default)]
    pub weapon: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,
}

fn default_percentage() -> f64 {
    100.0
}

impl Default for RunMetadata {
    fn default() -> Self {
        RunMetadata {
            looter: default_percentage(),
            efficiency: default_percentage(),
            pec_per_use: None,
            mob: None,
            weapon: None,
            comment: None,
        }
    }
}

impl RunMetadata {
    /// Parse and validate sidecar YAML.
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let meta: RunMetadata =
            serde_yaml::from_str(content).map_err(|source| ConfigError::SidecarParse {
                path: path.to_path_buf(),
                source,
            })?;
        validate_metadata(&meta)?;
        Ok(meta)
    }

    /// Location of the sidecar for `log`, if one exists on disk.
    pub fn sidecar_path(log: &Path) -> Option<PathBuf> {
        SIDECAR_EXTENSIONS
            .iter()
            .map(|ext| log.with_extension(ext))
            .find(|candidate| candidate != log && candidate.is_file())
    }

    /// Load the sidecar co-located with `log`. `Ok(None)` when absent.
    pub fn load_for(log: &Path) -> Result<Option<Self>, ConfigError> {
        let Some(path) = Self::sidecar_path(log) else {
            debug!(log = %log.display(), "no sidecar metadata");
            return Ok(None);
        };
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
            path: path.clone(),
            source,
        })?;
        let meta = Self::from_yaml_str(&content, &path)?;
        debug!(
            sidecar = %path.display(),
            looter = meta.looter,
            efficiency = meta.efficiency,
            pec_per_use = ?meta.pec_per_use,
            "loaded sidecar metadata"
        );
        Ok(Some(meta))
    }

    /// Fixed cost override in PEC, if present and positive.
    pub fn cost_override(&self) -> Option<f64> {
        self.pec_per_use.filter(|pec| pec.is_finite() && *pec > 0.0)
    }
}

/// Where the per-shot cost came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostSource {
    /// `pec-per-use` in the sidecar.
    Sidecar,
    /// `--cost` on the command line.
    CliArgument,
}

impl std::fmt::Display for CostSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostSource::Sidecar => write!(f, "sidecar"),
            CostSource::CliArgument => write!(f, "CLI argument"),
        }
    }
}

/// Scalar parameters for one analysis pass over one log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    /// Cost attributed to one shot, in PED.
    pub ped_per_shot: f64,
    pub efficiency: f64,
    pub looter: f64,
    pub cost_source: CostSource,
    /// Descriptive sidecar fields, when a sidecar was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
}

impl RunParams {
    /// Params from a cost in PEC with reference efficiency/looter (100/100).
    pub fn from_pec(pec_per_shot: f64) -> Self {
        RunParams {
            ped_per_shot: pec_per_shot / 100.0,
            efficiency: default_percentage(),
            looter: default_percentage(),
            cost_source: CostSource::CliArgument,
            metadata: None,
        }
    }
}

/// Resolve the run parameters for `log`.
///
/// Cost precedence: sidecar `pec-per-use` (when > 0), then `cli_cost_pec`.
/// With neither, the run must not proceed.
pub fn resolve_run_params(
    log: &Path,
    cli_cost_pec: Option<f64>,
    metadata: Option<RunMetadata>,
) -> Result<RunParams, ConfigError> {
    let (pec, cost_source) = match metadata.as_ref().and_then(RunMetadata::cost_override) {
        Some(pec) => (pec, CostSource::Sidecar),
        None => match cli_cost_pec.filter(|pec| *pec > 0.0 && pec.is_finite()) {
            Some(pec) => (pec, CostSource::CliArgument),
            None => {
                return Err(ConfigError::MissingCost {
                    log: log.to_path_buf(),
                })
            }
        },
    };

    let (efficiency, looter) = metadata
        .as_ref()
        .map(|m| (m.efficiency, m.looter))
        .unwrap_or((default_percentage(), default_percentage()));

    Ok(RunParams {
        ped_per_shot: pec / 100.0,
        efficiency,
        looter,
        cost_source,
        metadata,
    })
}
