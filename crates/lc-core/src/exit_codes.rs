//! Exit codes for the lootcycle CLI.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use lc_common::Error;

/// Exit codes for lootcycle operations.
///
/// These codes are a stable contract for scripts wrapping the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Logs parsed but produced no complete kill cycle
    NoCycles = 1,

    /// Invalid arguments or missing inputs
    ArgsError = 10,

    /// Configuration, sidecar or cost error
    ConfigError = 11,

    /// Statistics could not be computed on the dataset
    DegenerateDataset = 12,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates any error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::NoCycles => "OK_NO_CYCLES",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::DegenerateDataset => "ERR_DEGENERATE",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::MissingCost { .. } => ExitCode::ConfigError,
            Error::InvalidParameter { .. } | Error::InputNotFound { .. } => ExitCode::ArgsError,
            Error::Simulation(_) => ExitCode::ArgsError,
            Error::DegenerateDataset(_) | Error::Segmentation(_) => ExitCode::DegenerateDataset,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert!(!ExitCode::Clean.is_error());
        assert!(!ExitCode::NoCycles.is_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_error());
        assert!(!ExitCode::IoError.is_user_error());
    }

    #[test]
    fn errors_map_to_codes() {
        let missing = Error::MissingCost {
            log: "hunt.log".into(),
        };
        assert_eq!(ExitCode::from(&missing), ExitCode::ConfigError);
        assert_eq!(
            ExitCode::from(&Error::DegenerateDataset("empty".into())).as_i32(),
            12
        );
    }

    #[test]
    fn display_includes_name_and_code() {
        assert_eq!(ExitCode::ArgsError.to_string(), "ERR_ARGS (10)");
    }
}
