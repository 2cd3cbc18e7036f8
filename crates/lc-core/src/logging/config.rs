//! Log level and format resolution.
//!
//! Precedence, lowest first: built-in defaults, `RUST_LOG`, `LOOTCYCLE_LOG`,
//! `LOOTCYCLE_LOG_FORMAT`, then the CLI flags.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// Targets whose `RUST_LOG` directives apply to this binary.
const OWN_TARGETS: [&str; 4] = ["lootcycle", "lc_core", "lc_config", "lc_math"];

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Console lines for interactive use.
    #[default]
    Human,
    /// One JSON object per event.
    #[value(alias = "json")]
    Jsonl,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    /// Default: stdout carries the report, stderr stays quiet.
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level implied by `-q` and the `-v` count; `None` leaves the env choice.
    pub fn from_flags(quiet: bool, verbose: u8) -> Option<LogLevel> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    fn parse(value: &str) -> Option<LogLevel> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "quiet" => Some(LogLevel::Off),
            _ => None,
        }
    }

    /// Pick a level out of an `EnvFilter`-style directive list.
    ///
    /// A directive for one of our own targets wins over a bare global level;
    /// directives for other crates are ignored.
    pub fn from_directives(directives: &str) -> Option<LogLevel> {
        let mut global = None;
        for directive in directives.split(',') {
            match directive.split_once('=') {
                Some((target, level)) => {
                    let target = target.split('[').next().unwrap_or(target).trim();
                    if OWN_TARGETS.contains(&target) {
                        if let Some(level) = LogLevel::parse(level) {
                            return Some(level);
                        }
                    }
                }
                None => global = LogLevel::parse(directive).or(global),
            }
        }
        global
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Timestamps on human lines; JSONL always carries them.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve from the process environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    fn resolve(
        var: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        let env_level = var("LOOTCYCLE_LOG")
            .and_then(|v| LogLevel::parse(&v))
            .or_else(|| var("RUST_LOG").and_then(|v| LogLevel::from_directives(&v)));
        if let Some(level) = env_level {
            config.level = level;
        }
        if let Some(format) = var("LOOTCYCLE_LOG_FORMAT")
            .and_then(|v| LogFormat::from_str(v.trim(), true).ok())
        {
            config.format = format;
        }
        if var("LOOTCYCLE_LOG_TIMESTAMPS").as_deref() == Some("0") {
            config.timestamps = false;
        }

        if let Some(level) = cli_level {
            config.level = level;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }
        config
    }
}
