//! Structured logging foundation for lootcycle.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for scripted pipelines
//!
//! # Usage
//!
//! ```ignore
//! use lc_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//!
//! init_logging(&LogConfig::from_env(None, None));
//!
//! let ctx = LogContext::new(generate_run_id());
//! log_event!(ctx, INFO, event_names::INGEST_STARTED, Stage::Ingest, "reading logs",
//!     files = 3);
//! ```
//!
//! stdout is reserved for command payloads; all log output goes to stderr.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Correlation data attached to every structured event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }
}

/// Initialize the logging subsystem.
///
/// The level comes from `config` alone; `RUST_LOG` is folded into it by
/// [`LogConfig::from_env`]. Returns `false` if a global subscriber was
/// already installed.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::default().add_directive(LevelFilter::from(config.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Human => {
            let console = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                registry.with(console).try_init().is_ok()
            } else {
                registry.with(console.without_time()).try_init().is_ok()
            }
        }
        LogFormat::Jsonl => {
            let jsonl = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr);
            registry.with(jsonl).try_init().is_ok()
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

/// Structured event logging with a run context.
///
/// ```ignore
/// log_event!(ctx, DEBUG, event_names::CYCLE_DISCARDED, Stage::Accumulate,
///     "cycle discarded", reason = "ratio");
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::event!(
            tracing::Level::$level,
            event = $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_eq!(id1.len(), 16);
        assert_ne!(id1, id2);
    }

    #[test]
    fn init_installs_one_global_subscriber() {
        let first = init_logging(&LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Debug,
            timestamps: false,
        });
        assert!(first);
        let second = init_logging(&LogConfig {
            format: LogFormat::Jsonl,
            ..LogConfig::default()
        });
        assert!(!second);
    }

    #[test]
    fn test_log_event_macro_compiles_without_subscriber() {
        let ctx = LogContext::new("run-test");
        crate::log_event!(
            ctx,
            DEBUG,
            event_names::CYCLE_DISCARDED,
            Stage::Accumulate,
            "discarded",
            ratio = 250_000.0
        );
    }
}
