//! Structured event vocabulary for logging.
//!
//! Every event is emitted with a stable `event` name and the pipeline
//! `stage`, so JSONL logs can be filtered without parsing messages.

use serde::{Deserialize, Serialize};

/// Processing stages in the lootcycle pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading and classifying log lines.
    Ingest,
    /// Kill cycle accumulation.
    Accumulate,
    /// Summary statistics.
    Analyze,
    /// Distribution segmentation.
    Segment,
    /// Rendering output.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Ingest => "ingest",
            Stage::Accumulate => "accumulate",
            Stage::Analyze => "analyze",
            Stage::Segment => "segment",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Ingest stage
    pub const INGEST_STARTED: &str = "ingest.started";
    pub const INGEST_COST_RESOLVED: &str = "ingest.cost_resolved";
    pub const INGEST_LINE_SKIPPED: &str = "ingest.line_skipped";
    pub const INGEST_FILE_DONE: &str = "ingest.file_done";
    pub const INGEST_FILE_EMPTY: &str = "ingest.file_empty";

    // Accumulate stage
    pub const CYCLE_FINALIZED: &str = "cycle.finalized";
    pub const CYCLE_DISCARDED: &str = "cycle.discarded";

    // Analyze / segment stages
    pub const SUMMARY_COMPUTED: &str = "analyze.summary";
    pub const SEGMENT_TIER_FOUND: &str = "segment.tier_found";
    pub const SEGMENT_FINISHED: &str = "segment.finished";

    // Simulation
    pub const SIMULATE_FINISHED: &str = "simulate.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";
}
