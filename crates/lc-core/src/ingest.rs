//! Reading one or more chat logs into a dataset.
//!
//! Every input is checked and its cost resolved before any file is parsed,
//! so a run never fails halfway through on a missing cost.

use crate::aggregate::AggregateStats;
use crate::cycle::{try_fold_events, AccumulatorStats, CostParams};
use crate::dataset::Dataset;
use crate::events::LogReader;
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use lc_common::{Error, Result};
use lc_config::{resolve_run_params, AccumulatorSettings, CostSource, RunMetadata, RunParams};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::field::display;

/// Per-file outcome of an ingest run.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub cost_source: CostSource,
    pub ped_per_shot: f64,
    pub efficiency: f64,
    pub looter: f64,
    pub lines_total: u64,
    pub lines_skipped: u64,
    pub accumulator: AccumulatorStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
}

impl FileReport {
    /// Lines that classified into an event.
    pub fn lines_parsed(&self) -> u64 {
        self.lines_total - self.lines_skipped
    }
}

/// Merged dataset plus per-file details.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub dataset: Dataset,
    pub files: Vec<FileReport>,
}

/// Checks that every path exists, without reading it.
pub fn check_inputs(logs: &[PathBuf]) -> Result<()> {
    if logs.is_empty() {
        return Err(Error::InvalidParameter {
            field: "logs".to_string(),
            message: "at least one log file is required".to_string(),
        });
    }
    match logs.iter().find(|p| !p.is_file()) {
        Some(missing) => Err(Error::InputNotFound {
            path: missing.display().to_string(),
        }),
        None => Ok(()),
    }
}

/// Resolve run parameters for every log. Fails on the first log without
/// a usable cost.
pub fn resolve_all(logs: &[PathBuf], cli_cost_pec: Option<f64>) -> Result<Vec<RunParams>> {
    logs.iter()
        .map(|log| -> Result<RunParams> {
            let metadata = RunMetadata::load_for(log)?;
            Ok(resolve_run_params(log, cli_cost_pec, metadata)?)
        })
        .collect()
}

/// Parse and accumulate `logs` in order.
pub fn ingest(
    ctx: &LogContext,
    logs: &[PathBuf],
    cli_cost_pec: Option<f64>,
    settings: &AccumulatorSettings,
) -> Result<IngestReport> {
    check_inputs(logs)?;
    let params = resolve_all(logs, cli_cost_pec)?;

    log_event!(
        ctx,
        INFO,
        event_names::INGEST_STARTED,
        Stage::Ingest,
        "reading logs",
        files = logs.len()
    );

    let mut dataset: Option<Dataset> = None;
    let mut files = Vec::with_capacity(logs.len());
    for (log, params) in logs.iter().zip(params) {
        log_event!(
            ctx,
            DEBUG,
            event_names::INGEST_COST_RESOLVED,
            Stage::Ingest,
            "cost resolved",
            path = display(log.display()),
            source = display(params.cost_source),
            ped_per_shot = params.ped_per_shot
        );
        let (file_dataset, report) = ingest_file(log, params, settings)?;
        log_event!(
            ctx,
            INFO,
            event_names::INGEST_FILE_DONE,
            Stage::Ingest,
            "log processed",
            path = display(log.display()),
            lines = report.lines_total,
            skipped = report.lines_skipped,
            cycles = report.accumulator.cycles_emitted,
            discarded = report.accumulator.discarded_ratio + report.accumulator.discarded_scrap
        );
        if report.lines_parsed() == 0 {
            log_event!(
                ctx,
                WARN,
                event_names::INGEST_FILE_EMPTY,
                Stage::Ingest,
                "log has no parseable lines",
                path = display(log.display()),
                lines = report.lines_total
            );
        }
        match dataset.as_mut() {
            Some(merged) => merged.merge(file_dataset),
            None => dataset = Some(file_dataset),
        }
        files.push(report);
    }

    // check_inputs guarantees at least one file.
    let dataset = dataset.ok_or_else(|| Error::InvalidParameter {
        field: "logs".to_string(),
        message: "no log files were read".to_string(),
    })?;
    if files.iter().all(|f| f.lines_parsed() == 0) {
        return Err(Error::DegenerateDataset(format!(
            "no parseable chat log lines in {} file(s)",
            files.len()
        )));
    }
    Ok(IngestReport { dataset, files })
}

fn open(path: &Path) -> Result<LogReader<BufReader<File>>> {
    Ok(LogReader::new(BufReader::new(File::open(path)?)))
}

fn ingest_file(
    path: &Path,
    params: RunParams,
    settings: &AccumulatorSettings,
) -> Result<(Dataset, FileReport)> {
    let cost = CostParams::from(&params);
    let mut reader = open(path)?;
    let (dataset, stats) = try_fold_events(reader.by_ref(), settings, cost)?;

    let report = FileReport {
        path: path.to_path_buf(),
        cost_source: params.cost_source,
        ped_per_shot: params.ped_per_shot,
        efficiency: params.efficiency,
        looter: params.looter,
        lines_total: reader.lines_total(),
        lines_skipped: reader.lines_skipped(),
        accumulator: stats,
        metadata: params.metadata,
    };
    Ok((dataset, report))
}

/// Tally aggregate counters over `logs`. No cost is needed.
pub fn aggregate(
    ctx: &LogContext,
    logs: &[PathBuf],
    settings: &AccumulatorSettings,
) -> Result<AggregateStats> {
    check_inputs(logs)?;
    let mut stats = AggregateStats::default();
    for log in logs {
        let mut reader = open(log)?;
        for event in reader.by_ref() {
            stats.record(&event?, settings);
        }
        log_event!(
            ctx,
            INFO,
            event_names::INGEST_FILE_DONE,
            Stage::Ingest,
            "log processed",
            path = display(log.display()),
            lines = reader.lines_total(),
            skipped = reader.lines_skipped()
        );
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HUNT: &str = "\
2021-09-04 19:00:00 [System] [] You inflicted 10.0 points of damage
2021-09-04 19:00:01 [System] [] You inflicted 10.0 points of damage
2021-09-04 19:00:02 [System] [] You received Animal Hide x (10) Value: 0.15 PED
2021-09-04 19:00:03 [System] [] You inflicted 10.0 points of damage
garbage line
2021-09-04 19:00:04 [System] [] You received Animal Hide x (1) Value: 0.02 PED
2021-09-04 19:00:05 [System] [] You missed
";

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn ctx() -> LogContext {
        LogContext::new("run-test")
    }

    #[test]
    fn ingests_with_cli_cost() {
        let dir = TempDir::new().unwrap();
        let log = write(&dir, "hunt.log", HUNT);
        let report = ingest(&ctx(), &[log], Some(5.0), &AccumulatorSettings::default()).unwrap();

        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.dataset.shots_fired, 4);
        assert_eq!(report.files[0].cost_source, CostSource::CliArgument);
        assert_eq!(report.files[0].lines_skipped, 1);
        assert!((report.dataset.cycles[0].cost - 0.1).abs() < 1e-6);
    }

    #[test]
    fn sidecar_cost_wins() {
        let dir = TempDir::new().unwrap();
        let log = write(&dir, "hunt.log", HUNT);
        write(&dir, "hunt.yaml", "pec-per-use: 10\nefficiency: 80\n");
        let report = ingest(&ctx(), &[log], Some(5.0), &AccumulatorSettings::default()).unwrap();

        assert_eq!(report.files[0].cost_source, CostSource::Sidecar);
        assert_eq!(report.dataset.ped_per_shot, 0.1);
        assert_eq!(report.dataset.efficiency, 80.0);
    }

    #[test]
    fn missing_cost_fails_before_parsing() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "a.log", HUNT);
        write(&dir, "a.yaml", "pec-per-use: 10\n");
        let bad = write(&dir, "b.log", HUNT);
        let err = ingest(&ctx(), &[good, bad], None, &AccumulatorSettings::default()).unwrap_err();
        assert!(matches!(err, Error::MissingCost { .. }));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = ingest(
            &ctx(),
            &[dir.path().join("nope.log")],
            Some(5.0),
            &AccumulatorSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }

    #[test]
    fn multiple_logs_concatenate() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.log", HUNT);
        let b = write(&dir, "b.log", HUNT);
        let report = ingest(&ctx(), &[a, b], Some(5.0), &AccumulatorSettings::default()).unwrap();
        assert_eq!(report.dataset.len(), 4);
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.dataset.shots_fired, 8);
    }

    #[test]
    fn unparseable_logs_are_degenerate() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.log", "not a chat log\nstill not\n");
        let b = write(&dir, "b.log", "");
        let err =
            ingest(&ctx(), &[a, b], Some(5.0), &AccumulatorSettings::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateDataset(_)));
    }

    #[test]
    fn one_empty_log_among_good_ones_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "empty.log", "garbage\n");
        let good = write(&dir, "hunt.log", HUNT);
        let report =
            ingest(&ctx(), &[empty, good], Some(5.0), &AccumulatorSettings::default()).unwrap();
        assert_eq!(report.files[0].lines_parsed(), 0);
        assert_eq!(report.files[1].lines_parsed(), 6);
        assert_eq!(report.dataset.len(), 2);
    }

    #[test]
    fn parseable_log_without_cycles_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let log = write(
            &dir,
            "shots.log",
            "2021-09-04 19:00:00 [System] [] You inflicted 10.0 points of damage\n",
        );
        let report = ingest(&ctx(), &[log], Some(5.0), &AccumulatorSettings::default()).unwrap();
        assert!(report.dataset.is_empty());
        assert_eq!(report.dataset.shots_fired, 1);
    }

    #[test]
    fn aggregate_needs_no_cost() {
        let dir = TempDir::new().unwrap();
        let log = write(&dir, "hunt.log", HUNT);
        let stats = aggregate(&ctx(), &[log], &AccumulatorSettings::default()).unwrap();
        assert_eq!(stats.player.hits, 3);
        assert_eq!(stats.player.misses, 1);
        assert_eq!(stats.loot["Animal Hide"].count, 11);
    }
}
