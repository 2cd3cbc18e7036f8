//! lootcycle - kill cycle return analysis for hunting chat logs
//!
//! The main entry point, handling:
//! - Log ingest and kill cycle reconstruction
//! - Return summaries and tier segmentation
//! - Aggregate statistics and loot simulation

use clap::{Args, CommandFactory, Parser, Subcommand};
use lc_common::{format_error_human, Error, OutputFormat, StructuredError, SCHEMA_VERSION};
use lc_config::{load_config, AnalysisConfig, ConfigOptions, ResolvedConfig};
use lc_core::analysis::DistributionSegmenter;
use lc_core::exit_codes::ExitCode;
use lc_core::ingest::{self, FileReport};
use lc_core::log_event;
use lc_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use lc_core::report;
use lc_core::simulate::{simulate, SimulationConfig};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Kill cycle return analysis for hunting chat logs
#[derive(Parser)]
#[command(name = "lootcycle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to config.toml (otherwise LOOTCYCLE_CONFIG, LOOTCYCLE_CONFIG_DIR, XDG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct kill cycles and summarize returns
    Analyze(AnalyzeArgs),

    /// Export one row per kill cycle
    Export(InputArgs),

    /// Segment the multiplier distribution into tiers
    Segment(InputArgs),

    /// Count combat, skill, loot and team events (no cost needed)
    Aggregate(AggregateArgs),

    /// Generate and analyze a synthetic hunt
    Simulate(SimulateArgs),

    /// Load and validate configuration
    Check,

    /// Print shell completions
    Completions(CompletionsArgs),
}

/// Logs and per-run overrides shared by the cycle commands
#[derive(Args, Debug)]
struct InputArgs {
    /// Chat log files, processed in order
    #[arg(required = true)]
    logs: Vec<PathBuf>,

    /// Cost per shot in PEC (a sidecar pec-per-use takes precedence)
    #[arg(long)]
    cost: Option<f64>,

    /// Rescale loot to 100% efficiency and looter
    #[arg(long)]
    normalize: bool,

    /// Drop loot items by name (repeatable)
    #[arg(long = "ignore-item", value_name = "NAME")]
    ignore_items: Vec<String>,

    /// Only charge shots that land
    #[arg(long)]
    no_charge_misses: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Also segment the multiplier distribution
    #[arg(long)]
    segment: bool,
}

#[derive(Args, Debug)]
struct AggregateArgs {
    /// Chat log files
    #[arg(required = true)]
    logs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of kills to draw
    #[arg(long, default_value_t = 10_000)]
    kills: usize,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Weapon efficiency in percent
    #[arg(long, default_value_t = 100.0)]
    efficiency: f64,

    /// Looter skill in percent
    #[arg(long, default_value_t = 100.0)]
    looter: f64,

    /// Mean cost of one kill in PED
    #[arg(long, default_value_t = 1.0)]
    cost_per_kill: f64,
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Target shell
    shell: clap_complete::Shell,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = LogLevel::from_flags(cli.global.quiet, cli.global.verbose);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id());
    log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "lootcycle started",
        version = env!("CARGO_PKG_VERSION")
    );

    let global = &cli.global;
    let result = match &cli.command {
        Commands::Analyze(args) => run_analyze(global, &ctx, args),
        Commands::Export(args) => run_export(global, &ctx, args),
        Commands::Segment(args) => run_segment(global, &ctx, args),
        Commands::Aggregate(args) => run_aggregate(global, &ctx, args),
        Commands::Simulate(args) => run_simulate(global, &ctx, args),
        Commands::Check => run_check(global, &ctx),
        Commands::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "lootcycle",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::Clean)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(global, &err),
    };
    log_event!(
        ctx,
        INFO,
        event_names::RUN_FINISHED,
        Stage::Report,
        "lootcycle finished",
        exit_code = exit_code.code_name()
    );

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Resolve and load config.toml, logging a rejected file.
fn load_resolved(global: &GlobalOpts, ctx: &LogContext) -> lc_common::Result<ResolvedConfig> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
    };
    load_config(&options).map_err(|e| {
        log_event!(
            ctx,
            WARN,
            event_names::CONFIG_ERROR,
            Stage::Init,
            "configuration rejected",
            error = e.to_string()
        );
        e.into()
    })
}

/// Load config.toml and apply the per-run CLI overrides.
fn load_settings(
    global: &GlobalOpts,
    ctx: &LogContext,
    input: Option<&InputArgs>,
) -> lc_common::Result<AnalysisConfig> {
    let mut config = load_resolved(global, ctx)?.config;

    if let Some(input) = input {
        let acc = &mut config.accumulator;
        acc.normalize |= input.normalize;
        acc.ignore_items.extend(input.ignore_items.iter().cloned());
        if input.no_charge_misses {
            acc.charge_misses = false;
        }
    }
    Ok(config)
}

/// Wrap a command payload in the standard JSON envelope on stdout.
fn emit_json(
    ctx: &LogContext,
    command: &str,
    result: serde_json::Value,
) -> lc_common::Result<()> {
    let output = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": ctx.run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "command": command,
        "result": result,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Output for a run whose logs produced no complete kill cycle.
fn output_no_cycles(
    global: &GlobalOpts,
    ctx: &LogContext,
    command: &str,
    files: &[FileReport],
) -> lc_common::Result<ExitCode> {
    match global.format {
        OutputFormat::Json => emit_json(
            ctx,
            command,
            serde_json::json!({ "files": files, "kills": 0 }),
        )?,
        OutputFormat::Md => {
            println!("# Kill cycle analysis");
            println!();
            println!("No complete kill cycle was found in the given logs.");
        }
        OutputFormat::Summary => println!("kills=0"),
    }
    Ok(ExitCode::NoCycles)
}

/// Output an error in the appropriate format and pick the exit code.
fn output_error(global: &GlobalOpts, error: &Error) -> ExitCode {
    let exit_code = ExitCode::from(error);
    match global.format {
        OutputFormat::Json => {
            let structured =
                StructuredError::from(error).with_context("exit_code", exit_code.code_name());
            eprintln!("{}", structured.to_json());
        }
        OutputFormat::Md | OutputFormat::Summary => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(error, use_color));
        }
    }
    exit_code
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(
    global: &GlobalOpts,
    ctx: &LogContext,
    args: &AnalyzeArgs,
) -> lc_common::Result<ExitCode> {
    let config = load_settings(global, ctx, Some(&args.input))?;
    let ingested = ingest::ingest(
        ctx,
        &args.input.logs,
        args.input.cost,
        &config.accumulator,
    )?;
    if ingested.dataset.is_empty() {
        return output_no_cycles(global, ctx, "analyze", &ingested.files);
    }

    let summary = ingested.dataset.summary(&config.bands)?;
    log_event!(
        ctx,
        INFO,
        event_names::SUMMARY_COMPUTED,
        Stage::Analyze,
        "summary computed",
        kills = summary.kills,
        total_return = summary.total_return
    );

    let segmentation = if args.segment {
        Some(DistributionSegmenter::new(config.segmenter).segment(&ingested.dataset.multipliers())?)
    } else {
        None
    };

    match global.format {
        OutputFormat::Json => emit_json(
            ctx,
            "analyze",
            serde_json::json!({
                "files": ingested.files,
                "summary": summary,
                "segmentation": segmentation,
            }),
        )?,
        OutputFormat::Md => print!(
            "{}",
            report::analysis_markdown(&summary, segmentation.as_ref(), &ingested.files)
        ),
        OutputFormat::Summary => println!("{}", report::summary_line(&summary)),
    }
    Ok(ExitCode::Clean)
}

fn run_export(
    global: &GlobalOpts,
    ctx: &LogContext,
    args: &InputArgs,
) -> lc_common::Result<ExitCode> {
    let config = load_settings(global, ctx, Some(args))?;
    let ingested = ingest::ingest(ctx, &args.logs, args.cost, &config.accumulator)?;
    if ingested.dataset.is_empty() {
        return output_no_cycles(global, ctx, "export", &ingested.files);
    }

    let rows = ingested.dataset.rows();
    match global.format {
        OutputFormat::Json => emit_json(
            ctx,
            "export",
            serde_json::json!({ "files": ingested.files, "rows": rows }),
        )?,
        OutputFormat::Md => print!("{}", report::export_markdown(&rows)),
        OutputFormat::Summary => println!("rows={}", rows.len()),
    }
    Ok(ExitCode::Clean)
}

fn run_segment(
    global: &GlobalOpts,
    ctx: &LogContext,
    args: &InputArgs,
) -> lc_common::Result<ExitCode> {
    let config = load_settings(global, ctx, Some(args))?;
    let ingested = ingest::ingest(ctx, &args.logs, args.cost, &config.accumulator)?;
    if ingested.dataset.is_empty() {
        return output_no_cycles(global, ctx, "segment", &ingested.files);
    }

    let segmentation =
        DistributionSegmenter::new(config.segmenter).segment(&ingested.dataset.multipliers())?;
    log_event!(
        ctx,
        INFO,
        event_names::SEGMENT_FINISHED,
        Stage::Segment,
        "segmentation finished",
        groups = segmentation.groups.len()
    );

    match global.format {
        OutputFormat::Json => emit_json(
            ctx,
            "segment",
            serde_json::json!({ "files": ingested.files, "segmentation": segmentation }),
        )?,
        OutputFormat::Md => print!("{}", report::segmentation_markdown(&segmentation)),
        OutputFormat::Summary => println!("{}", report::segmentation_line(&segmentation)),
    }
    Ok(ExitCode::Clean)
}

fn run_aggregate(
    global: &GlobalOpts,
    ctx: &LogContext,
    args: &AggregateArgs,
) -> lc_common::Result<ExitCode> {
    let config = load_settings(global, ctx, None)?;
    let stats = ingest::aggregate(ctx, &args.logs, &config.accumulator)?;

    match global.format {
        OutputFormat::Json => emit_json(ctx, "aggregate", serde_json::to_value(&stats)?)?,
        OutputFormat::Md => print!("{}", report::aggregate_markdown(&stats)),
        OutputFormat::Summary => println!("{}", report::aggregate_line(&stats)),
    }
    Ok(ExitCode::Clean)
}

fn run_simulate(
    global: &GlobalOpts,
    ctx: &LogContext,
    args: &SimulateArgs,
) -> lc_common::Result<ExitCode> {
    let config = load_settings(global, ctx, None)?;
    let sim_config = SimulationConfig {
        kills: args.kills,
        seed: args.seed,
        efficiency: args.efficiency,
        looter: args.looter,
        cost_per_kill: args.cost_per_kill,
        ..SimulationConfig::default()
    };
    let simulation = simulate(&sim_config)?;
    let summary = simulation.dataset.summary(&config.bands)?;
    let segmentation =
        DistributionSegmenter::new(config.segmenter).segment(&simulation.dataset.multipliers())?;

    match global.format {
        OutputFormat::Json => emit_json(
            ctx,
            "simulate",
            serde_json::json!({
                "parameters": sim_config,
                "expected_return": simulation.expected_return,
                "summary": summary,
                "segmentation": segmentation,
            }),
        )?,
        OutputFormat::Md => print!(
            "{}",
            report::simulation_markdown(&simulation, &summary, &segmentation)
        ),
        OutputFormat::Summary => println!(
            "{} expected={:.2}%",
            report::summary_line(&summary),
            simulation.expected_return * 100.0
        ),
    }
    Ok(ExitCode::Clean)
}

fn run_check(global: &GlobalOpts, ctx: &LogContext) -> lc_common::Result<ExitCode> {
    let resolved = load_resolved(global, ctx)?;
    let path = resolved.path.as_ref().map(|p| p.display().to_string());

    match global.format {
        OutputFormat::Json => emit_json(
            ctx,
            "check",
            serde_json::json!({
                "status": "ok",
                "config_path": path,
                "source": resolved.source.to_string(),
                "using_defaults": resolved.path.is_none(),
                "config": resolved.config,
            }),
        )?,
        OutputFormat::Md => {
            println!("# lootcycle check");
            println!();
            println!("✓ config: ok");
            println!("  Source: {}", resolved.source);
            if let Some(path) = &path {
                println!("  Path: {}", path);
            }
            println!("  Schema version: {}", resolved.config.schema_version);
        }
        OutputFormat::Summary => println!("check: OK ({})", resolved.source),
    }
    Ok(ExitCode::Clean)
}
