//! Wormhole Roller - POMCTS decision-support CLI
//!
//! A thin driver around the planner: loads policy/catalog (bundled
//! defaults or file overrides), runs `plan`, and prints ranked action
//! recommendations, a trip-count distribution, and a greedy action
//! sequence. No session state, no interactive loop — real play re-invokes
//! this after every observation.

use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use wh_common::{format_error_human, Error, StructuredError};
use wh_config::{default_catalog, validate_catalog, validate_policy, Catalog, Policy};
use wh_core::exit_codes::ExitCode;
use wh_core::log_event;
use wh_core::logging::{self, event_names, LogConfig, LogContext, LogFormat, LogLevel, Stage};
use wh_core::{action_results, best_action, plan, sequence, trip_distribution};

#[derive(Parser, Debug)]
#[command(name = "wh-core", about = "POMCTS planner for wormhole rolling", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Logging level: trace, debug, info, warn, error, off.
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Logging output format: human or jsonl.
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the planner and print ranked action recommendations.
    Plan(PlanArgs),
}

#[derive(clap::Args, Debug)]
struct PlanArgs {
    /// Lower bound of the hole's total-mass belief, in millions.
    #[arg(long)]
    total_min: f64,

    /// Upper bound of the hole's total-mass belief, in millions.
    #[arg(long)]
    total_max: f64,

    /// Cumulative mass already consumed, in millions.
    #[arg(long, default_value_t = 0.0)]
    mass_used: f64,

    /// Number of POMCTS iterations to run.
    #[arg(long, default_value_t = 100_000)]
    iterations: u64,

    /// Path to a policy JSON file; defaults to the bundled policy.
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Path to an action-catalog JSON file; defaults to the bundled catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output format: human or json.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Deterministic seed for the sampling RNG (primarily for testing).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Serialize)]
struct PlanReport {
    results: Vec<wh_core::ActionResult>,
    best_action: Option<wh_core::ActionResult>,
    sequence: Vec<String>,
    trip_distribution: Vec<wh_core::TripBucket>,
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    let log_config = LogConfig::from_env(cli.log_level, cli.log_format);
    logging::init_logging(&log_config);

    let run_id = logging::generate_run_id();
    let host_id = logging::get_host_id();
    let ctx = LogContext::new(run_id, host_id);

    match run(&cli, &ctx) {
        Ok(code) => code.as_i32().try_into().unwrap_or(1).into(),
        Err(err) => {
            log_event!(ctx, ERROR, event_names::INTERNAL_ERROR, Stage::Init, err.to_string());
            report_error(&err, matches!(&cli.command, Command::Plan(a) if a.format == OutputFormat::Json));
            exit_code_for(&err).as_i32().try_into().unwrap_or(1).into()
        }
    }
}

fn run(cli: &Cli, ctx: &LogContext) -> wh_common::Result<ExitCode> {
    match &cli.command {
        Command::Plan(args) => run_plan(args, ctx),
    }
}

fn run_plan(args: &PlanArgs, ctx: &LogContext) -> wh_common::Result<ExitCode> {
    let policy = load_policy(args.policy.as_deref(), ctx)?;
    let catalog = load_catalog(args.catalog.as_deref(), ctx)?;

    log_event!(ctx, INFO, event_names::PLAN_STARTED, Stage::Plan, "Starting planning run");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let tree = plan(
        &catalog,
        &policy,
        args.total_min,
        args.total_max,
        args.mass_used,
        args.iterations,
        &mut rng,
    )?;

    log_event!(ctx, INFO, event_names::PLAN_FINISHED, Stage::Plan, "Planning run complete");

    let results = action_results(&tree, &catalog);
    let best = best_action(&tree, &catalog);
    let seq = sequence(&tree);
    let distribution = trip_distribution(&tree, policy.min_bucket_probability);

    log_event!(
        ctx,
        INFO,
        event_names::RANK_COMPUTED,
        Stage::Rank,
        format!("{} action(s) ranked", results.len())
    );

    let report = PlanReport {
        results,
        best_action: best,
        sequence: seq,
        trip_distribution: distribution,
    };

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
        OutputFormat::Human => print_human_report(&report),
    }

    match &report.best_action {
        Some(_) => Ok(ExitCode::Clean),
        None => Ok(ExitCode::PlanStop),
    }
}

fn load_policy(path: Option<&std::path::Path>, ctx: &LogContext) -> wh_common::Result<Policy> {
    let policy = match path {
        Some(p) => Policy::from_file(p).map_err(|e| Error::InvalidPolicy(e.to_string()))?,
        None => {
            log_event!(
                ctx,
                INFO,
                event_names::CONFIG_DEFAULT_USED,
                Stage::Init,
                "Using bundled default policy"
            );
            Policy::default()
        }
    };
    validate_policy(&policy).map_err(|e| Error::InvalidPolicy(e.to_string()))?;
    log_event!(ctx, INFO, event_names::CONFIG_LOADED, Stage::Init, "Policy loaded");
    Ok(policy)
}

fn load_catalog(path: Option<&std::path::Path>, ctx: &LogContext) -> wh_common::Result<Catalog> {
    let catalog = match path {
        Some(p) => Catalog::from_file(p).map_err(|e| Error::SchemaValidation(e.to_string()))?,
        None => {
            log_event!(
                ctx,
                INFO,
                event_names::CONFIG_DEFAULT_USED,
                Stage::Init,
                "Using bundled default catalog"
            );
            default_catalog()
        }
    };
    validate_catalog(&catalog).map_err(|e| Error::SchemaValidation(e.to_string()))?;
    log_event!(ctx, INFO, event_names::CONFIG_LOADED, Stage::Init, "Catalog loaded");
    Ok(catalog)
}

fn print_human_report(report: &PlanReport) {
    println!("Ranked actions:");
    for r in &report.results {
        println!(
            "  {:<18} success_rate={:.3} strategy_score={:.3} avg_steps={:.2} visits={} guaranteed_safe={}",
            r.key, r.success_rate, r.strategy_score, r.avg_steps, r.visits, r.guaranteed_safe
        );
    }

    match &report.best_action {
        Some(best) => println!("\nBest action: {} (visits={})", best.key, best.visits),
        None => println!("\nBest action: none (no safe action exists)"),
    }

    println!("\nSequence: {}", report.sequence.join(" -> "));

    println!("\nTrip distribution:");
    for bucket in &report.trip_distribution {
        println!("  {} trips: {:.1}%", bucket.trips, bucket.pct * 100.0);
    }
}

fn exit_code_for(err: &Error) -> ExitCode {
    match err {
        Error::Config(_) | Error::InvalidPolicy(_) | Error::SchemaValidation(_) => ExitCode::ConfigError,
        Error::InvalidBelief { .. }
        | Error::InvalidMassUsed(_)
        | Error::InconsistentObservation { .. }
        | Error::EmptyCatalog
        | Error::UnknownAction(_) => ExitCode::InputError,
        Error::Io(_) => ExitCode::IoError,
        Error::Json(_) => ExitCode::InputError,
    }
}

fn report_error(err: &Error, as_json: bool) {
    if as_json {
        let structured = StructuredError::from(err);
        eprintln!("{}", structured.to_json());
    } else {
        eprintln!("{}", format_error_human(err, std::io::IsTerminal::is_terminal(&std::io::stderr())));
    }
}
