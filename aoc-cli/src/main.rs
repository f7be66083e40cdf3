//! AOC CLI - Command-line interface for building, running and verifying solvers

mod cli;
mod config;
mod error;
mod output;

use aoc_runner::{
    ConfigurationError, ExecOptions, Orchestrator, PuzzlePartId, RunContext, RunSummary, SolverId,
};
use clap::Parser;
use cli::Args;
use config::{Config, RunMode};
use error::CliError;
use output::OutputFormatter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbosity);

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity argument
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<i32, CliError> {
    let config = Config::from_args(args)?;
    debug!("Configuration: {:?}", config);
    let ctx = RunContext::load(config.repo_root.clone(), config.settings.clone())?;

    match config.mode {
        RunMode::One(part_id) => {
            let ids = ctx.catalog().resolve_solver_ids([part_id], config.backend)?;
            match ids.len() {
                0 => Err(no_solver(part_id, &config)),
                1 => run_single(ids[0], &ctx, &config),
                _ => run_many(ids, &ctx, &config),
            }
        }
        RunMode::Day { year, day } => {
            let part_ids = ctx.answers().part_ids_for_day(year, day);
            let ids = ctx.catalog().resolve_solver_ids(part_ids, config.backend)?;
            run_many(ids, &ctx, &config)
        }
        RunMode::All => {
            let ids = ctx
                .catalog()
                .resolve_solver_ids(ctx.answers().part_ids(), config.backend)?;
            run_many(ids, &ctx, &config)
        }
    }
}

fn no_solver(part_id: PuzzlePartId, config: &Config) -> CliError {
    match config.backend {
        Some(backend) => ConfigurationError::NoSolverForBackend { part_id, backend }.into(),
        None => ConfigurationError::CatalogLookup(part_id).into(),
    }
}

/// Run several solvers, printing each result as it completes
fn run_many(ids: Vec<SolverId>, ctx: &RunContext, config: &Config) -> Result<i32, CliError> {
    debug!("Solver ids: {:?}", ids);
    let formatter = OutputFormatter::new();
    let mut summary = RunSummary::default();
    let options = ExecOptions::new(config.verbosity)
        .dry_run(config.dry_run)
        .capture_stderr(true);

    let mut orchestrator = Orchestrator::new(ids, ctx)?.jobs(config.jobs);
    orchestrator.run(&options, |result| {
        formatter.print_result(&result);
        summary.record(&result);
    })?;

    formatter.print_summary(&summary);
    Ok(summary.exit_code())
}

/// Run one solver with its stderr passed straight through
fn run_single(id: SolverId, ctx: &RunContext, config: &Config) -> Result<i32, CliError> {
    debug!("Solver id: {}", id);
    let formatter = OutputFormatter::new();
    let options = ExecOptions::new(config.verbosity).dry_run(config.dry_run);

    let mut result = None;
    let mut orchestrator = Orchestrator::new(vec![id], ctx)?.jobs(config.jobs);
    orchestrator.run(&options, |r| result = Some(r))?;

    match result {
        Some(result) => Ok(formatter.print_single(&result)),
        None => Err(CliError::Config(format!("Solver {id} produced no result"))),
    }
}
