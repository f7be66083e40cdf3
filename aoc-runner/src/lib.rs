//! Advent of Code Runner Library
//!
//! Builds and runs Advent of Code solvers written for several toolchains, then
//! checks their answers against a store of known answers.
//!
//! # Overview
//!
//! This library provides:
//! - Identifiers for puzzle parts and for concrete solvers ([`PuzzlePartId`], [`SolverId`])
//! - A solver catalog and a known-answer store loaded once from TOML descriptors
//! - One [`BackendAdapter`] per toolchain (`cpp`, `python`, `rust`) that prepares
//!   the toolchain and describes how to launch each solver
//! - An execution engine that runs one solver process with its puzzle input on stdin
//! - An [`Orchestrator`] that prepares every backend concurrently, runs every
//!   solver concurrently, and hands back results as they complete
//!
//! # Quick Example
//!
//! ```no_run
//! use aoc_runner::{
//!     BackendSettings, ExecOptions, Orchestrator, PuzzlePartId, RunContext, RunSummary, Verbosity,
//! };
//!
//! # fn main() -> Result<(), aoc_runner::SolverError> {
//! let ctx = RunContext::load(".", BackendSettings::default())?;
//! let part_ids: Vec<PuzzlePartId> = ctx.answers().part_ids().collect();
//! let ids = ctx.catalog().resolve_solver_ids(part_ids, None)?;
//!
//! let mut summary = RunSummary::default();
//! let mut orchestrator = Orchestrator::new(ids, &ctx)?;
//! orchestrator.run(&ExecOptions::new(Verbosity::Quiet), |result| {
//!     summary.record(&result);
//! })?;
//! std::process::exit(summary.exit_code());
//! # }
//! ```
//!
//! # Solver wire contract
//!
//! Every solver executable, whatever its toolchain, is launched the same way:
//! - stdin carries the full puzzle input
//! - the last two arguments are the verbosity (`0`-`2`) and the part (`1` or `2`)
//! - stdout must be exactly one line holding exactly one token: the answer
//! - stderr is a free-form log, only collected when requested

mod answer;
pub mod backend;
mod catalog;
mod command;
mod context;
mod descriptor;
mod error;
mod exec;
mod id;
mod inputs;
mod orchestrator;
mod summary;

// Re-export public API
pub use answer::{Answer, AnswerStore};
pub use backend::{BackendAdapter, EnvAdjustment, ExecInfo, create_adapter};
pub use catalog::SolverCatalog;
pub use command::{ToolCommand, ToolOutput};
pub use context::{BackendSettings, RepoLayout, RunContext};
pub use error::{ConfigurationError, ExecError, PrepareError, SolverError};
pub use exec::{ExecOptions, ExecResult, Verbosity, execute, parse_answer};
pub use id::{Backend, Day, Part, PuzzlePartId, SolverId, Year};
pub use inputs::InputProvider;
pub use orchestrator::{Orchestrator, RunState, SolverResult};
pub use summary::RunSummary;
