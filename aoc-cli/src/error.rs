//! Error types for the CLI

use aoc_runner::{ConfigurationError, SolverError};
use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Command line does not describe a runnable selection
    #[error("Configuration error: {0}")]
    Config(String),

    /// Descriptor, preset or argument value problem
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Preparing or running solvers failed
    #[error(transparent)]
    Solver(#[from] SolverError),
}
