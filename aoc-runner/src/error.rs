//! Error types for the runner library
//!
//! Everything an adapter, the execution engine, or the orchestrator can fail
//! with is a [`SolverError`], so callers handle failures uniformly.

use crate::backend::presets::PresetKind;
use crate::id::{Backend, PuzzlePartId, SolverId};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Common error type for every failure in the runner
#[derive(Debug, Error)]
pub enum SolverError {
    /// Static descriptor or preset data is malformed or incomplete
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A build or sync step failed
    #[error(transparent)]
    Prepare(#[from] PrepareError),

    /// A solver process failed or broke the output contract
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Worker pool could not be created
    #[error("Thread pool creation failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Static data problems, detected before any process is spawned
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Descriptor file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor file is not valid TOML or has an unexpected shape
    #[error("Malformed descriptor {}: {source}", path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A year, day or part key could not be parsed
    #[error("Invalid {what} key {key:?} in {}", path.display())]
    InvalidKey {
        path: PathBuf,
        what: &'static str,
        key: String,
    },

    #[error("Invalid part {0}: must be 1 or 2")]
    InvalidPart(u8),

    #[error("Invalid verbosity {0}: must be 0, 1 or 2")]
    InvalidVerbosity(u8),

    #[error("Unknown backend: {0:?}")]
    UnknownBackend(String),

    #[error("Invalid solver id: {0:?}")]
    InvalidSolverId(String),

    /// A catalog entry lists no backends
    #[error("No backends listed for {0}")]
    EmptyBackendList(PuzzlePartId),

    /// A requested puzzle part has no catalog entry
    #[error("No solver configured for {0}")]
    CatalogLookup(PuzzlePartId),

    /// A known answer exists for a part the catalog does not know
    #[error("Known answer for {0} has no solver configured")]
    MissingCatalogEntry(PuzzlePartId),

    /// A puzzle part is configured, but not for the requested backend
    #[error("No {backend} solver configured for {part_id}")]
    NoSolverForBackend {
        part_id: PuzzlePartId,
        backend: Backend,
    },

    #[error("Duplicate solver id: {0}")]
    DuplicateSolverId(SolverId),

    /// CMake preset file is not valid JSON or has an unexpected shape
    #[error("Malformed preset file {}: {source}", path.display())]
    PresetFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} preset not found: {name}")]
    PresetNotFound { kind: PresetKind, name: String },

    #[error("Workflow preset {0} has no configure step")]
    WorkflowWithoutConfigure(String),

    /// No preset in the inherit chain declares a binary directory
    #[error("binaryDir not found for configure preset {0}")]
    BinaryDirNotFound(String),

    #[error("Configure preset inheritance cycle: {}", .0.join(" -> "))]
    PresetCycle(Vec<String>),

    /// Launch info requested for a solver whose backend was never prepared
    #[error("{id} requested before the {backend} backend was prepared")]
    NotPrepared { backend: Backend, id: SolverId },

    /// No adapter manages the given solver
    #[error("No backend adapter manages {0}")]
    UnmanagedSolver(SolverId),
}

/// A build or sync step exited unsuccessfully
///
/// `code` is `None` when the tool could not be launched or was killed by a
/// signal; `output` then holds whatever explains it.
#[derive(Debug)]
pub struct PrepareError {
    pub backend: Backend,
    pub step: String,
    pub code: Option<i32>,
    pub output: String,
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Solver prepare failed for {}: {}", self.backend, self.step)?;
        if let Some(code) = self.code {
            write!(f, ". Return code: {code}")?;
        }
        let output = self.output.trim();
        if !output.is_empty() {
            let divider = divider(&[output]);
            write!(f, "\nOutput:\n{divider}\n{output}\n{divider}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PrepareError {}

/// Failures of a single solver execution
#[derive(Debug, Error)]
pub enum ExecError {
    /// Puzzle input could not be opened
    #[error("Failed to open input for {id} at {}: {source}", path.display())]
    Input {
        id: SolverId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Solver process could not be started
    #[error("Failed to launch solver {id} ({program}): {source}")]
    Spawn {
        id: SolverId,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the solver process failed
    #[error("Failed while waiting for solver {id}: {source}")]
    Wait {
        id: SolverId,
        #[source]
        source: std::io::Error,
    },

    /// Solver exited unsuccessfully
    #[error("{}", render_failure(.id, .code, .stdout, .stderr))]
    Failed {
        id: SolverId,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Solver output was not exactly one line with exactly one token
    #[error("ERROR: Malformed solver output - {id} - {reason}\nStdout:\n{stdout}")]
    MalformedOutput {
        id: SolverId,
        reason: &'static str,
        stdout: String,
    },
}

fn render_failure(id: &SolverId, code: &Option<i32>, stdout: &str, stderr: &str) -> String {
    let mut ret = match code {
        Some(code) => format!("ERROR: Solver failure - {id} - Return code: {code}"),
        None => format!("ERROR: Solver failure - {id} - Terminated by signal"),
    };
    let divider = divider(&[stderr, stdout]);
    if !stderr.is_empty() {
        ret.push_str(&format!("\nStderr:\n{divider}\n{stderr}\n{divider}"));
    }
    if !stdout.is_empty() {
        ret.push_str(&format!("\nStdout:\n{divider}\n{stdout}\n{divider}"));
    }
    ret
}

/// Divider as wide as the longest output line, capped at the terminal width
fn divider(outputs: &[&str]) -> String {
    let longest = outputs
        .iter()
        .flat_map(|output| output.lines())
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    "-".repeat(longest.min(terminal_width()))
}

fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse().ok())
        .filter(|&columns| columns > 0)
        .unwrap_or(80)
}
