//! Configuration resolution from CLI args and the environment

use crate::cli::{Args, Mode};
use crate::error::CliError;
use aoc_runner::{Backend, BackendSettings, Day, Part, PuzzlePartId, Verbosity, Year};
use std::path::{Path, PathBuf};

/// Puzzle parts selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    One(PuzzlePartId),
    Day { year: Year, day: Day },
    All,
}

/// Resolved runtime configuration
#[derive(Debug)]
pub struct Config {
    pub mode: RunMode,
    pub verbosity: Verbosity,
    pub dry_run: bool,
    /// Backend filter (None = every configured backend)
    pub backend: Option<Backend>,
    pub repo_root: PathBuf,
    /// Worker pool size (None = one worker per solver)
    pub jobs: Option<usize>,
    pub settings: BackendSettings,
}

impl Config {
    /// Build config from CLI args and the process environment
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Build config with environment variables taken from `lookup`
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let mode = run_mode(args.mode, &args.targets)?;
        let backend = match args.backend.as_str() {
            "" => None,
            name => Some(name.parse()?),
        };

        Ok(Config {
            mode,
            verbosity: Verbosity::try_from(args.verbosity)?,
            dry_run: args.dry_run,
            backend,
            repo_root: expand_tilde(&args.repo_root),
            jobs: args.jobs.map(usize::from),
            settings: backend_settings(lookup),
        })
    }
}

fn run_mode(mode: Mode, targets: &[u16]) -> Result<RunMode, CliError> {
    match (mode, targets) {
        (Mode::One, &[year, day, part]) => {
            let part = u8::try_from(part)
                .map_err(|_| CliError::Config(format!("Invalid part: {part}")))?;
            Ok(RunMode::One(PuzzlePartId::new(
                year,
                to_day(day)?,
                Part::try_from(part)?,
            )))
        }
        (Mode::Day, &[year, day]) => Ok(RunMode::Day {
            year,
            day: to_day(day)?,
        }),
        (Mode::All, []) => Ok(RunMode::All),
        (Mode::One, _) => Err(usage("one", "<year> <day> <part>", targets)),
        (Mode::Day, _) => Err(usage("day", "<year> <day>", targets)),
        (Mode::All, _) => Err(usage("all", "no arguments", targets)),
    }
}

fn to_day(day: u16) -> Result<Day, CliError> {
    Day::try_from(day)
        .ok()
        .filter(|day| (1..=25).contains(day))
        .ok_or_else(|| CliError::Config(format!("Invalid day: {day}")))
}

fn usage(mode: &str, expected: &str, got: &[u16]) -> CliError {
    CliError::Config(format!(
        "Mode '{mode}' takes {expected}, got {} argument(s)",
        got.len()
    ))
}

/// Backend knobs from `AOC_*` environment variables
pub fn backend_settings(lookup: impl Fn(&str) -> Option<String>) -> BackendSettings {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
    BackendSettings {
        cpp_configure_preset: non_empty("AOC_CPP_CONFIGURE_PRESET"),
        cpp_workflow_preset: non_empty("AOC_CPP_WORKFLOW_PRESET"),
        rust_build_args: non_empty("AOC_RUST_BUILD_ARGS"),
        skip_prepare: non_empty("AOC_SKIP_PREPARE")
            .is_some_and(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")),
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && let Some(rest) = path_str.strip_prefix('~')
        && (rest.is_empty() || rest.starts_with('/'))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest.trim_start_matches('/'));
    }
    path.to_path_buf()
}
