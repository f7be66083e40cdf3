//! CLI argument parsing using clap

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Which puzzle parts to run
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Mode {
    /// One part: `one <year> <day> <part>`
    One,
    /// Every part of a day with a known answer: `day <year> <day>`
    Day,
    /// Every part with a known answer
    All,
}

/// Build, run and verify Advent of Code solvers across toolchains
#[derive(Parser, Debug)]
#[command(name = "aoc", about = "Run Advent of Code solvers", version)]
pub struct Args {
    /// Run mode
    #[arg(value_enum)]
    pub mode: Mode,

    /// Solver and log verbosity: 0, 1 or 2
    #[arg(value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbosity: u8,

    /// Echo every command instead of running it
    #[arg(
        action = ArgAction::Set,
        value_parser = PossibleValuesParser::new(["true", "false"]).map(|s| s == "true")
    )]
    pub dry_run: bool,

    /// Only run this backend (cpp, python or rust); empty runs all
    pub backend: String,

    /// Year, day and part, as the mode requires
    #[arg(num_args = 0..)]
    pub targets: Vec<u16>,

    /// Repository holding the descriptors, inputs and solver projects
    #[arg(long, env = "AOC_REPO_ROOT", default_value = ".")]
    pub repo_root: PathBuf,

    /// Worker threads (defaults to one per solver)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,
}
