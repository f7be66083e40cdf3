//! Puzzle input lookup

use crate::error::ExecError;
use crate::id::{Day, SolverId, Year};
use std::fs::File;
use std::path::PathBuf;

/// Locates puzzle inputs on disk
///
/// Directory structure: `{inputs_dir}/{year}-{day:02}.txt`
#[derive(Debug, Clone)]
pub struct InputProvider {
    inputs_dir: PathBuf,
}

impl InputProvider {
    pub fn new(inputs_dir: PathBuf) -> Self {
        Self { inputs_dir }
    }

    /// Path of the input for a specific year/day
    pub fn input_path(&self, year: Year, day: Day) -> PathBuf {
        self.inputs_dir.join(format!("{}-{:02}.txt", year, day))
    }

    /// Check if the input exists
    pub fn contains(&self, year: Year, day: Day) -> bool {
        self.input_path(year, day).exists()
    }

    /// Open the input for the solver's year/day, ready to become its stdin
    pub fn open(&self, id: &SolverId) -> Result<File, ExecError> {
        let path = self.input_path(id.year, id.day);
        File::open(&path).map_err(|source| ExecError::Input {
            id: *id,
            path,
            source,
        })
    }
}
