//! Backend adapters: one per toolchain
//!
//! An adapter knows how to get its toolchain ready ([`BackendAdapter::prepare`])
//! and how to launch one of its solvers ([`BackendAdapter::exec_info`]). The
//! orchestrator creates one adapter per backend present in a run, never one
//! per solver.

mod cpp;
pub(crate) mod presets;
mod python;
mod rust;

pub use cpp::CppAdapter;
pub use presets::{LayeredPresets, PresetKind, PresetSelection};
pub use python::PythonAdapter;
pub use rust::RustAdapter;

use crate::context::RunContext;
use crate::error::SolverError;
use crate::id::{Backend, Day, SolverId, Year};
use std::path::PathBuf;
use std::process::Command;

/// Toolchain preparation and solver launch description
pub trait BackendAdapter: Send + Sync {
    /// Backend this adapter serves
    fn backend(&self) -> Backend;

    /// Configure, build or sync whatever the managed solvers need
    ///
    /// Called once per run. With `dry_run` every tool command is built as usual
    /// but `echo`ed instead of executed.
    fn prepare(&mut self, dry_run: bool) -> Result<(), SolverError>;

    /// Find artifacts of an earlier preparation without rebuilding them
    ///
    /// Used instead of `prepare` when preparation is skipped. Adapters that
    /// derive every path from configuration have nothing to do here.
    fn locate(&mut self, _dry_run: bool) -> Result<(), SolverError> {
        Ok(())
    }

    /// Launch descriptor for a solver, valid once `prepare` or `locate` has
    /// succeeded
    fn exec_info(&self, id: &SolverId) -> Result<ExecInfo, SolverError>;
}

/// Environment changes applied on top of the inherited environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvAdjustment {
    set: Vec<(String, String)>,
    remove: Vec<String>,
}

impl EnvAdjustment {
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.push((key.into(), value.into()));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.remove.push(key.into());
        self
    }

    pub fn vars_set(&self) -> &[(String, String)] {
        &self.set
    }

    pub fn vars_removed(&self) -> &[String] {
        &self.remove
    }

    pub fn apply(&self, command: &mut Command) {
        for key in &self.remove {
            command.env_remove(key);
        }
        for (key, value) in &self.set {
            command.env(key, value);
        }
    }
}

/// How to launch one solver
///
/// The execution engine appends the verbosity and part to `args`, runs the
/// result from `cwd` and applies `env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecInfo {
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: EnvAdjustment,
}

impl ExecInfo {
    pub fn new(args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            args,
            cwd: cwd.into(),
            env: EnvAdjustment::default(),
        }
    }

    pub fn with_env(mut self, env: EnvAdjustment) -> Self {
        self.env = env;
        self
    }
}

/// Create the adapter for `backend`, managing `ids`
///
/// Construction only reads configuration; it never spawns a process.
pub fn create_adapter(
    backend: Backend,
    ids: &[SolverId],
    ctx: &RunContext,
) -> Result<Box<dyn BackendAdapter>, SolverError> {
    let root = ctx.layout().solver_root(backend);
    let settings = ctx.settings();
    Ok(match backend {
        Backend::Cpp => Box::new(CppAdapter::new(root, ids, settings)?),
        Backend::Python => Box::new(PythonAdapter::new(root)),
        Backend::Rust => Box::new(RustAdapter::new(root, ids, settings)),
    })
}

/// A native executable: one per puzzle day, shared by both parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct BinaryTarget {
    pub year: Year,
    pub day: Day,
}

impl BinaryTarget {
    pub fn of(id: &SolverId) -> Self {
        Self {
            year: id.year,
            day: id.day,
        }
    }

    /// Build target and executable stem, e.g. `y2022_d01`
    pub fn name(&self) -> String {
        format!("y{}_d{:02}", self.year, self.day)
    }

    /// Distinct targets of `ids`, sorted
    pub fn distinct(ids: &[SolverId]) -> Vec<Self> {
        let mut targets: Vec<_> = ids.iter().map(Self::of).collect();
        targets.sort();
        targets.dedup();
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Part;

    #[test]
    fn test_binary_target_name() {
        let id = SolverId::new(2022, 1, Part::Two, Backend::Rust);
        assert_eq!(BinaryTarget::of(&id).name(), "y2022_d01");
    }

    #[test]
    fn test_distinct_targets_merge_parts() {
        let ids = [
            SolverId::new(2024, 6, Part::Two, Backend::Rust),
            SolverId::new(2024, 5, Part::One, Backend::Rust),
            SolverId::new(2024, 6, Part::One, Backend::Rust),
        ];
        let names: Vec<_> = BinaryTarget::distinct(&ids).iter().map(BinaryTarget::name).collect();
        assert_eq!(names, ["y2024_d05", "y2024_d06"]);
    }

    #[test]
    fn test_env_adjustment_records_changes() {
        let env = EnvAdjustment::default()
            .set("RUST_BACKTRACE", "1")
            .remove("VIRTUAL_ENV");
        assert_eq!(env.vars_set(), [("RUST_BACKTRACE".to_string(), "1".to_string())]);
        assert_eq!(env.vars_removed(), ["VIRTUAL_ENV".to_string()]);
    }
}
