//! Python backend: a uv-managed project, one module per puzzle day

use super::{BackendAdapter, EnvAdjustment, ExecInfo};
use crate::command::ToolCommand;
use crate::error::SolverError;
use crate::id::{Backend, SolverId};
use std::path::PathBuf;
use tracing::info;

/// An inherited virtualenv would make uv resolve the caller's environment
/// instead of the project's own.
const VIRTUAL_ENV: &str = "VIRTUAL_ENV";

pub struct PythonAdapter {
    root: PathBuf,
}

impl PythonAdapter {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Fully qualified module of a solver, e.g. `aoc.y2023.d07`
    pub fn module_name(id: &SolverId) -> String {
        format!("aoc.y{}.d{:02}", id.year, id.day)
    }

    fn environment() -> EnvAdjustment {
        EnvAdjustment::default().remove(VIRTUAL_ENV)
    }
}

impl BackendAdapter for PythonAdapter {
    fn backend(&self) -> Backend {
        Backend::Python
    }

    fn prepare(&mut self, dry_run: bool) -> Result<(), SolverError> {
        info!("uv sync");
        ToolCommand::mise(
            Backend::Python,
            "uv sync",
            &self.root,
            ["uv", "sync", "--inexact", "--frozen"],
        )
        .env(Self::environment())
        .run(dry_run)?;
        Ok(())
    }

    fn exec_info(&self, id: &SolverId) -> Result<ExecInfo, SolverError> {
        let args = ["mise", "exec", "--", "uv", "run", "python", "-m"]
            .into_iter()
            .map(String::from)
            .chain([Self::module_name(id)])
            .collect();
        Ok(ExecInfo::new(args, &self.root).with_env(Self::environment()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Part;

    #[test]
    fn test_exec_info() {
        let adapter = PythonAdapter::new(PathBuf::from("/repo/solvers/python"));
        let id = SolverId::new(2023, 7, Part::Two, Backend::Python);
        let info = adapter.exec_info(&id).unwrap();

        assert_eq!(
            info.args,
            ["mise", "exec", "--", "uv", "run", "python", "-m", "aoc.y2023.d07"]
        );
        assert_eq!(info.cwd, PathBuf::from("/repo/solvers/python"));
        assert_eq!(info.env.vars_removed(), ["VIRTUAL_ENV".to_string()]);
        assert!(info.env.vars_set().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_dry_run_prepare() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut adapter = PythonAdapter::new(temp.path().to_path_buf());
        adapter.prepare(true).unwrap();
    }
}
