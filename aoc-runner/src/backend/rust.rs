//! Rust backend: one cargo binary per puzzle day

use super::{BackendAdapter, BinaryTarget, EnvAdjustment, ExecInfo};
use crate::command::ToolCommand;
use crate::context::BackendSettings;
use crate::error::{ConfigurationError, PrepareError, SolverError};
use crate::id::{Backend, SolverId};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Build flags used when `AOC_RUST_BUILD_ARGS` is not set
pub const DEFAULT_BUILD_ARGS: &str = "--release --quiet";

/// Whether the solver library is built before the binaries
const NEEDS_LIBRARY_BUILD: bool = true;

pub struct RustAdapter {
    root: PathBuf,
    build_args: Vec<String>,
    targets: Vec<BinaryTarget>,
    /// Filled by `prepare` or `locate`
    executables: HashMap<BinaryTarget, PathBuf>,
}

impl RustAdapter {
    pub fn new(root: PathBuf, ids: &[SolverId], settings: &BackendSettings) -> Self {
        let build_args = settings
            .rust_build_args
            .as_deref()
            .unwrap_or(DEFAULT_BUILD_ARGS)
            .split_whitespace()
            .map(String::from)
            .collect();
        Self {
            root,
            build_args,
            targets: BinaryTarget::distinct(ids),
            executables: HashMap::new(),
        }
    }

    fn cargo_build(&self, step: String, selector: String) -> ToolCommand {
        let args = ["cargo".to_string(), "build".to_string(), selector]
            .into_iter()
            .chain(self.build_args.iter().cloned());
        ToolCommand::mise(Backend::Rust, step, &self.root, args)
    }

    fn build_library(&self, dry_run: bool) -> Result<(), SolverError> {
        if !NEEDS_LIBRARY_BUILD {
            return Ok(());
        }
        info!("Building rust library");
        self.cargo_build("Rust library build".to_string(), "--lib".to_string())
            .run(dry_run)?;
        Ok(())
    }

    fn build_binary(&self, target: BinaryTarget, dry_run: bool) -> Result<(), SolverError> {
        let name = target.name();
        info!("Building rust binary for {}", name);
        self.cargo_build(
            format!("Rust binary build of {name}"),
            format!("--bin={name}"),
        )
        .run(dry_run)?;
        Ok(())
    }

    /// Ask cargo where the executable of an already built binary is
    fn locate_binary(&self, target: BinaryTarget, dry_run: bool) -> Result<PathBuf, SolverError> {
        if dry_run {
            return Ok(self.root.join("dry-run-executable"));
        }

        let name = target.name();
        let output = self
            .cargo_build(
                format!("Locating executable of {name}"),
                format!("--bin={name}"),
            )
            .arg("--message-format=json")
            .run(false)?;
        let executable = find_executable(&output.stdout).map_err(|reason| PrepareError {
            backend: Backend::Rust,
            step: format!("Locating executable of {name}"),
            code: None,
            output: reason,
        })?;
        debug!("Rust binary {}: {}", name, executable.display());
        Ok(executable)
    }
}

impl BackendAdapter for RustAdapter {
    fn backend(&self) -> Backend {
        Backend::Rust
    }

    fn prepare(&mut self, dry_run: bool) -> Result<(), SolverError> {
        self.build_library(dry_run)?;
        self.targets
            .par_iter()
            .try_for_each(|&target| self.build_binary(target, dry_run))?;
        self.locate(dry_run)
    }

    fn locate(&mut self, dry_run: bool) -> Result<(), SolverError> {
        let located = self
            .targets
            .par_iter()
            .map(|&target| {
                self.locate_binary(target, dry_run)
                    .map(|executable| (target, executable))
            })
            .collect::<Result<Vec<_>, SolverError>>()?;
        self.executables.extend(located);
        Ok(())
    }

    fn exec_info(&self, id: &SolverId) -> Result<ExecInfo, SolverError> {
        let executable = self
            .executables
            .get(&BinaryTarget::of(id))
            .ok_or(ConfigurationError::NotPrepared {
                backend: Backend::Rust,
                id: *id,
            })?;
        Ok(
            ExecInfo::new(vec![executable.display().to_string()], &self.root)
                .with_env(EnvAdjustment::default().set("RUST_BACKTRACE", "1")),
        )
    }
}

#[derive(Deserialize)]
struct CargoTarget {
    #[serde(default)]
    kind: Vec<String>,
}

/// The subset of a `cargo build --message-format=json` record we need
#[derive(Deserialize)]
struct CargoMessage {
    target: Option<CargoTarget>,
    executable: Option<String>,
}

/// Executable path of the first binary artifact record
fn find_executable(stdout: &str) -> Result<PathBuf, String> {
    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        let message: CargoMessage = serde_json::from_str(line)
            .map_err(|e| format!("unparseable cargo message {line:?}: {e}"))?;
        let is_bin = message
            .target
            .as_ref()
            .and_then(|target| target.kind.first())
            .is_some_and(|kind| kind == "bin");
        if is_bin && let Some(executable) = message.executable {
            return Ok(PathBuf::from(executable));
        }
    }
    Err("cargo reported no binary artifact".to_string())
}
