//! Build tool invocation shared by every backend adapter

use crate::backend::EnvAdjustment;
use crate::error::PrepareError;
use crate::id::Backend;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, error};

/// Captured output of a successful tool run
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// One toolchain command, e.g. `mise exec -- cmake --preset aoc`
///
/// `step` describes the command in error messages.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    backend: Backend,
    step: String,
    args: Vec<String>,
    cwd: PathBuf,
    env: EnvAdjustment,
}

impl ToolCommand {
    pub fn new(
        backend: Backend,
        step: impl Into<String>,
        cwd: impl Into<PathBuf>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            backend,
            step: step.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            env: EnvAdjustment::default(),
        }
    }

    /// Run `tool_args` through `mise exec --` so the pinned tool versions are used
    pub fn mise(
        backend: Backend,
        step: impl Into<String>,
        cwd: impl Into<PathBuf>,
        tool_args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let args = ["mise", "exec", "--"]
            .into_iter()
            .map(String::from)
            .chain(tool_args.into_iter().map(Into::into));
        Self::new(backend, step, cwd, args)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, env: EnvAdjustment) -> Self {
        self.env = env;
        self
    }

    /// Full argument vector, `echo`-prefixed for dry runs
    pub fn command_line(&self, dry_run: bool) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        if dry_run {
            args.push("echo".to_string());
        }
        args.extend(self.args.iter().cloned());
        args
    }

    /// Run to completion, capturing stdout and stderr
    pub fn run(&self, dry_run: bool) -> Result<ToolOutput, PrepareError> {
        let args = self.command_line(dry_run);
        let Some((program, rest)) = args.split_first() else {
            return Err(self.failure(None, "empty command line".to_string()));
        };
        debug!("{}: {}", self.step, args.join(" "));

        let mut command = Command::new(program);
        command
            .args(rest)
            .current_dir(&self.cwd)
            .stdin(Stdio::null());
        self.env.apply(&mut command);

        let output = command
            .output()
            .map_err(|e| self.failure(None, format!("failed to launch {program}: {e}")))?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let combined = [stdout.trim(), stderr.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            error!("{} failed: {}", self.step, combined);
            return Err(self.failure(output.status.code(), combined));
        }
        Ok(ToolOutput { stdout, stderr })
    }

    fn failure(&self, code: Option<i32>, output: String) -> PrepareError {
        PrepareError {
            backend: self.backend,
            step: self.step.clone(),
            code,
            output,
        }
    }
}
