//! Execution of a single solver process

use crate::answer::Answer;
use crate::backend::ExecInfo;
use crate::error::{ConfigurationError, ExecError};
use crate::id::SolverId;
use crate::inputs::InputProvider;
use std::io;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// Solver verbosity, passed as the second to last argument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    #[default]
    Quiet,
    Info,
    Debug,
}

impl Verbosity {
    pub fn level(self) -> u8 {
        match self {
            Verbosity::Quiet => 0,
            Verbosity::Info => 1,
            Verbosity::Debug => 2,
        }
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Verbosity::Quiet),
            1 => Ok(Verbosity::Info),
            2 => Ok(Verbosity::Debug),
            other => Err(ConfigurationError::InvalidVerbosity(other)),
        }
    }
}

/// How solvers are launched in one run
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    pub verbosity: Verbosity,
    /// `echo` the command line instead of running the solver
    pub dry_run: bool,
    /// Collect stderr as log lines instead of letting it through
    pub capture_stderr: bool,
}

impl ExecOptions {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Self::default()
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn capture_stderr(mut self, capture_stderr: bool) -> Self {
        self.capture_stderr = capture_stderr;
        self
    }
}

/// Outcome of one successful solver run
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub id: SolverId,
    pub answer: Answer,
    pub duration: Duration,
    /// Captured stderr lines; `None` when stderr was not captured
    pub logs: Option<Vec<String>>,
}

/// Run one solver with its puzzle input on stdin
pub fn execute(
    id: SolverId,
    info: ExecInfo,
    inputs: &InputProvider,
    options: ExecOptions,
) -> Result<ExecResult, ExecError> {
    if info.args.is_empty() {
        return Err(ExecError::Spawn {
            id,
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
        });
    }
    let input = inputs.open(&id)?;

    let mut args = Vec::with_capacity(info.args.len() + 3);
    if options.dry_run {
        args.push("echo".to_string());
    }
    args.extend(info.args);
    args.push(options.verbosity.level().to_string());
    args.push(id.part.number().to_string());
    let (program, rest) = (&args[0], &args[1..]);

    let mut command = Command::new(program);
    command
        .args(rest)
        .current_dir(&info.cwd)
        .stdin(Stdio::from(input))
        .stdout(Stdio::piped())
        .stderr(if options.capture_stderr {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
    info.env.apply(&mut command);

    debug!("Launching solver: '{}'", args.join(" "));
    debug!("Working directory: {}", info.cwd.display());
    let start = Instant::now();
    let child = command.spawn().map_err(|source| ExecError::Spawn {
        id,
        program: program.clone(),
        source,
    })?;
    let output = child
        .wait_with_output()
        .map_err(|source| ExecError::Wait { id, source })?;
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    debug!("{}: Return code: {:?}", id, output.status.code());
    debug!("{}: Stdout: {}", id, stdout);
    debug!("{}: Stderr: {}", id, stderr);

    if !output.status.success() {
        return Err(ExecError::Failed {
            id,
            code: output.status.code(),
            stdout,
            stderr,
        });
    }

    let answer = if options.dry_run {
        Answer::Int(0)
    } else {
        parse_answer(&stdout).map_err(|reason| ExecError::MalformedOutput {
            id,
            reason,
            stdout: stdout.clone(),
        })?
    };

    let logs = options
        .capture_stderr
        .then(|| stderr.lines().map(String::from).collect());

    Ok(ExecResult {
        id,
        answer,
        duration,
        logs,
    })
}

/// Extract the answer from trimmed solver stdout
///
/// Exactly one line holding exactly one whitespace-delimited token is
/// accepted; every other shape is rejected rather than coerced.
pub fn parse_answer(stdout: &str) -> Result<Answer, &'static str> {
    let mut lines = stdout.lines();
    let (Some(line), None) = (lines.next(), lines.next()) else {
        return Err("expected exactly one output line");
    };
    let mut tokens = line.split_whitespace();
    let (Some(token), None) = (tokens.next(), tokens.next()) else {
        return Err("expected exactly one token on the output line");
    };
    Ok(Answer::parse(token))
}
