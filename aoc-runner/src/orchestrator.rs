//! Concurrent preparation and execution of a set of solvers
//!
//! A run goes through two phases on one worker pool. All backends prepare
//! concurrently and the run only continues once every one of them is ready.
//! Then every solver is launched as its own task and results are handed to
//! the caller in completion order.

use crate::answer::{Answer, AnswerStore};
use crate::backend::{self, BackendAdapter, ExecInfo};
use crate::context::RunContext;
use crate::error::{ConfigurationError, SolverError};
use crate::exec::{self, ExecOptions, ExecResult};
use crate::id::{Backend, SolverId};
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Lifecycle of an [`Orchestrator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Preparing,
    Executing,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Preparing => "preparing",
            RunState::Executing => "executing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of one solver run, with the known answer attached
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub id: SolverId,
    pub answer: Answer,
    pub duration: Duration,
    pub correct_answer: Option<Answer>,
    pub logs: Option<Vec<String>>,
}

impl SolverResult {
    /// Attach the known answer to an execution result
    ///
    /// In a dry run the produced answer is recorded as the known one.
    pub fn from_exec(exec: ExecResult, answers: &AnswerStore, dry_run: bool) -> Self {
        let correct_answer = if dry_run {
            Some(exec.answer.clone())
        } else {
            answers.get(&exec.id.part_id()).cloned()
        };
        Self {
            id: exec.id,
            answer: exec.answer,
            duration: exec.duration,
            correct_answer,
            logs: exec.logs,
        }
    }

    pub fn correct(&self) -> bool {
        self.correct_answer.as_ref() == Some(&self.answer)
    }

    pub fn incorrect(&self) -> bool {
        self.correct_answer
            .as_ref()
            .is_some_and(|correct| *correct != self.answer)
    }
}

/// Prepares and runs a fixed set of solvers
pub struct Orchestrator<'a> {
    ids: Vec<SolverId>,
    adapters: Vec<Box<dyn BackendAdapter>>,
    ctx: &'a RunContext,
    jobs: Option<usize>,
    state: RunState,
}

impl<'a> Orchestrator<'a> {
    /// Build one adapter per backend present in `ids`
    pub fn new(ids: Vec<SolverId>, ctx: &'a RunContext) -> Result<Self, SolverError> {
        let by_backend = ids.iter().copied().into_group_map_by(|id| id.backend);
        let adapters = Backend::ALL
            .iter()
            .filter_map(|backend| by_backend.get(backend).map(|ids| (*backend, ids)))
            .map(|(backend, ids)| backend::create_adapter(backend, ids, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_adapters(ids, adapters, ctx)
    }

    /// Use the given adapters instead of the built-in ones
    ///
    /// Every id must be served by one of `adapters`.
    pub fn with_adapters(
        ids: Vec<SolverId>,
        adapters: Vec<Box<dyn BackendAdapter>>,
        ctx: &'a RunContext,
    ) -> Result<Self, SolverError> {
        check_unique(&ids)?;
        if let Some(id) = ids
            .iter()
            .find(|id| !adapters.iter().any(|adapter| adapter.backend() == id.backend))
        {
            return Err(ConfigurationError::UnmanagedSolver(*id).into());
        }
        Ok(Self {
            ids,
            adapters,
            ctx,
            jobs: None,
            state: RunState::Idle,
        })
    }

    /// Cap the worker pool size; defaults to one worker per solver
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn ids(&self) -> &[SolverId] {
        &self.ids
    }

    /// Prepare every backend, then run every solver
    ///
    /// `on_result` sees each result as soon as its solver exits. The first
    /// failure ends the run: solvers already launched still run to completion
    /// before this returns, but their results are dropped.
    pub fn run(
        &mut self,
        options: &ExecOptions,
        on_result: impl FnMut(SolverResult),
    ) -> Result<(), SolverError> {
        let result = self.run_phases(options, on_result);
        self.state = match &result {
            Ok(()) => RunState::Done,
            Err(e) => {
                error!("Run failed while {}: {}", self.state, e);
                RunState::Failed
            }
        };
        result
    }

    fn run_phases(
        &mut self,
        options: &ExecOptions,
        on_result: impl FnMut(SolverResult),
    ) -> Result<(), SolverError> {
        let threads = self.jobs.unwrap_or(self.ids.len()).max(1);
        debug!("Worker pool size: {}", threads);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;

        self.state = RunState::Preparing;
        self.prepare(&pool, options.dry_run)?;

        self.state = RunState::Executing;
        let infos = self
            .ids
            .iter()
            .map(|id| self.exec_info(id).map(|info| (*id, info)))
            .collect::<Result<Vec<_>, _>>()?;
        info!("Running {} solver(s)", infos.len());
        self.execute_all(&pool, infos, options, on_result)
    }

    fn prepare(&mut self, pool: &rayon::ThreadPool, dry_run: bool) -> Result<(), SolverError> {
        let skip = self.ctx.settings().skip_prepare;
        if skip {
            info!("Skipping backend preparation, locating existing artifacts");
        }
        // Wait for every adapter, then report the first failure in backend order
        let results: Vec<_> = pool.install(|| {
            self.adapters
                .par_iter_mut()
                .map(|adapter| {
                    if skip {
                        return adapter.locate(dry_run);
                    }
                    info!("Preparing {}", adapter.backend());
                    adapter.prepare(dry_run)
                })
                .collect()
        });
        results.into_iter().collect()
    }

    fn exec_info(&self, id: &SolverId) -> Result<ExecInfo, SolverError> {
        self.adapters
            .iter()
            .find(|adapter| adapter.backend() == id.backend)
            .ok_or(ConfigurationError::UnmanagedSolver(*id))?
            .exec_info(id)
    }

    fn execute_all(
        &self,
        pool: &rayon::ThreadPool,
        infos: Vec<(SolverId, ExecInfo)>,
        options: &ExecOptions,
        mut on_result: impl FnMut(SolverResult),
    ) -> Result<(), SolverError> {
        let inputs = self.ctx.inputs();
        let answers = self.ctx.answers();
        let options = *options;

        pool.in_place_scope(|scope| {
            let (tx, rx) = mpsc::channel();
            for (id, info) in infos {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    // The receiver is gone once a sibling failed
                    tx.send(exec::execute(id, info, inputs, options)).ok();
                });
            }
            drop(tx);

            for received in rx {
                let exec = received?;
                on_result(SolverResult::from_exec(exec, answers, options.dry_run));
            }
            Ok(())
        })
    }
}

fn check_unique(ids: &[SolverId]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::with_capacity(ids.len());
    match ids.iter().find(|id| !seen.insert(**id)) {
        Some(id) => Err(ConfigurationError::DuplicateSolverId(*id)),
        None => Ok(()),
    }
}
