//! Process-wide state shared by every run: repository layout, catalog,
//! known answers and backend settings

use crate::answer::AnswerStore;
use crate::catalog::SolverCatalog;
use crate::error::ConfigurationError;
use crate::id::Backend;
use crate::inputs::InputProvider;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where things live inside the solutions repository
#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Known-answer descriptor
    pub fn answers_path(&self) -> PathBuf {
        self.root.join("answers.toml")
    }

    /// Solver catalog descriptor
    pub fn solvers_path(&self) -> PathBuf {
        self.root.join("solvers.toml")
    }

    pub fn inputs_dir(&self) -> PathBuf {
        self.root.join("inputs")
    }

    /// Project directory of one toolchain; solvers also run from here
    pub fn solver_root(&self, backend: Backend) -> PathBuf {
        self.root.join("solvers").join(backend.name())
    }
}

/// Backend knobs, normally taken from the environment
#[derive(Debug, Clone, Default)]
pub struct BackendSettings {
    /// Configure preset used when no workflow preset is given
    pub cpp_configure_preset: Option<String>,
    /// Workflow preset pinning the configure/build presets of an external build
    pub cpp_workflow_preset: Option<String>,
    /// Extra `cargo build` flags, whitespace separated
    pub rust_build_args: Option<String>,
    /// Skip every prepare step and assume build artifacts are present
    pub skip_prepare: bool,
}

/// Everything loaded once at startup and then only read
#[derive(Debug)]
pub struct RunContext {
    layout: RepoLayout,
    catalog: SolverCatalog,
    answers: AnswerStore,
    inputs: InputProvider,
    settings: BackendSettings,
}

impl RunContext {
    /// Load descriptors from the repository at `root`
    ///
    /// Fails fast when a known answer has no catalog entry.
    pub fn load(
        root: impl Into<PathBuf>,
        settings: BackendSettings,
    ) -> Result<Self, ConfigurationError> {
        let layout = RepoLayout::new(root);
        debug!("Loading descriptors from {}", layout.root().display());
        let catalog = SolverCatalog::load(&layout.solvers_path())?;
        let answers = AnswerStore::load(&layout.answers_path())?;
        Self::new(layout, catalog, answers, settings)
    }

    /// Assemble a context from already loaded parts
    pub fn new(
        layout: RepoLayout,
        catalog: SolverCatalog,
        answers: AnswerStore,
        settings: BackendSettings,
    ) -> Result<Self, ConfigurationError> {
        if let Some(orphan) = answers.part_ids().find(|id| !catalog.contains(id)) {
            return Err(ConfigurationError::MissingCatalogEntry(orphan));
        }
        let inputs = InputProvider::new(layout.inputs_dir());
        Ok(Self {
            layout,
            catalog,
            answers,
            inputs,
            settings,
        })
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &SolverCatalog {
        &self.catalog
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn inputs(&self) -> &InputProvider {
        &self.inputs
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }
}
