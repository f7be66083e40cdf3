//! CMake preset resolution
//!
//! Presets come from two layers: `CMakeUserPresets.json` (user level) is
//! consulted before `CMakePresets.json` (project level). A missing file is an
//! empty layer. Configure presets may inherit from other configure presets;
//! the binary directory is found by walking that graph.

use crate::error::ConfigurationError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const USER_PRESETS_FILE: &str = "CMakeUserPresets.json";
pub const PROJECT_PRESETS_FILE: &str = "CMakePresets.json";

/// Kind of preset, matching the `{kind}Presets` arrays of a preset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Configure,
    Build,
    Workflow,
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PresetKind::Configure => "configure",
            PresetKind::Build => "build",
            PresetKind::Workflow => "workflow",
        })
    }
}

/// `inherits` may be a single name or a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Inherits {
    One(String),
    Many(Vec<String>),
}

impl Default for Inherits {
    fn default() -> Self {
        Inherits::Many(Vec::new())
    }
}

impl Inherits {
    fn names(&self) -> &[String] {
        match self {
            Inherits::One(name) => std::slice::from_ref(name),
            Inherits::Many(names) => names,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurePreset {
    name: String,
    #[serde(default)]
    inherits: Inherits,
    binary_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct BuildPreset {
    name: String,
    configuration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WorkflowStep {
    #[serde(rename = "type")]
    kind: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct WorkflowPreset {
    name: String,
    #[serde(default)]
    steps: Vec<WorkflowStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetFile {
    #[serde(default)]
    configure_presets: Vec<ConfigurePreset>,
    #[serde(default)]
    build_presets: Vec<BuildPreset>,
    #[serde(default)]
    workflow_presets: Vec<WorkflowPreset>,
}

/// Which configure preset to use, and the build configuration subdirectory
/// for multi-config generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetSelection {
    pub configure_preset: String,
    pub configuration: Option<String>,
    /// Whether the selection came from a workflow preset
    pub from_workflow: bool,
}

/// User presets layered over project presets
#[derive(Debug, Clone, Default)]
pub struct LayeredPresets {
    user: PresetFile,
    project: PresetFile,
}

impl LayeredPresets {
    /// Load both preset files from a CMake source directory
    pub fn load(source_dir: &Path) -> Result<Self, ConfigurationError> {
        Ok(Self {
            user: load_file(&source_dir.join(USER_PRESETS_FILE))?,
            project: load_file(&source_dir.join(PROJECT_PRESETS_FILE))?,
        })
    }

    /// Build from preset file contents; `None` is a missing file
    pub fn from_json(user: Option<&str>, project: Option<&str>) -> Result<Self, serde_json::Error> {
        let parse = |content: Option<&str>| {
            content.map_or_else(|| Ok(PresetFile::default()), parse_json)
        };
        Ok(Self {
            user: parse(user)?,
            project: parse(project)?,
        })
    }

    fn configure(&self, name: &str) -> Result<&ConfigurePreset, ConfigurationError> {
        find(&self.user.configure_presets, &self.project.configure_presets, |p| {
            p.name == name
        })
        .ok_or_else(|| not_found(PresetKind::Configure, name))
    }

    fn build(&self, name: &str) -> Option<&BuildPreset> {
        find(&self.user.build_presets, &self.project.build_presets, |p| p.name == name)
    }

    fn workflow(&self, name: &str) -> Result<&WorkflowPreset, ConfigurationError> {
        find(&self.user.workflow_presets, &self.project.workflow_presets, |p| {
            p.name == name
        })
        .ok_or_else(|| not_found(PresetKind::Workflow, name))
    }

    /// Pick the configure preset
    ///
    /// Priority: the workflow preset's configure step, then
    /// `configure_override`, then `default_preset`.
    pub fn select(
        &self,
        workflow: Option<&str>,
        configure_override: Option<&str>,
        default_preset: &str,
    ) -> Result<PresetSelection, ConfigurationError> {
        let Some(workflow_name) = workflow else {
            let configure_preset = configure_override.unwrap_or(default_preset).to_string();
            // Validate early so a typo fails before anything is spawned
            self.configure(&configure_preset)?;
            return Ok(PresetSelection {
                configure_preset,
                configuration: None,
                from_workflow: false,
            });
        };

        debug!("Using workflow preset: {}", workflow_name);
        let workflow = self.workflow(workflow_name)?;
        let step = |kind: &str| {
            workflow
                .steps
                .iter()
                .find(|step| step.kind == kind)
                .map(|step| step.name.as_str())
        };
        let configure_preset = step("configure")
            .ok_or_else(|| ConfigurationError::WorkflowWithoutConfigure(workflow_name.to_string()))?
            .to_string();
        self.configure(&configure_preset)?;

        let configuration = step("build")
            .and_then(|name| self.build(name))
            .and_then(|preset| preset.configuration.clone());
        debug!("Resolved build configuration: {:?}", configuration);

        Ok(PresetSelection {
            configure_preset,
            configuration,
            from_workflow: true,
        })
    }

    /// Binary directory of a configure preset, following `inherits`
    ///
    /// Inherited presets are searched depth first in declaration order; the
    /// first `binaryDir` found wins.
    pub fn binary_dir(&self, configure_preset: &str) -> Result<String, ConfigurationError> {
        let mut path = Vec::new();
        let mut exhausted = HashSet::new();
        self.find_binary_dir(configure_preset, &mut path, &mut exhausted)?
            .ok_or_else(|| ConfigurationError::BinaryDirNotFound(configure_preset.to_string()))
    }

    fn find_binary_dir(
        &self,
        name: &str,
        path: &mut Vec<String>,
        exhausted: &mut HashSet<String>,
    ) -> Result<Option<String>, ConfigurationError> {
        if path.iter().any(|visited| visited == name) {
            let mut cycle = path.clone();
            cycle.push(name.to_string());
            return Err(ConfigurationError::PresetCycle(cycle));
        }
        if exhausted.contains(name) {
            return Ok(None);
        }

        let preset = self.configure(name)?;
        if let Some(binary_dir) = &preset.binary_dir {
            debug!("Found binaryDir in {}: {}", name, binary_dir);
            return Ok(Some(binary_dir.clone()));
        }

        path.push(name.to_string());
        for parent in preset.inherits.names() {
            debug!("Locating binaryDir from inherited preset: {}", parent);
            if let Some(binary_dir) = self.find_binary_dir(parent, path, exhausted)? {
                return Ok(Some(binary_dir));
            }
        }
        path.pop();
        exhausted.insert(name.to_string());
        Ok(None)
    }
}

fn load_file(path: &Path) -> Result<PresetFile, ConfigurationError> {
    if !path.exists() {
        return Ok(PresetFile::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&content).map_err(|source| ConfigurationError::PresetFile {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(content)
}

fn find<'a, T>(user: &'a [T], project: &'a [T], matches: impl Fn(&T) -> bool) -> Option<&'a T> {
    user.iter()
        .find(|&preset| matches(preset))
        .or_else(|| project.iter().find(|&preset| matches(preset)))
}

fn not_found(kind: PresetKind, name: &str) -> ConfigurationError {
    ConfigurationError::PresetNotFound {
        kind,
        name: name.to_string(),
    }
}
