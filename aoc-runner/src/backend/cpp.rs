//! C++ backend: CMake presets, one build target per puzzle day

use super::presets::{LayeredPresets, PresetSelection};
use super::{BackendAdapter, BinaryTarget, EnvAdjustment, ExecInfo};
use crate::command::ToolCommand;
use crate::context::BackendSettings;
use crate::error::SolverError;
use crate::id::{Backend, SolverId};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configure preset used when neither a workflow nor an override names one
pub const DEFAULT_CONFIGURE_PRESET: &str = "aoc";

/// Whether solvers link a separately built `lib` target
const NEEDS_LIBRARY_BUILD: bool = false;

const LIBRARY_TARGET: &str = "lib";

const EXECUTABLE_SUFFIX: &str = if cfg!(windows) { ".exe" } else { "" };

pub struct CppAdapter {
    root: PathBuf,
    selection: PresetSelection,
    binary_dir: PathBuf,
    targets: Vec<BinaryTarget>,
}

impl CppAdapter {
    /// Resolve presets and the build tree for `ids`
    pub fn new(
        root: PathBuf,
        ids: &[SolverId],
        settings: &BackendSettings,
    ) -> Result<Self, SolverError> {
        let presets = LayeredPresets::load(&root)?;
        let selection = presets.select(
            settings.cpp_workflow_preset.as_deref(),
            settings.cpp_configure_preset.as_deref(),
            DEFAULT_CONFIGURE_PRESET,
        )?;
        debug!("Using configure preset: {}", selection.configure_preset);
        let binary_dir =
            expand_source_dir(&presets.binary_dir(&selection.configure_preset)?, &root);

        Ok(Self {
            root,
            selection,
            binary_dir,
            targets: BinaryTarget::distinct(ids),
        })
    }

    /// Directory holding the built executables
    pub fn executable_dir(&self) -> PathBuf {
        match &self.selection.configuration {
            Some(configuration) => self.binary_dir.join(configuration),
            None => self.binary_dir.clone(),
        }
    }

    fn cmake(&self, step: String, args: Vec<String>) -> ToolCommand {
        let args = std::iter::once("cmake".to_string()).chain(args);
        ToolCommand::mise(Backend::Cpp, step, &self.root, args)
            .env(EnvAdjustment::default().set("CLICOLOR_FORCE", "1"))
    }

    fn build_command(&self, target: &str) -> ToolCommand {
        let mut args = vec![
            "--build".to_string(),
            self.binary_dir.display().to_string(),
            "--target".to_string(),
            target.to_string(),
        ];
        if target != LIBRARY_TARGET {
            args.extend(["--".to_string(), "--quiet".to_string()]);
        }
        self.cmake(format!("CMake build of target {target}"), args)
    }

    fn configure(&self, dry_run: bool) -> Result<(), SolverError> {
        info!("CMake configure");
        let args = vec![
            "--log-level=ERROR".to_string(),
            "--preset".to_string(),
            self.selection.configure_preset.clone(),
        ];
        self.cmake("CMake configure".to_string(), args).run(dry_run)?;
        Ok(())
    }

    fn build_library(&self, dry_run: bool) -> Result<(), SolverError> {
        if !NEEDS_LIBRARY_BUILD {
            return Ok(());
        }
        info!("CMake library build");
        self.build_command(LIBRARY_TARGET).run(dry_run)?;
        Ok(())
    }

    fn build_binaries(&self, dry_run: bool) -> Result<(), SolverError> {
        self.targets.par_iter().try_for_each(|target| -> Result<(), SolverError> {
            let name = target.name();
            info!("Building cpp solver: {}", name);
            self.build_command(&name).run(dry_run)?;
            Ok(())
        })
    }
}

impl BackendAdapter for CppAdapter {
    fn backend(&self) -> Backend {
        Backend::Cpp
    }

    fn prepare(&mut self, dry_run: bool) -> Result<(), SolverError> {
        if self.selection.from_workflow {
            info!("Workflow preset in use; C++ build tree is prepared externally");
            return Ok(());
        }
        self.configure(dry_run)?;
        self.build_library(dry_run)?;
        self.build_binaries(dry_run)
    }

    fn exec_info(&self, id: &SolverId) -> Result<ExecInfo, SolverError> {
        let file_name = format!("{}{}", BinaryTarget::of(id).name(), EXECUTABLE_SUFFIX);
        let executable = self.executable_dir().join(file_name);
        Ok(ExecInfo::new(
            vec![executable.display().to_string()],
            &self.root,
        ))
    }
}

/// Expand `${sourceDir}` and anchor relative directories at the source dir
fn expand_source_dir(binary_dir: &str, source_dir: &Path) -> PathBuf {
    let expanded = binary_dir.replace("${sourceDir}", &source_dir.display().to_string());
    source_dir.join(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::id::Part;
    use tempfile::TempDir;

    const PRESETS: &str = r#"{
        "version": 6,
        "configurePresets": [
            { "name": "aoc-base", "hidden": true, "binaryDir": "${sourceDir}/build" },
            { "name": "aoc", "inherits": "aoc-base" },
            { "name": "vs", "inherits": "aoc" }
        ],
        "buildPresets": [ { "name": "vs-release", "configuration": "Release" } ],
        "workflowPresets": [
            {
                "name": "vs-workflow",
                "steps": [
                    { "type": "configure", "name": "vs" },
                    { "type": "build", "name": "vs-release" }
                ]
            }
        ]
    }"#;

    fn source_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("CMakePresets.json"), PRESETS).unwrap();
        temp
    }

    fn ids() -> Vec<SolverId> {
        vec![
            SolverId::new(2022, 1, Part::One, Backend::Cpp),
            SolverId::new(2022, 1, Part::Two, Backend::Cpp),
            SolverId::new(2025, 2, Part::One, Backend::Cpp),
        ]
    }

    fn default_adapter(temp: &TempDir) -> CppAdapter {
        CppAdapter::new(temp.path().to_path_buf(), &ids(), &BackendSettings::default()).unwrap()
    }

    #[test]
    fn test_exec_info_uses_binary_dir() {
        let temp = source_dir();
        let adapter = default_adapter(&temp);
        assert_eq!(adapter.targets.len(), 2);

        let info = adapter.exec_info(&ids()[1]).unwrap();
        let expected = temp
            .path()
            .join("build")
            .join(format!("y2022_d01{EXECUTABLE_SUFFIX}"));
        assert_eq!(info.args, [expected.display().to_string()]);
        assert_eq!(info.cwd, temp.path());
    }

    #[test]
    fn test_workflow_adds_configuration_and_skips_prepare() {
        let temp = source_dir();
        let settings = BackendSettings {
            cpp_workflow_preset: Some("vs-workflow".to_string()),
            ..BackendSettings::default()
        };
        let mut adapter = CppAdapter::new(temp.path().to_path_buf(), &ids(), &settings).unwrap();
        assert_eq!(adapter.executable_dir(), temp.path().join("build").join("Release"));
        // No build tool is needed when the tree was built by the workflow
        adapter.prepare(false).unwrap();
    }

    #[test]
    fn test_unknown_override_fails_at_construction() {
        let temp = source_dir();
        let settings = BackendSettings {
            cpp_configure_preset: Some("missing".to_string()),
            ..BackendSettings::default()
        };
        let err = CppAdapter::new(temp.path().to_path_buf(), &ids(), &settings).err().unwrap();
        assert!(matches!(
            err,
            SolverError::Configuration(ConfigurationError::PresetNotFound { .. })
        ));
    }

    #[test]
    fn test_build_commands() {
        let temp = source_dir();
        let adapter = default_adapter(&temp);
        let build_dir = temp.path().join("build").display().to_string();
        assert_eq!(
            adapter.build_command("y2022_d01").command_line(false),
            [
                "mise",
                "exec",
                "--",
                "cmake",
                "--build",
                build_dir.as_str(),
                "--target",
                "y2022_d01",
                "--",
                "--quiet",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dry_run_prepare() {
        let temp = source_dir();
        let mut adapter = default_adapter(&temp);
        adapter.prepare(true).unwrap();
    }

    #[test]
    fn test_expand_source_dir() {
        let root = Path::new("/repo/solvers/cpp");
        assert_eq!(
            expand_source_dir("${sourceDir}/build", root),
            Path::new("/repo/solvers/cpp/build")
        );
        assert_eq!(expand_source_dir("out", root), Path::new("/repo/solvers/cpp/out"));
        assert_eq!(expand_source_dir("/abs/build", root), Path::new("/abs/build"));
    }
}
