use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::debug;

#[cfg(windows)]
const ANDROID_EXE: &str = "android.bat";
#[cfg(not(windows))]
const ANDROID_EXE: &str = "android";

/// Why the project update step did not complete. Never fatal to a conversion.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("`{}` not found", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to run `{}`: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{}` exited with {status}", .program.display())]
    Failed { program: PathBuf, status: ExitStatus },
}

/// Regenerates `local.properties` for a freshly converted library project.
pub trait ProjectUpdater {
    fn update_lib_project(&self, project_dir: &Path) -> Result<(), UpdateError>;
}

/// The SDK's legacy `android` tool, run as `android update lib-project -p <dir>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidTool {
    program: PathBuf,
}

impl AndroidTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `tools/android` under `ANDROID_SDK_ROOT` or `ANDROID_HOME`,
    /// falling back to `android` on the `PATH`.
    pub fn locate() -> Self {
        Self::locate_in(
            ["ANDROID_SDK_ROOT", "ANDROID_HOME"]
                .into_iter()
                .filter_map(std::env::var_os)
                .map(PathBuf::from),
        )
    }

    fn locate_in(sdk_roots: impl IntoIterator<Item = PathBuf>) -> Self {
        for sdk_root in sdk_roots {
            let candidate = sdk_root.join("tools").join(ANDROID_EXE);
            if candidate.is_file() {
                return Self::new(candidate);
            }
        }

        Self::new(ANDROID_EXE)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ProjectUpdater for AndroidTool {
    fn update_lib_project(&self, project_dir: &Path) -> Result<(), UpdateError> {
        debug!(
            "Running {} update lib-project -p {}",
            self.program.display(),
            project_dir.display()
        );

        let status = Command::new(&self.program)
            .args(["update", "lib-project", "-p"])
            .arg(project_dir)
            .status()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => UpdateError::NotFound(self.program.clone()),
                _ => UpdateError::Spawn {
                    program: self.program.clone(),
                    source,
                },
            })?;

        if !status.success() {
            return Err(UpdateError::Failed {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}
