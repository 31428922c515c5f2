//! Convert an Android Archive (`.aar`) into an Eclipse ADT library project.
//!
//! The conversion is a fixed sequence of fallible steps:
//!
//! 1. open the archive
//! 2. prepare the output directory
//! 3. extract every entry
//! 4. move `jni/*` and `classes.jar` into `libs/`
//! 5. write `proguard.txt`, `project.properties`, `build.xml` and `src`
//! 6. drop `aapt/AndroidManifest.xml` and run `android update lib-project`
//!
//! The first failing step aborts the run; partial output is left on disk.
//! A failed project update in step 6 is only reported as a warning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub mod error;
pub mod extract;
pub mod libs;
pub mod manifest;
pub mod output_dir;
pub mod templates;
pub mod update;

pub use error::ConvertError;
pub use manifest::{ManifestError, TargetSdk};
pub use update::{AndroidTool, ProjectUpdater, UpdateError};

use error::IoResultExt;

const AAPT_MANIFEST: &str = "aapt/AndroidManifest.xml";

/// What to convert and where to put it.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    aar: PathBuf,
    output: Option<PathBuf>,
    force: bool,
}

impl ConvertOptions {
    pub fn new(aar: impl AsRef<Path>) -> Self {
        Self {
            aar: aar.as_ref().to_path_buf(),
            output: None,
            force: false,
        }
    }

    /// Set the output directory (default: the `.aar` path without its extension)
    pub fn output(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.output = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Wipe an existing, non-empty output directory instead of failing
    pub fn force(&mut self, force: bool) -> &mut Self {
        self.force = force;
        self
    }

    pub fn aar(&self) -> &Path {
        &self.aar
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| output_dir::default_output_dir(&self.aar))
    }
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Updated,
    Skipped,
    Warning(UpdateError),
}

/// Summary of a finished conversion.
#[derive(Debug)]
pub struct Conversion {
    pub output_dir: PathBuf,
    pub target_sdk: TargetSdk,
    pub native_libs: Vec<PathBuf>,
    pub classes_jar: PathBuf,
    pub update: UpdateOutcome,
}

/// Convert using the `android` tool found by [`AndroidTool::locate`].
pub fn convert(options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let android = AndroidTool::locate();
    convert_with(options, Some(&android))
}

/// Convert, running `updater` on the finished project. `None` skips the
/// update step entirely.
pub fn convert_with(
    options: &ConvertOptions,
    updater: Option<&dyn ProjectUpdater>,
) -> Result<Conversion, ConvertError> {
    let output_dir = options.output_dir();
    if output_dir == options.aar {
        return Err(ConvertError::OutputIsInput(output_dir));
    }

    let mut archive = extract::open_archive(&options.aar)?;
    output_dir::prepare_output_dir(&output_dir, options.force)?;
    extract::extract_archive(&mut archive, &output_dir)?;

    let relocation = libs::merge_libs(&output_dir)?;

    let manifest_path = output_dir.join(manifest::MANIFEST_FILE);
    let target_sdk =
        manifest::read_target_sdk(&manifest_path).map_err(|source| ConvertError::Manifest {
            path: manifest_path,
            source,
        })?;
    templates::write_eclipse_files(&output_dir, &target_sdk)?;

    remove_aapt_manifest(&output_dir)?;

    let update = match updater {
        None => UpdateOutcome::Skipped,
        Some(updater) => match updater.update_lib_project(&output_dir) {
            Ok(()) => UpdateOutcome::Updated,
            Err(e) => {
                warn!(
                    "Cannot create \"local.properties\" ({}). Please perform `android update lib-project` manually.",
                    e
                );
                UpdateOutcome::Warning(e)
            }
        },
    };

    Ok(Conversion {
        output_dir,
        target_sdk,
        native_libs: relocation.native_libs,
        classes_jar: relocation.classes_jar,
        update,
    })
}

fn remove_aapt_manifest(output_dir: &Path) -> Result<(), ConvertError> {
    let path = output_dir.join(AAPT_MANIFEST);
    match fs::remove_file(&path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).at(&path),
    }
}
