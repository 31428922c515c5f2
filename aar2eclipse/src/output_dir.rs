use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConvertError, IoResultExt};

/// The `.aar` path with its final extension stripped (`libs/foo.aar` -> `libs/foo`).
pub fn default_output_dir(aar: &Path) -> PathBuf {
    aar.with_extension("")
}

/// Create a fresh output directory.
///
/// An existing empty directory is silently replaced. Anything else is only
/// removed when `force` is set; otherwise `ConvertError::OutputExists` is
/// returned and the existing path is left untouched.
pub fn prepare_output_dir(path: &Path, force: bool) -> Result<(), ConvertError> {
    match fs::create_dir(path) {
        Ok(()) => {
            debug!("Created output directory {}", path.display());
            return Ok(());
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(e).at(path),
    }

    if fs::remove_dir(path).is_ok() {
        debug!("Replacing empty output directory {}", path.display());
    } else if force {
        let metadata = fs::symlink_metadata(path).at(path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(path).at(path)?;
        } else {
            fs::remove_file(path).at(path)?;
        }
        info!("Removed existing output {}", path.display());
    } else {
        return Err(ConvertError::OutputExists(path.to_path_buf()));
    }

    fs::create_dir(path).at(path)
}
