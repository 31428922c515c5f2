use std::io;
use std::path::{Path, PathBuf};

use crate::manifest::ManifestError;

/// Errors that abort a conversion.
///
/// Nothing written to the output directory before the failure is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to open AAR file {}", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error(
        "Output folder \"{}\" already exists. Please remove it or choose another name.",
        .0.display()
    )]
    OutputExists(PathBuf),

    #[error("Output folder \"{}\" is the input file. Please choose another name.", .0.display())]
    OutputIsInput(PathBuf),

    #[error("Failed to extract AAR into {}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("No classes.jar found in {}", .0.display())]
    MissingClassesJar(PathBuf),

    #[error(
        "No free file name for classes.jar in {} after {attempts} attempts",
        .dir.display()
    )]
    NoFreeName { dir: PathBuf, attempts: usize },

    #[error("Failed to read target SDK version from {}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    /// True for conflicts the user can resolve by picking another output
    /// directory or passing `--force`.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::OutputExists(_) | Self::OutputIsInput(_))
    }
}

/// Attaches the offending path to a plain `io::Error`.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T, ConvertError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, ConvertError> {
        self.map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_conflicts_are_user_errors() {
        assert!(ConvertError::OutputExists(PathBuf::from("out")).is_user_error());
        assert!(ConvertError::OutputIsInput(PathBuf::from("lib")).is_user_error());
        assert!(!ConvertError::MissingClassesJar(PathBuf::from("out")).is_user_error());
    }

    #[test]
    fn output_exists_message_names_the_folder() {
        let err = ConvertError::OutputExists(PathBuf::from("mylib"));
        assert_eq!(
            err.to_string(),
            "Output folder \"mylib\" already exists. Please remove it or choose another name."
        );
    }

    #[test]
    fn io_errors_carry_their_path() {
        let result: io::Result<()> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        match result.at(Path::new("out/libs")) {
            Err(ConvertError::Io { path, source }) => {
                assert_eq!(path, PathBuf::from("out/libs"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
