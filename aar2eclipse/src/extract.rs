use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::ConvertError;

/// Open an AAR and read its central directory.
pub fn open_archive(path: &Path) -> Result<ZipArchive<File>, ConvertError> {
    let open_error = |source: ZipError| ConvertError::OpenArchive {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| open_error(ZipError::Io(e)))?;
    ZipArchive::new(file).map_err(open_error)
}

/// Extract every entry of `archive` into `output_dir`, keeping relative paths.
pub fn extract_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    output_dir: &Path,
) -> Result<(), ConvertError> {
    debug!(
        "Extracting {} entries into {}",
        archive.len(),
        output_dir.display()
    );

    archive
        .extract(output_dir)
        .map_err(|source| ConvertError::Extract {
            path: output_dir.to_path_buf(),
            source,
        })
}
