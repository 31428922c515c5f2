//! Moves native libraries and `classes.jar` into `libs/`, where the Eclipse
//! ADT build expects every binary to live.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::error::{ConvertError, IoResultExt};

pub const LIBS_DIR: &str = "libs";
pub const JNI_DIR: &str = "jni";
pub const CLASSES_JAR: &str = "classes.jar";

/// Upper bound on names tried before giving up on placing `classes.jar`.
pub const MAX_RENAME_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Former `jni/` children, now under `libs/`, sorted.
    pub native_libs: Vec<PathBuf>,
    /// Final location of the classes archive.
    pub classes_jar: PathBuf,
}

pub fn merge_libs(output_dir: &Path) -> Result<Relocation, ConvertError> {
    merge_libs_with(output_dir, random_jar_name)
}

/// Like [`merge_libs`], with `next_name` supplying the fallback file names
/// tried when `libs/classes.jar` is already taken.
pub fn merge_libs_with(
    output_dir: &Path,
    next_name: impl FnMut() -> String,
) -> Result<Relocation, ConvertError> {
    let libs_dir = output_dir.join(LIBS_DIR);
    match fs::create_dir(&libs_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(e).at(&libs_dir),
    }

    let native_libs = move_native_libs(&output_dir.join(JNI_DIR), &libs_dir)?;

    let source = output_dir.join(CLASSES_JAR);
    if !source.is_file() {
        return Err(ConvertError::MissingClassesJar(output_dir.to_path_buf()));
    }
    let classes_jar = move_unique(&source, &libs_dir, CLASSES_JAR, next_name)?;
    info!("Moved {} -> {}", CLASSES_JAR, classes_jar.display());

    Ok(Relocation {
        native_libs,
        classes_jar,
    })
}

fn move_native_libs(jni_dir: &Path, libs_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let entries = match fs::read_dir(jni_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).at(jni_dir),
    };

    let mut moved = Vec::new();
    for entry in entries {
        let entry = entry.at(jni_dir)?;
        let target = libs_dir.join(entry.file_name());
        fs::rename(entry.path(), &target).at(&target)?;
        info!("Moved native libraries: {} -> {}", entry.path().display(), target.display());
        moved.push(target);
    }

    fs::remove_dir(jni_dir).at(jni_dir)?;
    moved.sort();
    Ok(moved)
}

/// Move `source` into `dir` as `preferred`, or under the first name from
/// `next_name` that is not taken. Existing files are never overwritten.
pub fn move_unique(
    source: &Path,
    dir: &Path,
    preferred: &str,
    mut next_name: impl FnMut() -> String,
) -> Result<PathBuf, ConvertError> {
    let mut target = dir.join(preferred);

    for _ in 0..MAX_RENAME_ATTEMPTS {
        // symlink_metadata so a dangling symlink still counts as taken
        if fs::symlink_metadata(&target).is_err() {
            fs::rename(source, &target).at(&target)?;
            return Ok(target);
        }
        target = dir.join(next_name());
    }

    Err(ConvertError::NoFreeName {
        dir: dir.to_path_buf(),
        attempts: MAX_RENAME_ATTEMPTS,
    })
}

fn random_jar_name() -> String {
    format!("classes.{}.jar", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (name, contents) in files {
            let path = tmp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        tmp
    }

    #[test]
    fn moves_abi_directories_and_jar() {
        let tmp = project(&[
            ("classes.jar", "classes"),
            ("jni/armeabi-v7a/libfoo.so", "arm"),
            ("jni/x86/libfoo.so", "x86"),
        ]);

        let relocation = merge_libs(tmp.path()).unwrap();

        let libs = tmp.path().join(LIBS_DIR);
        assert_eq!(
            relocation.native_libs,
            vec![libs.join("armeabi-v7a"), libs.join("x86")]
        );
        assert_eq!(relocation.classes_jar, libs.join(CLASSES_JAR));
        assert_eq!(fs::read_to_string(libs.join("x86/libfoo.so")).unwrap(), "x86");
        assert!(!tmp.path().join(JNI_DIR).exists());
        assert!(!tmp.path().join(CLASSES_JAR).exists());
    }

    #[test]
    fn missing_jni_is_a_no_op() {
        let tmp = project(&[("classes.jar", "classes")]);

        let relocation = merge_libs(tmp.path()).unwrap();

        assert!(relocation.native_libs.is_empty());
        assert!(tmp.path().join("libs/classes.jar").is_file());
    }

    #[test]
    fn existing_jar_is_kept_on_collision() {
        let tmp = project(&[("classes.jar", "new"), ("libs/classes.jar", "old")]);

        let relocation = merge_libs_with(tmp.path(), || "classes.fixed.jar".to_string()).unwrap();

        let libs = tmp.path().join(LIBS_DIR);
        assert_eq!(relocation.classes_jar, libs.join("classes.fixed.jar"));
        assert_eq!(fs::read_to_string(libs.join("classes.jar")).unwrap(), "old");
        assert_eq!(fs::read_to_string(libs.join("classes.fixed.jar")).unwrap(), "new");
    }

    #[test]
    fn keeps_asking_for_names_until_one_is_free() {
        let tmp = project(&[
            ("classes.jar", "new"),
            ("libs/classes.jar", "old"),
            ("libs/classes.1.jar", "older"),
        ]);
        let mut counter = 0;

        let relocation = merge_libs_with(tmp.path(), || {
            counter += 1;
            format!("classes.{}.jar", counter)
        })
        .unwrap();

        assert_eq!(relocation.classes_jar, tmp.path().join("libs/classes.2.jar"));
        assert_eq!(counter, 2);
    }

    #[test]
    fn gives_up_after_bounded_attempts() {
        let tmp = project(&[("classes.jar", "new"), ("libs/classes.jar", "old")]);

        let err = merge_libs_with(tmp.path(), || CLASSES_JAR.to_string()).unwrap_err();

        assert!(matches!(
            err,
            ConvertError::NoFreeName { attempts: MAX_RENAME_ATTEMPTS, .. }
        ));
        assert!(tmp.path().join(CLASSES_JAR).is_file());
    }

    #[test]
    fn random_names_are_unique_jars() {
        let a = random_jar_name();
        let b = random_jar_name();
        assert_ne!(a, b);
        assert!(a.starts_with("classes.") && a.ends_with(".jar"));
    }

    #[test]
    fn missing_classes_jar_is_fatal() {
        let tmp = project(&[("jni/x86/libfoo.so", "x86")]);

        assert!(matches!(
            merge_libs(tmp.path()),
            Err(ConvertError::MissingClassesJar(_))
        ));
    }
}
