use std::fs::OpenOptions;
use std::path::Path;

use crate::error::{ConvertError, IoResultExt};
use crate::manifest::TargetSdk;

pub const BUILD_XML: &str = include_str!("../templates/build.xml");

pub const PROGUARD_FILE: &str = "proguard.txt";
pub const PROJECT_PROPERTIES_FILE: &str = "project.properties";
pub const BUILD_XML_FILE: &str = "build.xml";
pub const SRC_MARKER: &str = "src";

pub fn project_properties(target_sdk: &TargetSdk) -> String {
    format!(
        "proguard.config=${{sdk.dir}}/tools/proguard/proguard-android.txt:proguard.txt\n\
         android.library=true\n\
         target=android-{}\n",
        target_sdk
    )
}

/// Write the files Eclipse ADT needs next to the extracted AAR contents.
pub fn write_eclipse_files(output_dir: &Path, target_sdk: &TargetSdk) -> Result<(), ConvertError> {
    // Required even if proguard never runs
    touch(&output_dir.join(PROGUARD_FILE))?;

    let properties_path = output_dir.join(PROJECT_PROPERTIES_FILE);
    std::fs::write(&properties_path, project_properties(target_sdk)).at(&properties_path)?;

    let build_xml_path = output_dir.join(BUILD_XML_FILE);
    std::fs::write(&build_xml_path, BUILD_XML).at(&build_xml_path)?;

    touch(&output_dir.join(SRC_MARKER))
}

/// Create `path` if missing; existing contents are left alone.
fn touch(path: &Path) -> Result<(), ConvertError> {
    if path.exists() {
        return Ok(());
    }

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map(drop)
        .at(path)
}
