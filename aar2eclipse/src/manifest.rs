//! Reads the target SDK version out of an AAR's `AndroidManifest.xml`.

use std::fmt;
use std::path::Path;

use tracing::debug;

/// Android namespace URI
pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

pub const MANIFEST_FILE: &str = "AndroidManifest.xml";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("<uses-sdk> element not found")]
    MissingUsesSdk,
    #[error("<uses-sdk> has no android:targetSdkVersion attribute")]
    MissingTargetSdk,
}

/// The raw `android:targetSdkVersion` value. Not validated beyond presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSdk(String);

impl TargetSdk {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn read_target_sdk(path: &Path) -> Result<TargetSdk, ManifestError> {
    let xml = std::fs::read_to_string(path)?;
    let target = parse_target_sdk(&xml)?;
    debug!("Target SDK in {}: {}", path.display(), target);
    Ok(target)
}

/// Looks up `<uses-sdk>` among the root element's children and returns its
/// `targetSdkVersion` in the Android namespace, whatever prefix it is bound to.
pub fn parse_target_sdk(xml: &str) -> Result<TargetSdk, ManifestError> {
    let doc = roxmltree::Document::parse(xml)?;

    let uses_sdk = doc
        .root_element()
        .children()
        .find(|node| node.has_tag_name("uses-sdk"))
        .ok_or(ManifestError::MissingUsesSdk)?;

    uses_sdk
        .attribute((ANDROID_NS, "targetSdkVersion"))
        .map(TargetSdk::new)
        .ok_or(ManifestError::MissingTargetSdk)
}
