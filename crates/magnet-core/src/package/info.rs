use crate::core::error::{MagnetError, MagnetResult};
use crate::core::path::is_plain_component;
use serde::{Deserialize, Serialize};

/// Name of the manifest entry inside a package archive
pub const MANIFEST_FILENAME: &str = "pkg.info";

/// Metadata read from a package manifest before installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    #[serde(default)]
    pub protocol_version: i64,

    /// Application version; higher is newer
    #[serde(default, rename = "appVersion")]
    pub version: i64,

    pub name: String,

    #[serde(default)]
    pub exec_cmd: String,

    #[serde(default)]
    pub info: String,

    #[serde(default)]
    pub description: String,

    /// File name of the entry whose checksum is verified on install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_name: Option<String>,

    /// Hex-encoded MD5 of the `exec_name` entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl PackageInfo {
    /// Parse manifest bytes and validate the package name
    pub fn from_slice(data: &[u8]) -> MagnetResult<Self> {
        let info: PackageInfo = serde_json::from_slice(data)
            .map_err(|e| MagnetError::ManifestInvalid(e.to_string()))?;
        info.validate()?;
        Ok(info)
    }

    fn validate(&self) -> MagnetResult<()> {
        if self.name.trim().is_empty() {
            return Err(MagnetError::ManifestInvalid(
                "package name is empty".to_string(),
            ));
        }
        if !is_plain_component(&self.name) {
            return Err(MagnetError::ManifestInvalid(format!(
                "package name '{}' is not a plain file name",
                self.name
            )));
        }
        Ok(())
    }

    /// Executable name and checksum, when both are declared and non-empty
    pub fn verified_executable(&self) -> Option<(&str, &str)> {
        match (self.exec_name.as_deref(), self.checksum.as_deref()) {
            (Some(name), Some(sum)) if !name.is_empty() && !sum.is_empty() => Some((name, sum)),
            _ => None,
        }
    }
}
