//! Project editor settings

use crate::Result;
use content_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub manifest: ManifestSettings,
    pub naming: NamingSettings,
    pub load: LoadSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSettings {
    /// Indentation width of the written XML
    pub indent: usize,
    /// `ToolsVersion` of newly created manifests
    pub tools_version: String,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            indent: 2,
            tools_version: "4.0".to_string(),
        }
    }
}

/// Base names for generated nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingSettings {
    pub new_folder: String,
    pub new_file: String,
    pub copy_suffix: String,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            new_folder: "New Folder".to_string(),
            new_file: "New File.txt".to_string(),
            copy_suffix: " - Copy".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    /// Pass missing files to the editor host after load
    pub report_missing_files: bool,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            report_missing_files: true,
        }
    }
}

impl ProjectSettings {
    /// Read settings from a `.toml`, `.json` or `.yaml` file. A missing file
    /// yields the defaults.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(path)?)
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }
}
