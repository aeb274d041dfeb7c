use filevault_common::DimensionConstraints;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Version label → constraints, in configured order.
pub type VersionSizes = IndexMap<String, DimensionConstraints>;

/// Version label → hash salt.
pub type VersionHashes = IndexMap<String, String>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathConfig,

    /// `image_sizes[model][version]`
    #[serde(default)]
    pub image_sizes: IndexMap<String, VersionSizes>,

    /// `image_hashes[model][version]`
    #[serde(default)]
    pub image_hashes: IndexMap<String, VersionHashes>,

    #[serde(default)]
    pub adapters: IndexMap<String, AdapterConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathConfig {
    /// Path template; recognized tokens are `{id}`, `{model}`, `{version}` and `{hash}`
    #[serde(default = "default_template")]
    pub template: String,

    /// Prefix applied when turning a storage path into a URL
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    /// Number of directory levels produced by `{hash}` (1-3)
    #[serde(default = "default_hash_levels")]
    pub hash_levels: usize,

    /// Hex characters per `{hash}` level
    #[serde(default = "default_hash_width")]
    pub hash_width: usize,

    /// Label of the implicit version every model has
    #[serde(default = "default_original_version")]
    pub original_version: String,
}

fn default_template() -> String {
    "{model}/{hash}/{id}/{version}".to_string()
}
fn default_url_prefix() -> String {
    "/".to_string()
}
fn default_hash_levels() -> usize {
    2
}
fn default_hash_width() -> usize {
    2
}
fn default_original_version() -> String {
    "original".to_string()
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            url_prefix: default_url_prefix(),
            hash_levels: default_hash_levels(),
            hash_width: default_hash_width(),
            original_version: default_original_version(),
        }
    }
}

impl PathConfig {
    /// Same defaults with a different template.
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdapterConfig {
    pub kind: AdapterKind,

    /// Root directory, required for `local` adapters
    #[serde(default)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    Local,
    Memory,
}
