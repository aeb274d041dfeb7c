//! Registry of configured image versions per model.
//!
//! The [`VersionRegistry`] is built once from [`Config`] and is read-only
//! afterwards, so it can be shared across threads behind an `Arc` without
//! locking. Every model implicitly has an `original` version, even when the
//! configuration does not mention it.

use filevault_common::{Error, Result, VersionSpec};
use indexmap::IndexMap;

use crate::config::Config;

/// Version specs keyed by model, then label, in configured order.
///
/// # Examples
///
/// ```
/// use filevault::config::parse_config;
/// use filevault::images::VersionRegistry;
///
/// let config = parse_config(r#"
/// [image_sizes.Avatar]
/// thumbnail = { width = ["<=", 150] }
/// "#).unwrap();
/// let registry = VersionRegistry::from_config(&config);
///
/// let labels: Vec<String> = registry
///     .versions_for("Avatar")
///     .into_iter()
///     .map(|spec| spec.label)
///     .collect();
/// assert_eq!(labels, ["thumbnail", "original"]);
/// ```
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    models: IndexMap<String, IndexMap<String, VersionSpec>>,
    original_label: String,
}

impl VersionRegistry {
    /// Build the registry from `image_sizes` and `image_hashes`.
    ///
    /// A salt configured for a version without a size entry still yields a
    /// spec (with no constraints), appended after the sized versions.
    pub fn from_config(config: &Config) -> Self {
        let mut models: IndexMap<String, IndexMap<String, VersionSpec>> = IndexMap::new();

        for (model, sizes) in &config.image_sizes {
            let versions = models.entry(model.clone()).or_default();
            for (label, constraints) in sizes {
                versions.insert(
                    label.clone(),
                    VersionSpec {
                        label: label.clone(),
                        constraints: (!constraints.is_empty()).then_some(*constraints),
                        hash_salt: None,
                    },
                );
            }
        }

        for (model, hashes) in &config.image_hashes {
            let versions = models.entry(model.clone()).or_default();
            for (label, salt) in hashes {
                versions
                    .entry(label.clone())
                    .or_insert_with(|| VersionSpec::bare(label.clone()))
                    .hash_salt = Some(salt.clone());
            }
        }

        Self {
            models,
            original_label: config.paths.original_version.clone(),
        }
    }

    /// Label of the implicit original version.
    pub fn original_label(&self) -> &str {
        &self.original_label
    }

    /// Names of all configured models.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// All versions of `model` in configured order, with the original last
    /// unless it is configured explicitly.
    pub fn versions_for(&self, model: &str) -> Vec<VersionSpec> {
        self.versions_for_with_original(model, &self.original_label)
    }

    /// Like [`versions_for`](Self::versions_for) with a caller-chosen label
    /// for the implicit original version.
    pub fn versions_for_with_original(&self, model: &str, original: &str) -> Vec<VersionSpec> {
        let mut versions: Vec<VersionSpec> = self
            .models
            .get(model)
            .map(|versions| versions.values().cloned().collect())
            .unwrap_or_default();

        if !versions.iter().any(|spec| spec.label == original) {
            versions.push(self.original_spec(model, original));
        }
        versions
    }

    /// Look up one version of a model.
    ///
    /// The original label always resolves; any other unconfigured label is
    /// [`Error::NotFound`].
    pub fn spec_for(&self, model: &str, label: &str) -> Result<VersionSpec> {
        if let Some(spec) = self.models.get(model).and_then(|v| v.get(label)) {
            return Ok(spec.clone());
        }
        if label == self.original_label {
            return Ok(self.original_spec(model, label));
        }
        Err(Error::not_found("version", format!("{model}.{label}")))
    }

    /// The implicit original spec; a salt configured under the default
    /// original label still applies when the caller renames it.
    fn original_spec(&self, model: &str, label: &str) -> VersionSpec {
        let hash_salt = self
            .models
            .get(model)
            .and_then(|v| v.get(&self.original_label))
            .and_then(|spec| spec.hash_salt.clone());
        VersionSpec {
            label: label.to_string(),
            constraints: None,
            hash_salt,
        }
    }
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
