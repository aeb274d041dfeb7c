//! Resolution of image versions to storage paths or URLs.
//!
//! For each `(record, version)` pair the [`VersionResolver`] looks up the
//! [`VersionSpec`], offers the request to every registered
//! [`VersionOverride`] in order, and falls back to the
//! [`PathTemplateEngine`] when none of them supplies a path.

use std::collections::BTreeMap;
use std::sync::Arc;

use filevault_common::paths::to_forward_slashes;
use filevault_common::{Error, Result, StoredFileRecord, VersionSpec};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::registry::VersionRegistry;
use super::template::PathTemplateEngine;
use crate::config::Config;

/// Caller-supplied options for one resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolveOptions {
    /// Label to use for the implicit original version instead of the
    /// configured one.
    pub original_version: Option<String>,
    /// Free-form values passed through to overrides.
    pub values: BTreeMap<String, Value>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_original_version(mut self, label: impl Into<String>) -> Self {
        self.original_version = Some(label.into());
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// One `(record, version, options)` resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionRequest<'a> {
    pub record: &'a StoredFileRecord,
    pub version: &'a str,
    pub options: &'a ResolveOptions,
}

impl<'a> ResolutionRequest<'a> {
    pub fn new(record: &'a StoredFileRecord, version: &'a str, options: &'a ResolveOptions) -> Self {
        Self {
            record,
            version,
            options,
        }
    }
}

/// What an override sees: the request plus the looked-up spec.
///
/// `spec` is an empty spec (no constraints, no salt) when the version is not
/// registered.
#[derive(Debug, Clone, Copy)]
pub struct VersionRequest<'a> {
    pub record: &'a StoredFileRecord,
    pub version: &'a str,
    pub spec: &'a VersionSpec,
    pub options: &'a ResolveOptions,
}

impl VersionRequest<'_> {
    pub fn hash_salt(&self) -> Option<&str> {
        self.spec.hash_salt.as_deref()
    }
}

/// A pluggable path computation consulted before the template engine.
///
/// Returning `Some(path)` stops resolution; that path is used verbatim apart
/// from separator normalization.
pub trait VersionOverride: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }

    fn resolve(&self, request: &VersionRequest<'_>) -> Option<String>;
}

impl<F> VersionOverride for F
where
    F: Fn(&VersionRequest<'_>) -> Option<String> + Send + Sync,
{
    fn resolve(&self, request: &VersionRequest<'_>) -> Option<String> {
        self(request)
    }
}

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Resolution {
    /// A concrete storage path or URL.
    Resolved(String),
    /// Nothing to resolve; render a placeholder instead.
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Unresolved => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Path,
    Url,
}

/// Resolves versions of stored records to paths or URLs.
pub struct VersionResolver {
    registry: Arc<VersionRegistry>,
    engine: PathTemplateEngine,
    overrides: Vec<Arc<dyn VersionOverride>>,
}

impl VersionResolver {
    pub fn new(registry: Arc<VersionRegistry>, engine: PathTemplateEngine) -> Self {
        Self {
            registry,
            engine,
            overrides: Vec::new(),
        }
    }

    /// Build the registry and template engine from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = PathTemplateEngine::new(config.paths.clone())?;
        let registry = Arc::new(VersionRegistry::from_config(config));
        Ok(Self::new(registry, engine))
    }

    /// Append an override; overrides run in registration order.
    pub fn register(&mut self, handler: Arc<dyn VersionOverride>) {
        tracing::debug!("Registering version override '{}'", handler.name());
        self.overrides.push(handler);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_handler(mut self, handler: impl VersionOverride + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    /// Append a closure override.
    pub fn with_override<F>(self, handler: F) -> Self
    where
        F: Fn(&VersionRequest<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.with_handler(handler)
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &PathTemplateEngine {
        &self.engine
    }

    /// Resolve one version to a storage path.
    ///
    /// A record without an id is [`Resolution::Unresolved`] whatever the
    /// version label.
    pub fn resolve(&self, request: &ResolutionRequest<'_>) -> Result<Resolution> {
        self.resolve_request(request, Output::Path)
    }

    /// Resolve one version to a URL (template paths get the URL prefix).
    pub fn url(&self, request: &ResolutionRequest<'_>) -> Result<Resolution> {
        self.resolve_request(request, Output::Url)
    }

    fn resolve_request(&self, request: &ResolutionRequest<'_>, output: Output) -> Result<Resolution> {
        if request.record.id.is_empty() {
            tracing::debug!("Record has no id; {} is unresolved", request.version);
            return Ok(Resolution::Unresolved);
        }
        let spec = self.lookup_spec(request)?;
        self.resolve_with_spec(request.record, &spec, request.options, output)
    }

    /// Shorthand for [`resolve`](Self::resolve).
    pub fn resolve_version(
        &self,
        record: &StoredFileRecord,
        version: &str,
        options: &ResolveOptions,
    ) -> Result<Resolution> {
        self.resolve(&ResolutionRequest::new(record, version, options))
    }

    /// Resolve every configured version of the record's model plus the
    /// original, in configured order.
    pub fn resolve_all(
        &self,
        record: &StoredFileRecord,
        options: &ResolveOptions,
    ) -> Result<IndexMap<String, Resolution>> {
        self.resolve_all_as(record, options, Output::Path)
    }

    /// Like [`resolve_all`](Self::resolve_all) but producing URLs.
    pub fn urls_all(
        &self,
        record: &StoredFileRecord,
        options: &ResolveOptions,
    ) -> Result<IndexMap<String, Resolution>> {
        self.resolve_all_as(record, options, Output::Url)
    }

    fn resolve_all_as(
        &self,
        record: &StoredFileRecord,
        options: &ResolveOptions,
        output: Output,
    ) -> Result<IndexMap<String, Resolution>> {
        let original = self.original_label(options);
        let specs = self
            .registry
            .versions_for_with_original(&record.model, original);

        let mut resolved = IndexMap::with_capacity(specs.len());
        for spec in specs {
            let resolution = self.resolve_with_spec(record, &spec, options, output)?;
            resolved.insert(spec.label, resolution);
        }
        Ok(resolved)
    }

    fn original_label<'a>(&'a self, options: &'a ResolveOptions) -> &'a str {
        options
            .original_version
            .as_deref()
            .unwrap_or_else(|| self.registry.original_label())
    }

    /// Find the spec for the request, substituting an empty one for
    /// unregistered labels.
    fn lookup_spec(&self, request: &ResolutionRequest<'_>) -> Result<VersionSpec> {
        let model = &request.record.model;
        let version = request.version;

        if version.trim().is_empty() {
            return Err(Error::invalid_argument("version label must not be empty"));
        }

        match self.registry.spec_for(model, version) {
            Ok(spec) => Ok(spec),
            Err(e) if e.is_not_found() => {
                if version == self.original_label(request.options) {
                    let mut spec = self
                        .registry
                        .spec_for(model, self.registry.original_label())?;
                    spec.label = version.to_string();
                    return Ok(spec);
                }
                tracing::warn!("No version spec for {}.{}; using an empty spec", model, version);
                Ok(VersionSpec::bare(version))
            }
            Err(e) => Err(e),
        }
    }

    fn resolve_with_spec(
        &self,
        record: &StoredFileRecord,
        spec: &VersionSpec,
        options: &ResolveOptions,
        output: Output,
    ) -> Result<Resolution> {
        if record.id.is_empty() {
            tracing::debug!("Record has no id; {} is unresolved", spec.label);
            return Ok(Resolution::Unresolved);
        }

        let request = VersionRequest {
            record,
            version: &spec.label,
            spec,
            options,
        };

        for handler in &self.overrides {
            if let Some(path) = handler.resolve(&request) {
                tracing::debug!(
                    "Override '{}' resolved {}.{} for {}",
                    handler.name(),
                    record.model,
                    spec.label,
                    record.id
                );
                return Ok(Resolution::Resolved(to_forward_slashes(&path)));
            }
        }

        let path = self
            .engine
            .build_path(record, &spec.label, spec.hash_salt.as_deref())?;
        tracing::trace!("Template resolved {}.{} to {}", record.model, spec.label, path);

        Ok(Resolution::Resolved(match output {
            Output::Path => path,
            Output::Url => self.engine.url_for(&path),
        }))
    }
}

impl std::fmt::Debug for VersionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionResolver")
            .field("registry", &self.registry)
            .field("engine", &self.engine)
            .field(
                "overrides",
                &self.overrides.iter().map(|o| o.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
