//! `<img>` markup for resolved image versions.
//!
//! The presentation layer asks for a version of a record; when the record is
//! missing or has no id the configured fallback is rendered instead.

use std::sync::Arc;

use filevault_common::{Result, StoredFileRecord};
use indexmap::IndexMap;

use super::resolver::{Resolution, ResolutionRequest, ResolveOptions, VersionResolver};

/// What to show when an image cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// `placeholder/{version}.jpg`
    Placeholder,
    /// A fixed image path.
    Image(String),
}

/// Options for [`ImageRenderer::display`].
#[derive(Debug, Clone, Default)]
pub struct DisplayOptions {
    pub fallback: Option<Fallback>,
    /// Extra `<img>` attributes, rendered in insertion order.
    pub attributes: IndexMap<String, String>,
    pub resolve: ResolveOptions,
}

impl DisplayOptions {
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Renders image tags using a [`VersionResolver`].
#[derive(Debug, Clone)]
pub struct ImageRenderer {
    resolver: Arc<VersionResolver>,
}

impl ImageRenderer {
    pub fn new(resolver: Arc<VersionResolver>) -> Self {
        Self { resolver }
    }

    /// URL of a version; `None` as version means the original.
    pub fn image_url(
        &self,
        record: Option<&StoredFileRecord>,
        version: Option<&str>,
        options: &ResolveOptions,
    ) -> Result<Resolution> {
        let Some(record) = record.filter(|r| !r.id.is_empty()) else {
            return Ok(Resolution::Unresolved);
        };
        let version = self.version_or_original(version, options);
        self.resolver
            .url(&ResolutionRequest::new(record, version, options))
    }

    /// An `<img>` tag for the version, or the fallback markup.
    pub fn display(
        &self,
        record: Option<&StoredFileRecord>,
        version: Option<&str>,
        options: &DisplayOptions,
    ) -> Result<String> {
        match self.image_url(record, version, &options.resolve)? {
            Resolution::Resolved(url) => Ok(img_tag(&url, &options.attributes)),
            Resolution::Unresolved => Ok(self.fallback(version, options)),
        }
    }

    /// Fallback markup; empty when no fallback is configured.
    pub fn fallback(&self, version: Option<&str>, options: &DisplayOptions) -> String {
        match &options.fallback {
            Some(Fallback::Placeholder) => {
                let version = self.version_or_original(version, &options.resolve);
                img_tag(&format!("placeholder/{version}.jpg"), &options.attributes)
            }
            Some(Fallback::Image(path)) => img_tag(path, &options.attributes),
            None => String::new(),
        }
    }

    fn version_or_original<'a>(
        &'a self,
        version: Option<&'a str>,
        options: &'a ResolveOptions,
    ) -> &'a str {
        version
            .filter(|v| !v.is_empty())
            .or(options.original_version.as_deref())
            .unwrap_or_else(|| self.resolver.registry().original_label())
    }
}

fn img_tag(src: &str, attributes: &IndexMap<String, String>) -> String {
    let mut tag = format!("<img src=\"{}\"", escape_attr(src));
    if !attributes.contains_key("alt") {
        tag.push_str(" alt=\"\"");
    }
    for (name, value) in attributes {
        tag.push_str(&format!(" {}=\"{}\"", escape_attr(name), escape_attr(value)));
    }
    tag.push_str("/>");
    tag
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
