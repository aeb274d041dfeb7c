//! Token-substitution path templates with hash-based directory sharding.
//!
//! A template such as `{model}/{hash}/{id}/{version}` is parsed once into
//! literal and token segments. Rendering is pure: the same record, version
//! label, salt and configuration always produce the same path.

use filevault_common::paths::{join_url, normalize_path};
use filevault_common::{Error, Result, StoredFileRecord};
use sha2::{Digest, Sha256};

use crate::config::PathConfig;

/// A recognized template token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `{id}` - the record identifier.
    Id,
    /// `{model}` - the record's model name.
    Model,
    /// `{version}` - the requested version label.
    Version,
    /// `{hash}` - sharded directory levels derived from the id (and salt).
    Hash,
}

impl Token {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "model" => Some(Self::Model),
            "version" => Some(Self::Version),
            "hash" => Some(Self::Hash),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Model => "model",
            Self::Version => "version",
            Self::Hash => "hash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(Token),
}

/// A parsed and validated path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string.
    ///
    /// Fails with [`Error::Configuration`] on an unknown token, an unterminated
    /// `{`, or when `{id}` or `{version}` is missing (without both, two records
    /// or two versions could map to the same path).
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                Error::configuration(format!("unterminated token in path template {template:?}"))
            })?;
            let name = &after[..end];
            let token = Token::from_name(name).ok_or_else(|| {
                Error::configuration(format!(
                    "unknown token {{{name}}} in path template {template:?}"
                ))
            })?;
            segments.push(Segment::Token(token));
            rest = &after[end + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let parsed = Self {
            source: template.to_string(),
            segments,
        };
        for required in [Token::Id, Token::Version] {
            if !parsed.uses(required) {
                return Err(Error::configuration(format!(
                    "path template {template:?} must contain {{{}}}",
                    required.name()
                )));
            }
        }
        Ok(parsed)
    }

    /// Whether the template references `token`.
    pub fn uses(&self, token: Token) -> bool {
        self.segments.contains(&Segment::Token(token))
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Builds storage paths and URLs from a [`PathConfig`].
#[derive(Debug, Clone)]
pub struct PathTemplateEngine {
    template: PathTemplate,
    config: PathConfig,
}

impl PathTemplateEngine {
    /// Validate the configuration and parse its template.
    pub fn new(config: PathConfig) -> Result<Self> {
        if !(1..=3).contains(&config.hash_levels) {
            return Err(Error::configuration(format!(
                "hash_levels must be between 1 and 3, got {}",
                config.hash_levels
            )));
        }
        if !(1..=8).contains(&config.hash_width) {
            return Err(Error::configuration(format!(
                "hash_width must be between 1 and 8, got {}",
                config.hash_width
            )));
        }
        let template = PathTemplate::parse(&config.template)?;
        Ok(Self { template, config })
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Render the storage path of one version of a record.
    ///
    /// The result is forward-slash separated with no leading slash.
    pub fn build_path(
        &self,
        record: &StoredFileRecord,
        version: &str,
        hash_salt: Option<&str>,
    ) -> Result<String> {
        if record.id.is_empty() {
            return Err(Error::invalid_argument("record id must not be empty"));
        }
        if version.trim().is_empty() {
            return Err(Error::invalid_argument("version label must not be empty"));
        }

        let mut path = String::with_capacity(self.template.source.len() + 32);
        for segment in &self.template.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Token(Token::Id) => {
                    path.push_str(token_value(Token::Id, record.id.as_str())?)
                }
                Segment::Token(Token::Model) => {
                    path.push_str(token_value(Token::Model, &record.model)?)
                }
                Segment::Token(Token::Version) => {
                    path.push_str(token_value(Token::Version, version)?)
                }
                Segment::Token(Token::Hash) => path.push_str(&shard_hash(
                    record.id.as_str(),
                    hash_salt,
                    self.config.hash_levels,
                    self.config.hash_width,
                )),
            }
        }

        Ok(normalize_path(&path))
    }

    /// Turn a storage path into a URL using the configured prefix.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.url_prefix, path)
    }
}

/// A token value must stay within one path segment.
fn token_value(token: Token, value: &str) -> Result<&str> {
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(Error::invalid_argument(format!(
            "{{{}}} value {value:?} must not contain path separators or be a dot segment",
            token.name()
        )));
    }
    Ok(value)
}

/// One-shot form of [`PathTemplateEngine::build_path`] without a salt.
pub fn build_path(record: &StoredFileRecord, version: &str, config: &PathConfig) -> Result<String> {
    PathTemplateEngine::new(config.clone())?.build_path(record, version, None)
}

/// Compute the sharded hash directories for an id.
///
/// SHA-256 over the id followed by the salt, hex encoded; the leading
/// `levels * width` characters are split into `levels` segments.
fn shard_hash(id: &str, salt: Option<&str>, levels: usize, width: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    if let Some(salt) = salt {
        hasher.update(salt.as_bytes());
    }
    let digest = hex::encode(hasher.finalize());

    digest.as_bytes()[..levels * width]
        .chunks(width)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("/")
}
