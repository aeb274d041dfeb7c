//! Image version path building and resolution.
//!
//! This module maps `(record, version)` pairs to storage paths and URLs:
//! [`PathTemplate`]/[`PathTemplateEngine`] render configured templates,
//! [`VersionRegistry`] holds the configured versions per model and
//! [`VersionResolver`] ties them together with pluggable overrides.

mod cleanup;
mod registry;
mod render;
mod resolver;
mod template;

pub use cleanup::VariantCleanupHook;
pub use registry::VersionRegistry;
pub use render::{DisplayOptions, Fallback, ImageRenderer};
pub use resolver::{
    Resolution, ResolutionRequest, ResolveOptions, VersionOverride, VersionRequest,
    VersionResolver,
};
pub use template::{build_path, PathTemplate, PathTemplateEngine, Token};
