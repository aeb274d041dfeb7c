mod types;

pub use types::*;

use crate::images::PathTemplate;
use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to load config file: {:?}", path))?;

    Ok(config)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./filevault.toml",
        "~/.config/filevault/config.toml",
        "/etc/filevault/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    // Template errors are fatal at startup
    PathTemplate::parse(&config.paths.template)?;

    if !(1..=3).contains(&config.paths.hash_levels) {
        anyhow::bail!(
            "hash_levels must be between 1 and 3, got {}",
            config.paths.hash_levels
        );
    }

    if !(1..=8).contains(&config.paths.hash_width) {
        anyhow::bail!(
            "hash_width must be between 1 and 8, got {}",
            config.paths.hash_width
        );
    }

    if config.paths.original_version.trim().is_empty() {
        anyhow::bail!("original_version cannot be empty");
    }

    for (name, adapter) in &config.adapters {
        if adapter.kind == AdapterKind::Local
            && adapter.root.as_ref().map_or(true, |r| r.as_os_str().is_empty())
        {
            anyhow::bail!("Adapter '{}' is local but has no root directory", name);
        }
    }

    for (model, hashes) in &config.image_hashes {
        for version in hashes.keys() {
            let sized = config
                .image_sizes
                .get(model)
                .is_some_and(|sizes| sizes.contains_key(version));
            if !sized && *version != config.paths.original_version {
                tracing::warn!(
                    "Hash salt configured for {}.{} which has no image size entry",
                    model,
                    version
                );
            }
        }
    }

    Ok(())
}
