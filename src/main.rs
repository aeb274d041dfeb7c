mod cli;

use filevault::{
    config,
    images::{Resolution, ResolutionRequest, ResolveOptions, VersionResolver},
    storage::AdapterRegistry,
    validation,
};
use filevault_common::{Comparison, DimensionConstraints, FileId, StoredFileRecord};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "filevault=trace,filevault_common=debug".to_string()
        } else {
            "filevault=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            model,
            id,
            adapter,
            version,
            url,
        } => resolve(
            cli.config.as_deref(),
            &StoredFileRecord::new(FileId::from(id), model, adapter),
            version.as_deref(),
            url,
        ),
        Commands::Versions {
            model,
            id,
            adapter,
            json,
        } => list_versions(
            cli.config.as_deref(),
            &StoredFileRecord::new(FileId::from(id), model, adapter),
            json,
        ),
        Commands::CheckSize {
            file,
            width,
            height,
        } => check_size(&file, width, height),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("filevault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn resolver_for(config_path: Option<&Path>) -> Result<VersionResolver> {
    let config = config::load_config_or_default(config_path)?;
    Ok(VersionResolver::from_config(&config)?)
}

fn resolve(
    config_path: Option<&Path>,
    record: &StoredFileRecord,
    version: Option<&str>,
    url: bool,
) -> Result<()> {
    let resolver = resolver_for(config_path)?;
    let options = ResolveOptions::default();
    let version = version.unwrap_or_else(|| resolver.registry().original_label());
    let request = ResolutionRequest::new(record, version, &options);

    let resolution = if url {
        resolver.url(&request)?
    } else {
        resolver.resolve(&request)?
    };

    match resolution {
        Resolution::Resolved(path) => println!("{}", path),
        Resolution::Unresolved => anyhow::bail!("No path for {}.{}", record.model, version),
    }

    Ok(())
}

fn list_versions(config_path: Option<&Path>, record: &StoredFileRecord, json: bool) -> Result<()> {
    let resolver = resolver_for(config_path)?;
    let all = resolver.resolve_all(record, &ResolveOptions::default())?;

    if json {
        let json_str = serde_json::to_string_pretty(&all)?;
        println!("{}", json_str);
    } else {
        println!("{} {} ({})", record.model, record.id, record.adapter);
        for (label, resolution) in &all {
            println!("  {}: {}", label, resolution.as_path().unwrap_or("-"));
        }
    }

    Ok(())
}

fn check_size(file: &Path, width: Option<Comparison>, height: Option<Comparison>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let constraints = DimensionConstraints { width, height };
    let dimensions = validation::measure(file)?;
    let valid = validation::validate(dimensions, &constraints)?;

    println!("File: {}", file.display());
    println!("Size: {}x{}", dimensions.width, dimensions.height);
    if let Some(width) = constraints.width {
        println!("  width {}", width);
    }
    if let Some(height) = constraints.height {
        println!("  height {}", height);
    }

    if valid {
        println!("✓ Image size is valid");
        Ok(())
    } else {
        anyhow::bail!("Image size does not satisfy the constraints")
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let adapters = AdapterRegistry::from_config(&config)?;
    let resolver = VersionResolver::from_config(&config)?;

    println!("  Template: {}", config.paths.template);
    println!("  URL prefix: {}", config.paths.url_prefix);
    println!(
        "  Hash sharding: {} levels x {} chars",
        config.paths.hash_levels, config.paths.hash_width
    );
    println!(
        "  Adapters: {}",
        adapters.names().collect::<Vec<_>>().join(", ")
    );
    for model in resolver.registry().models() {
        let labels: Vec<String> = resolver
            .registry()
            .versions_for(model)
            .into_iter()
            .map(|spec| spec.label)
            .collect();
        println!("  {}: {}", model, labels.join(", "));
    }

    Ok(())
}
