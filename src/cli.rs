use clap::{Parser, Subcommand};
use filevault_common::Comparison;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filevault")]
#[command(author, version, about = "Versioned file and image path resolution")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the storage path of one version of a stored file
    Resolve {
        /// Owning model name
        #[arg(long)]
        model: String,

        /// Stored file identifier
        #[arg(long)]
        id: String,

        /// Storage adapter tag recorded on the file
        #[arg(long, default_value = "Local")]
        adapter: String,

        /// Version label (defaults to the original)
        #[arg(long)]
        version: Option<String>,

        /// Print the public URL instead of the storage path
        #[arg(long)]
        url: bool,
    },

    /// List every version path of a stored file
    Versions {
        /// Owning model name
        #[arg(long)]
        model: String,

        /// Stored file identifier
        #[arg(long)]
        id: String,

        /// Storage adapter tag recorded on the file
        #[arg(long, default_value = "Local")]
        adapter: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check an image's dimensions against constraints
    CheckSize {
        /// Image file to measure
        #[arg(required = true)]
        file: PathBuf,

        /// Width constraint, e.g. "<=:150"
        #[arg(long)]
        width: Option<Comparison>,

        /// Height constraint, e.g. "==:100"
        #[arg(long)]
        height: Option<Comparison>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
