use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "subscout")]
#[command(author, version, about = "Concurrent subtitle search and download tool")]
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
    /// Scan paths for videos and show their subtitle coverage
    Scan {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Search providers for available subtitles without downloading
    List {
        /// Files or directories to search for
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Preferred languages, most preferred first (overrides config)
        #[arg(short, long = "language")]
        languages: Vec<String>,

        /// Providers to query (overrides config)
        #[arg(short, long = "provider")]
        providers: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download the best-ranked subtitles
    Download {
        /// Files or directories to fetch subtitles for
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Preferred languages, most preferred first (overrides config)
        #[arg(short, long = "language")]
        languages: Vec<String>,

        /// Providers to query (overrides config)
        #[arg(short, long = "provider")]
        providers: Vec<String>,

        /// Number of concurrent workers (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Keep one subtitle per language instead of a single best
        #[arg(long)]
        multi: bool,

        /// Search even when subtitles already exist on disk
        #[arg(long)]
        force: bool,
    },

    /// List registered subtitle providers
    Providers,

    /// List supported language codes
    Languages,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
