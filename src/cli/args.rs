//! Command-line argument parsing for Top Movies
//!
//! This module defines the CLI structure using clap derive macros: listing
//! and searching the ranked list, inspecting one entry, loading poster
//! images through the cache, and showing the effective configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top Movies - browse the top-ranked movie list
#[derive(Parser, Debug)]
#[command(
    name = "top_movies",
    version,
    about = "Browse the top-ranked movie list from the command line",
    long_about = "Fetches the ranked movie list from a public ranking API, filters it by title,
and loads poster images through an in-memory cache."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the ranked list and print the visible entries
    List(ListArgs),

    /// Load an image through the resource cache
    Image(ImageArgs),

    /// Show one entry and the character counts of its title
    Details(DetailsArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only show titles containing this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Number of entries shown without a search
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// API key (overrides IMDB_API_KEY and the config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
}

/// Arguments for the image command
#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Image URL
    #[arg(value_name = "URL")]
    pub url: String,

    /// Number of times to load the image
    #[arg(short, long, default_value = "2")]
    pub repeat: usize,

    /// Issue the loads concurrently instead of one after another
    #[arg(long)]
    pub concurrent: bool,
}

/// Arguments for the details command
#[derive(Args, Debug, Clone)]
pub struct DetailsArgs {
    /// Entry identifier (e.g. tt0111161)
    #[arg(value_name = "ID")]
    pub id: String,

    /// API key (overrides IMDB_API_KEY and the config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
}

/// Arguments for the config command
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Write a default config file to the user config directory if none exists
    #[arg(long)]
    pub init: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested on the command line, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl ListArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == Some(0) {
            return Err("Limit must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl ImageArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.repeat == 0 {
            return Err("Repeat count must be greater than 0".to_string());
        }
        Ok(())
    }
}
