//! Top Movies CLI application
//!
//! Command-line front end for browsing the top-ranked movie list and loading
//! poster images through the in-memory caches.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use top_movies::cli::{handle_config, handle_details, handle_image, handle_list, Cli, Commands};
use top_movies::config::AppConfig;
use top_movies::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("Top Movies v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::List(args) => {
            info!("Executing list command");
            handle_list(args, &config).await
        }
        Commands::Image(args) => {
            info!("Executing image command");
            handle_image(args, &config).await
        }
        Commands::Details(args) => {
            info!("Executing details command");
            handle_details(args, &config).await
        }
        Commands::Config(args) => handle_config(args, &config).await,
    }
}

/// Initialize logging from CLI verbosity, falling back to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let mut filter = EnvFilter::from_default_env();
    let directive = crate_directive(
        cli.log_level(),
        &config.logging.level,
        rust_log.as_deref(),
    );
    if let Some(directive) = directive {
        match directive.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring log directive {:?}: {}", directive, e),
        }
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

/// Directive for this crate's own log level
///
/// A level from the command line always applies. The configured level only
/// applies when `RUST_LOG` is unset or empty.
fn crate_directive(
    cli_level: Option<tracing::Level>,
    config_level: &str,
    rust_log: Option<&str>,
) -> Option<String> {
    let rust_log_set = rust_log.is_some_and(|value| !value.trim().is_empty());
    let level = match cli_level {
        Some(level) => level.to_string(),
        None if !rust_log_set => config_level.to_string(),
        None => return None,
    };
    Some(format!("top_movies={}", level.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_configured_level_without_rust_log() {
        assert_eq!(
            crate_directive(None, "WARN", None).as_deref(),
            Some("top_movies=warn")
        );
        assert_eq!(
            crate_directive(None, "warn", Some("  ")).as_deref(),
            Some("top_movies=warn")
        );
    }

    #[test]
    fn test_rust_log_overrides_configured_level() {
        assert_eq!(crate_directive(None, "warn", Some("top_movies=trace")), None);
    }

    #[test]
    fn test_cli_level_overrides_rust_log() {
        assert_eq!(
            crate_directive(Some(Level::DEBUG), "warn", Some("top_movies=trace")).as_deref(),
            Some("top_movies=debug")
        );
    }
}
