//! docsite CLI - documentation site content toolkit.
//!
//! Provides commands for:
//! - `validate`: Check the docs spec
//! - `routes`: List documentation routes
//! - `convert`: Convert between the spec and legacy formats
//! - `show`: Load one page through the content pipeline
//! - `preprocess`: Build static content JSON, metadata indexes and the sitemap
//! - `sitemap`: Rebuild the sitemap from existing indexes
//! - `llms`: Generate LLM templates and documents

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use commands::{
    ConvertArgs, LlmsArgs, PreprocessArgs, RoutesArgs, ShowArgs, SitemapArgs, ValidateArgs,
};
use output::Output;

/// docsite - documentation site content toolkit.
#[derive(Parser)]
#[command(name = "docsite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the docs spec.
    Validate(ValidateArgs),
    /// List documentation routes.
    Routes(RoutesArgs),
    /// Convert a docs spec to or from the legacy format.
    Convert(ConvertArgs),
    /// Load and print a page.
    Show(ShowArgs),
    /// Preprocess content into static JSON.
    Preprocess(PreprocessArgs),
    /// Generate sitemap.xml.
    Sitemap(SitemapArgs),
    /// Generate LLM templates and documents.
    Llms(LlmsArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Validate(args) => args.config.verbose,
            Self::Routes(args) => args.config.verbose,
            Self::Convert(args) => args.verbose,
            Self::Show(args) => args.config.verbose,
            Self::Preprocess(args) => args.config.verbose,
            Self::Sitemap(args) => args.config.verbose,
            Self::Llms(args) => args.config.verbose,
        }
    }
}

/// Parse `RUST_LOG`-style directives on top of a WARN default.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        log_filter(&std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => args.execute(),
        Commands::Routes(args) => args.execute(),
        Commands::Convert(args) => args.execute(),
        Commands::Show(args) => args.execute(),
        Commands::Preprocess(args) => args.execute(),
        Commands::Sitemap(args) => args.execute(),
        Commands::Llms(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter("").max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_filter_keeps_directives() {
        assert_eq!(log_filter("docsite_build=debug").max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
