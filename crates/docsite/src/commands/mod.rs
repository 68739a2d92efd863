//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod llms;
pub(crate) mod show;
pub(crate) mod spec;

use std::path::PathBuf;

use clap::Args;
use docsite_config::{CliSettings, Config};
use docsite_spec::DocRegistry;

use crate::error::CliError;

pub(crate) use build::{PreprocessArgs, SitemapArgs};
pub(crate) use llms::LlmsArgs;
pub(crate) use show::ShowArgs;
pub(crate) use spec::{ConvertArgs, RoutesArgs, ValidateArgs};

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover docsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content root directory (overrides config).
    #[arg(long)]
    content_root: Option<PathBuf>,

    /// Docs spec file (overrides config).
    #[arg(long, env = "DOCSITE_DOCS_SPEC")]
    docs_spec: Option<PathBuf>,

    /// Public output directory (overrides config).
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Canonical site URL (overrides config).
    #[arg(long, env = "DOCSITE_SITE_URL")]
    site_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConfigArgs {
    /// Load configuration with command-line overrides applied.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            content_root: self.content_root.clone(),
            docs_spec: self.docs_spec.clone(),
            public_dir: self.public_dir.clone(),
            site_url: self.site_url.clone(),
            ..CliSettings::default()
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Load and validate the docs tree named by the configuration.
pub(crate) fn load_registry(config: &Config) -> Result<DocRegistry, CliError> {
    Ok(DocRegistry::from_file(&config.paths.docs_spec, true)?)
}
