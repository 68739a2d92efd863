//! `docsite preprocess` and `docsite sitemap`.

use clap::Args;
use docsite_build::{ContentPreprocessor, MetadataIndex, SitemapBuilder};
use docsite_config::Config;

use super::{ConfigArgs, load_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preprocess command.
#[derive(Args)]
pub(crate) struct PreprocessArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Skip sitemap generation.
    #[arg(long)]
    no_sitemap: bool,
}

impl PreprocessArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        output.info(&format!("Content: {}", config.paths.content_root.display()));
        output.info(&format!("Output: {}", config.paths.static_dir().display()));

        let preprocessor =
            ContentPreprocessor::new(&config.paths.content_root, &config.paths.public_dir);
        let index = preprocessor.process_all()?;
        output.success(&format!(
            "Preprocessed {} file(s): {} doc, {} blog, {} policy, {} dev",
            index.len(),
            index.doc.len(),
            index.blog.len(),
            index.policy.len(),
            index.dev.len()
        ));

        if !self.no_sitemap {
            write_sitemap(&output, &config, &index)?;
        }
        Ok(())
    }
}

/// Arguments for the sitemap command.
#[derive(Args)]
pub(crate) struct SitemapArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl SitemapArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        let index = MetadataIndex::read(&config.paths.static_dir())?;
        if index.is_empty() {
            output.warning("No metadata indexes found; run `docsite preprocess` first");
        }
        write_sitemap(&output, &config, &index)
    }
}

fn write_sitemap(output: &Output, config: &Config, index: &MetadataIndex) -> Result<(), CliError> {
    let registry = load_registry(config)?;
    let builder = SitemapBuilder::new(&config.site.url, &registry, index);
    let count = builder.routes().len();
    let path = builder.write(&config.paths.public_dir)?;
    output.success(&format!(
        "Sitemap generated with {count} URL(s): {}",
        path.display()
    ));
    Ok(())
}
