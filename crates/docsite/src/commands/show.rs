//! `docsite show` command implementation.

use std::sync::Arc;

use clap::Args;
use docsite_config::Config;
use docsite_content::{CacheOptions, ContentCache, ContentLoader, ContentType, FsSource};
use serde_json::Value;

use super::{ConfigArgs, load_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// URL path to load (`/docs/mirascope/`, `/blog/launch`, `/privacy`).
    route: String,

    /// Print only the metadata.
    #[arg(long)]
    meta_only: bool,
}

impl ShowArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;
        let loader = build_loader(&config);

        let content_type = ContentType::for_url(&self.route);
        output.info(&format!(
            "Loading {content_type} content for {} ({:?} mode)",
            self.route, config.mode
        ));

        let (meta, code) = match content_type {
            ContentType::Doc => {
                let registry = load_registry(&config)?;
                let content = loader.load_doc(&registry, &self.route)?;
                (serde_json::to_value(content.meta)?, content.mdx.code)
            }
            ContentType::Blog => {
                let content = loader.load_blog(&self.route, &config.site.default_author)?;
                (serde_json::to_value(content.meta)?, content.mdx.code)
            }
            ContentType::Policy => {
                let content = loader.load_policy(&self.route)?;
                (serde_json::to_value(content.meta)?, content.mdx.code)
            }
            ContentType::Dev => {
                let content = loader.load_dev(&self.route)?;
                (serde_json::to_value(content.meta)?, content.mdx.code)
            }
        };

        print_content(&output, &meta, &code, self.meta_only)
    }
}

/// Loader reading raw sources in development mode and static JSON otherwise.
fn build_loader(config: &Config) -> ContentLoader {
    let source = FsSource::new()
        .mount("/content", &config.paths.content_root)
        .mount("/static", config.paths.static_dir());
    let mut loader = ContentLoader::new(Arc::new(source), config.mode);
    if config.cache.enabled {
        let options = CacheOptions::from_config(&config.cache, config.mode);
        loader = loader.with_cache(Arc::new(ContentCache::new(options)));
    }
    loader
}

fn print_content(
    output: &Output,
    meta: &Value,
    code: &str,
    meta_only: bool,
) -> Result<(), CliError> {
    output.result(&serde_json::to_string_pretty(meta)?);
    if !meta_only {
        output.result("");
        output.result(code);
    }
    Ok(())
}
