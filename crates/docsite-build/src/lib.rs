//! Static build steps for docsite.
//!
//! - [`ContentPreprocessor`]: MDX sources to `{meta, content}` JSON plus
//!   per-type metadata indexes
//! - [`SitemapBuilder`]: `sitemap.xml` from the doc registry and indexes
//!
//! ```no_run
//! use docsite_build::{ContentPreprocessor, SitemapBuilder};
//! use docsite_spec::DocRegistry;
//! use std::path::Path;
//!
//! let index = ContentPreprocessor::new("content", "public").process_all()?;
//! let registry = DocRegistry::from_file(Path::new("content/doc/_meta.yaml"), true)?;
//! SitemapBuilder::new("https://mirascope.com", &registry, &index).write(Path::new("public"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod preprocess;
mod sitemap;

pub use error::BuildError;
pub use preprocess::{ContentPreprocessor, MetadataIndex};
pub use sitemap::{ChangeFreq, SITEMAP_NS, SitemapBuilder, SitemapEntry};
