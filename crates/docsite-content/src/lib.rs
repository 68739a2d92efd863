//! Content resolution and loading for docsite.
//!
//! This crate provides:
//! - [`ContentType`] and the URL path to content path mapping
//! - [`ContentError`] and [`handle_content_error`] classification
//! - Frontmatter parsing and typed metadata with validation
//! - [`ContentCache`]: LRU cache with expiry and hit/miss stats
//! - [`ContentSource`] implementations and the [`ContentLoader`] pipeline
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use docsite_config::ContentMode;
//! use docsite_content::{ContentLoader, FsSource};
//!
//! let source = FsSource::new().mount("/content", "content");
//! let loader = ContentLoader::new(Arc::new(source), ContentMode::Development);
//! let policy = loader.load_policy("/privacy").unwrap();
//! println!("{}", policy.meta.base.title);
//! ```

mod cache;
mod content_type;
mod error;
mod frontmatter;
mod loader;
mod meta;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod path;
mod source;

pub use cache::{CacheOptions, CacheStats, ContentCache};
pub use content_type::ContentType;
pub use error::{BoxError, ContentError, handle_content_error};
pub use frontmatter::{Frontmatter, ParsedContent, fm_str, merge_frontmatter, parse_frontmatter};
pub use loader::{
    CompiledMdx, Content, ContentLoader, MdxCompiler, PassthroughCompiler, StaticContent,
};
pub use meta::{BlogMeta, ContentMeta, DocMeta, Metadata, PolicyMeta, validate_metadata};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
pub use path::{
    build_file_path, build_static_path, canonical_url, is_valid_path, normalize_path,
    resolve_content_path,
};
pub use source::{ContentSource, FsSource, SourceError, SourceErrorKind};
