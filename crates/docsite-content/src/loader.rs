//! Content loading pipeline.
//!
//! [`ContentLoader::load_content`] runs, in order: path validation,
//! content-path resolution for the current mode, raw fetch (through the
//! cache), frontmatter separation, metadata construction and validation,
//! and MDX compilation. Every failure leaves through
//! [`handle_content_error`].

use std::sync::Arc;

use docsite_config::ContentMode;
use docsite_spec::DocRegistry;
use serde::{Deserialize, Serialize};

use crate::cache::ContentCache;
use crate::content_type::ContentType;
use crate::error::{BoxError, ContentError, handle_content_error};
use crate::frontmatter::{Frontmatter, parse_frontmatter};
use crate::meta::{BlogMeta, ContentMeta, DocMeta, Metadata, PolicyMeta, validate_metadata};
use crate::path::{is_valid_path, normalize_path, resolve_content_path};
use crate::source::ContentSource;

/// Compiles an MDX body into renderable code.
pub trait MdxCompiler: Send + Sync {
    /// Compile `source`; frontmatter is available as render scope.
    fn compile(&self, source: &str, frontmatter: &Frontmatter) -> Result<String, BoxError>;
}

/// Compiler that returns the body unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughCompiler;

impl MdxCompiler for PassthroughCompiler {
    fn compile(&self, source: &str, _frontmatter: &Frontmatter) -> Result<String, BoxError> {
        Ok(source.to_owned())
    }
}

/// Static JSON file written for production serving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticContent<M = serde_json::Value> {
    #[serde(default)]
    pub meta: M,
    /// Full MDX source, frontmatter included.
    pub content: String,
}

/// Compiled MDX and the frontmatter it was compiled with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompiledMdx {
    pub code: String,
    pub frontmatter: Frontmatter,
}

/// Loaded and validated content.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Content<M> {
    pub meta: M,
    /// MDX body with frontmatter removed.
    pub content: String,
    pub mdx: CompiledMdx,
}

/// Loads content of any type from a [`ContentSource`].
pub struct ContentLoader {
    source: Arc<dyn ContentSource>,
    cache: Option<Arc<ContentCache>>,
    compiler: Box<dyn MdxCompiler>,
    mode: ContentMode,
}

impl ContentLoader {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, mode: ContentMode) -> Self {
        Self {
            source,
            cache: None,
            compiler: Box::new(PassthroughCompiler),
            mode,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ContentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_compiler(mut self, compiler: impl MdxCompiler + 'static) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    #[must_use]
    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    #[must_use]
    pub fn cache(&self) -> Option<&ContentCache> {
        self.cache.as_deref()
    }

    /// Fetch the raw MDX source for a URL path.
    ///
    /// In production the source is the `content` field of the static JSON
    /// file. Results are cached under the normalized path.
    pub fn load_raw(&self, path: &str, content_type: ContentType) -> Result<String, ContentError> {
        let normalized = normalize_path(path, content_type);

        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get(content_type, &normalized)
        {
            tracing::debug!(%content_type, path = %normalized, "Content cache hit");
            return Ok(cached);
        }

        let resolved = resolve_content_path(path, content_type, self.mode);
        let raw = self.source.fetch(&resolved).map_err(|err| {
            if err.is_not_found() {
                ContentError::not_found(content_type, &normalized)
            } else {
                handle_content_error(Box::new(err), content_type, &normalized)
            }
        })?;

        let content = if self.mode.is_dev() {
            raw
        } else {
            serde_json::from_str::<StaticContent>(&raw)
                .map_err(|err| ContentError::load(content_type, &normalized, err))?
                .content
        };

        if let Some(cache) = &self.cache {
            cache.set(content_type, &normalized, content.clone(), None);
        }
        Ok(content)
    }

    /// Run the full pipeline for a URL path.
    ///
    /// `create_meta` receives the frontmatter and the content path without
    /// its `.mdx` extension. `preprocess` rewrites the body before
    /// compilation.
    pub fn load_content<M, F>(
        &self,
        path: &str,
        content_type: ContentType,
        create_meta: F,
        preprocess: Option<&dyn Fn(&str) -> String>,
    ) -> Result<Content<M>, ContentError>
    where
        M: Metadata,
        F: FnOnce(&Frontmatter, &str) -> Result<M, ContentError>,
    {
        self.run_pipeline(path, content_type, create_meta, preprocess)
            .map_err(|err| handle_content_error(err, content_type, path))
    }

    fn run_pipeline<M, F>(
        &self,
        path: &str,
        content_type: ContentType,
        create_meta: F,
        preprocess: Option<&dyn Fn(&str) -> String>,
    ) -> Result<Content<M>, BoxError>
    where
        M: Metadata,
        F: FnOnce(&Frontmatter, &str) -> Result<M, ContentError>,
    {
        if !is_valid_path(path, content_type)? {
            return Err(ContentError::invalid_path(content_type, path).into());
        }

        let raw = self.load_raw(path, content_type)?;
        let parsed = parse_frontmatter(&raw);

        let normalized = normalize_path(path, content_type);
        let stem = normalized.strip_suffix(".mdx").unwrap_or(&normalized);
        let meta = create_meta(&parsed.frontmatter, stem)?;

        let validation = validate_metadata(&meta);
        if !validation.is_valid {
            return Err(ContentError::metadata(
                content_type,
                path,
                format!("Invalid metadata: {}", validation.errors.join(", ")),
            )
            .into());
        }

        let body = match preprocess {
            Some(preprocess) => preprocess(&parsed.content),
            None => parsed.content.clone(),
        };
        let code = self.compiler.compile(&body, &parsed.frontmatter)?;

        tracing::debug!(%content_type, path, "Loaded content");
        Ok(Content {
            meta,
            content: parsed.content,
            mdx: CompiledMdx {
                code,
                frontmatter: parsed.frontmatter,
            },
        })
    }

    /// Load a registered documentation page by route.
    pub fn load_doc(
        &self,
        registry: &DocRegistry,
        route: &str,
    ) -> Result<Content<DocMeta>, ContentError> {
        let doc = registry
            .doc_by_route_path(route)
            .ok_or_else(|| ContentError::not_found(ContentType::Doc, route))?;

        let section = doc.path.split('/').nth(1).and_then(|candidate| {
            registry
                .product_spec(&doc.product)?
                .sections
                .iter()
                .find(|s| !s.is_default() && s.slug == candidate)
                .map(|s| s.slug.clone())
        });

        self.load_content(
            &doc.route_path,
            ContentType::Doc,
            |frontmatter, _| {
                let meta = DocMeta::from_doc_info(doc, frontmatter);
                Ok(match section {
                    Some(section) => meta.with_section(section),
                    None => meta,
                })
            },
            None,
        )
    }

    /// Load a blog post by route (`/blog/<slug>`).
    pub fn load_blog(
        &self,
        route: &str,
        default_author: &str,
    ) -> Result<Content<BlogMeta>, ContentError> {
        self.load_content(
            route,
            ContentType::Blog,
            |frontmatter, path| Ok(BlogMeta::from_frontmatter(frontmatter, path, default_author)),
            None,
        )
    }

    /// Load a policy page by route (`/privacy`, `/terms/service`).
    pub fn load_policy(&self, route: &str) -> Result<Content<PolicyMeta>, ContentError> {
        self.load_content(
            route,
            ContentType::Policy,
            |frontmatter, path| Ok(PolicyMeta::from_frontmatter(frontmatter, path)),
            Some(&strip_source_map_comments),
        )
    }

    /// Load a development page by route (`/dev/<slug>`).
    pub fn load_dev(&self, route: &str) -> Result<Content<ContentMeta>, ContentError> {
        self.load_content(
            route,
            ContentType::Dev,
            |frontmatter, path| {
                Ok(ContentMeta::from_frontmatter(frontmatter, path, ContentType::Dev))
            },
            None,
        )
    }
}

/// Remove `//# sourceMappingURL=` lines left behind by bundlers.
fn strip_source_map_comments(body: &str) -> String {
    body.lines()
        .filter(|line| !line.trim_start().starts_with("//# sourceMappingURL="))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheOptions;
    use crate::mock::MockSource;
    use docsite_spec::{DocSpec, ProductSpec, SectionSpec};
    use pretty_assertions::assert_eq;

    const CALLS_MDX: &str = "---\ntitle: Calls\ndescription: Making calls\n---\n\n# Calls";

    fn registry() -> DocRegistry {
        DocRegistry::new(vec![ProductSpec::new(
            "mirascope",
            vec![
                SectionSpec::new(
                    "index",
                    "Docs",
                    vec![
                        DocSpec::page("index", "Welcome"),
                        DocSpec::folder("learn", "Learn", vec![DocSpec::page("calls", "Calls")]),
                    ],
                ),
                SectionSpec::new("api", "API", vec![DocSpec::page("index", "API Reference")]),
            ],
        )])
    }

    fn dev_loader(source: MockSource) -> ContentLoader {
        ContentLoader::new(Arc::new(source), ContentMode::Development)
    }

    #[test]
    fn test_load_doc_in_development() {
        let loader = dev_loader(
            MockSource::new().with_file("/content/doc/mirascope/learn/calls.mdx", CALLS_MDX),
        );

        let content = loader
            .load_doc(&registry(), "/docs/mirascope/learn/calls")
            .unwrap();
        assert_eq!(content.meta.base.title, "Calls");
        assert_eq!(content.meta.base.description.as_deref(), Some("Making calls"));
        assert_eq!(content.meta.section, None);
        assert_eq!(content.content, "# Calls");
        assert_eq!(content.mdx.code, "# Calls");
        assert_eq!(content.mdx.frontmatter["title"], "Calls");
    }

    #[test]
    fn test_load_doc_sets_section() {
        let loader = dev_loader(
            MockSource::new().with_file("/content/doc/mirascope/api/index.mdx", "# API"),
        );
        let content = loader.load_doc(&registry(), "/docs/mirascope/api/").unwrap();
        assert_eq!(content.meta.section.as_deref(), Some("api"));
        assert_eq!(content.meta.base.title, "API Reference");
    }

    #[test]
    fn test_load_doc_in_production_reads_json_content() {
        let json = serde_json::json!({"meta": {}, "content": CALLS_MDX}).to_string();
        let source = MockSource::new()
            .with_file("/static/content/doc/mirascope/learn/calls.json", json);
        let loader = ContentLoader::new(Arc::new(source), ContentMode::Production);

        let content = loader
            .load_doc(&registry(), "/docs/mirascope/learn/calls")
            .unwrap();
        assert_eq!(content.content, "# Calls");
    }

    #[test]
    fn test_unregistered_doc_is_not_found() {
        let loader = dev_loader(MockSource::new());
        let err = loader.load_doc(&registry(), "/docs/mirascope/nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let loader = dev_loader(MockSource::new());
        let err = loader.load_doc(&registry(), "/docs/mirascope/").unwrap_err();
        assert_eq!(err.to_string(), "doc document not found: mirascope/index.mdx");
    }

    #[test]
    fn test_invalid_path() {
        let loader = dev_loader(MockSource::new());
        let err = loader.load_blog("/docs/x", "Team").unwrap_err();
        assert!(matches!(err, ContentError::InvalidPath { .. }));

        let err = loader.load_blog("", "Team").unwrap_err();
        assert!(matches!(err, ContentError::InvalidPath { .. }));
    }

    #[test]
    fn test_metadata_failure() {
        let loader = dev_loader(MockSource::new().with_file(
            "/content/blog/release.mdx",
            "---\ntitle: Release\n---\nBody",
        ));
        let err = loader.load_blog("/blog/release", "Team").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to process blog metadata: /blog/release - Invalid metadata: \
             Missing required field for blog: date, Missing required field for blog: readTime"
        );
    }

    #[test]
    fn test_source_failure_is_wrapped() {
        let loader = dev_loader(
            MockSource::new().with_failure("/content/policy/privacy.mdx", "connection reset"),
        );
        let err = loader.load_policy("/privacy").unwrap_err();
        assert!(matches!(err, ContentError::ContentLoad { .. }));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_invalid_production_json() {
        let source = MockSource::new().with_file("/static/content/policy/privacy.json", "not json");
        let loader = ContentLoader::new(Arc::new(source), ContentMode::Production);
        let err = loader.load_policy("/privacy").unwrap_err();
        assert!(matches!(err, ContentError::ContentLoad { .. }));
    }

    #[test]
    fn test_policy_strips_source_maps() {
        let loader = dev_loader(MockSource::new().with_file(
            "/content/policy/privacy.mdx",
            "---\ntitle: Privacy\n---\n# Privacy\n//# sourceMappingURL=x.map",
        ));
        let content = loader.load_policy("/privacy").unwrap();
        assert_eq!(content.mdx.code, "# Privacy");
        assert_eq!(content.meta.base.slug, "privacy");
    }

    #[test]
    fn test_cache_avoids_refetch() {
        let source = Arc::new(
            MockSource::new().with_file("/content/dev/style.mdx", "---\ntitle: Style\n---\nX"),
        );
        let cache = Arc::new(ContentCache::new(CacheOptions::default()));
        let loader = ContentLoader::new(
            Arc::clone(&source) as Arc<dyn ContentSource>,
            ContentMode::Development,
        )
        .with_cache(Arc::clone(&cache));

        loader.load_dev("/dev/style").unwrap();
        loader.load_dev("/dev/style").unwrap();
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_compiler_errors_are_wrapped() {
        struct Failing;
        impl MdxCompiler for Failing {
            fn compile(&self, _: &str, _: &Frontmatter) -> Result<String, BoxError> {
                Err("unexpected closing tag".into())
            }
        }

        let loader = dev_loader(
            MockSource::new().with_file("/content/dev/a.mdx", "---\ntitle: A\n---\n</div>"),
        )
        .with_compiler(Failing);
        let err = loader.load_dev("/dev/a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load dev content: /dev/a - unexpected closing tag"
        );
    }
}
