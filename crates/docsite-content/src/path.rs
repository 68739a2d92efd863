//! URL path to content path resolution.
//!
//! Content is addressed three ways:
//! - URL path: `/docs/mirascope/getting-started`
//! - Normalized path: `mirascope/getting-started.mdx`, relative to the type's
//!   source directory
//! - Resolved path: `/content/doc/mirascope/getting-started.mdx` in
//!   development, `/static/content/doc/mirascope/getting-started.json` in
//!   production

use docsite_config::ContentMode;

use crate::content_type::ContentType;
use crate::error::ContentError;

const MDX_EXT: &str = ".mdx";
const INDEX_FILE: &str = "index.mdx";

/// Convert a URL path into a content path relative to the type's directory.
///
/// ```
/// use docsite_content::{ContentType, normalize_path};
///
/// assert_eq!(normalize_path("/docs", ContentType::Doc), "index.mdx");
/// assert_eq!(normalize_path("/docs/mirascope/", ContentType::Doc), "mirascope/index.mdx");
/// assert_eq!(normalize_path("/privacy", ContentType::Policy), "privacy.mdx");
/// ```
#[must_use]
pub fn normalize_path(path: &str, content_type: ContentType) -> String {
    let path = path.replace('\\', "/");

    let rest = match content_type.url_root() {
        Some(root) if content_type.owns_url(&path) => &path[root.len()..],
        _ => path.as_str(),
    };

    let trailing_slash = rest.ends_with('/');
    let trimmed = rest.trim_matches('/');

    if trimmed.is_empty() {
        return INDEX_FILE.to_owned();
    }
    if trailing_slash {
        return format!("{trimmed}/{INDEX_FILE}");
    }
    if trimmed.ends_with(MDX_EXT) {
        return trimmed.to_owned();
    }
    format!("{trimmed}{MDX_EXT}")
}

/// Check whether `path` belongs to `content_type`.
///
/// Doc, blog, and dev paths must sit under their URL root. Policy paths must
/// be absolute and must not fall under another type's root.
///
/// # Errors
///
/// Returns [`ContentError::InvalidPath`] for an empty path. A non-empty path
/// with the wrong prefix is not an error; it yields `Ok(false)`.
pub fn is_valid_path(path: &str, content_type: ContentType) -> Result<bool, ContentError> {
    if path.trim().is_empty() {
        return Err(ContentError::invalid_path(content_type, path));
    }

    let valid = match content_type {
        ContentType::Policy => {
            path.starts_with('/') && !ContentType::ALL.iter().any(|ty| ty.owns_url(path))
        }
        _ => content_type.owns_url(path),
    };
    Ok(valid)
}

/// Development source path for a normalized content path.
#[must_use]
pub fn build_file_path(normalized: &str, content_type: ContentType) -> String {
    format!("/content/{content_type}/{normalized}")
}

/// Production static path for a normalized content path.
#[must_use]
pub fn build_static_path(normalized: &str, content_type: ContentType) -> String {
    let stem = normalized.strip_suffix(MDX_EXT).unwrap_or(normalized);
    format!("/static/content/{content_type}/{stem}.json")
}

/// Resolve a URL path to the location its content is fetched from.
///
/// ```
/// use docsite_config::ContentMode;
/// use docsite_content::{ContentType, resolve_content_path};
///
/// assert_eq!(
///     resolve_content_path("/docs/mirascope/", ContentType::Doc, ContentMode::Development),
///     "/content/doc/mirascope/index.mdx"
/// );
/// assert_eq!(
///     resolve_content_path("/blog/new-release", ContentType::Blog, ContentMode::Production),
///     "/static/content/blog/new-release.json"
/// );
/// ```
#[must_use]
pub fn resolve_content_path(path: &str, content_type: ContentType, mode: ContentMode) -> String {
    let normalized = normalize_path(path, content_type);
    if mode.is_dev() {
        build_file_path(&normalized, content_type)
    } else {
        build_static_path(&normalized, content_type)
    }
}

/// URL path served for a normalized content path.
///
/// Index files map to their directory with a trailing slash.
#[must_use]
pub fn canonical_url(normalized: &str, content_type: ContentType) -> String {
    let stem = normalized.strip_suffix(MDX_EXT).unwrap_or(normalized);
    let root = content_type.url_root().unwrap_or("");

    let tail = if stem == "index" {
        String::from("/")
    } else if let Some(dir) = stem.strip_suffix("/index") {
        format!("/{dir}/")
    } else {
        format!("/{stem}")
    };

    if root.is_empty() || tail != "/" {
        format!("{root}{tail}")
    } else {
        root.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_doc_paths() {
        let cases = [
            ("/docs", "index.mdx"),
            ("/docs/", "index.mdx"),
            ("/docs/mirascope", "mirascope.mdx"),
            ("/docs/mirascope/", "mirascope/index.mdx"),
            ("/docs/mirascope/getting-started", "mirascope/getting-started.mdx"),
            (
                "/docs/mirascope/getting-started/",
                "mirascope/getting-started/index.mdx",
            ),
            ("/docs/mirascope/index", "mirascope/index.mdx"),
            ("/docs/mirascope/index.mdx", "mirascope/index.mdx"),
            ("/docs/index", "index.mdx"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_path(input, ContentType::Doc), expected, "{input}");
        }
    }

    #[test]
    fn test_normalize_blog_and_policy_paths() {
        assert_eq!(normalize_path("/blog", ContentType::Blog), "index.mdx");
        assert_eq!(normalize_path("/blog/", ContentType::Blog), "index.mdx");
        assert_eq!(
            normalize_path("/blog/2023/year-review", ContentType::Blog),
            "2023/year-review.mdx"
        );
        assert_eq!(normalize_path("/privacy", ContentType::Policy), "privacy.mdx");
        assert_eq!(
            normalize_path("/terms/service", ContentType::Policy),
            "terms/service.mdx"
        );
        assert_eq!(normalize_path("/dev/style-guide", ContentType::Dev), "style-guide.mdx");
    }

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(
            normalize_path("/docs/windows\\style\\path", ContentType::Doc),
            "windows/style/path.mdx"
        );
    }

    #[test]
    fn test_root_stripping_is_segment_aware() {
        assert_eq!(normalize_path("/docsearch", ContentType::Doc), "docsearch.mdx");
    }

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/docs", ContentType::Doc).unwrap());
        assert!(is_valid_path("/docs/mirascope/getting-started", ContentType::Doc).unwrap());
        assert!(!is_valid_path("/other", ContentType::Doc).unwrap());
        assert!(!is_valid_path("/blog/post", ContentType::Doc).unwrap());

        assert!(is_valid_path("/blog/", ContentType::Blog).unwrap());
        assert!(!is_valid_path("/docs/guide", ContentType::Blog).unwrap());

        assert!(is_valid_path("/privacy", ContentType::Policy).unwrap());
        assert!(is_valid_path("/terms/service", ContentType::Policy).unwrap());
        assert!(!is_valid_path("no-leading-slash", ContentType::Policy).unwrap());
        assert!(!is_valid_path("/docs/mirascope", ContentType::Policy).unwrap());
    }

    #[test]
    fn test_empty_path_is_an_error() {
        for ty in ContentType::ALL {
            let err = is_valid_path("", ty).unwrap_err();
            assert!(matches!(err, ContentError::InvalidPath { .. }));
        }
    }

    #[test]
    fn test_build_file_path() {
        assert_eq!(
            build_file_path("mirascope/getting-started.mdx", ContentType::Doc),
            "/content/doc/mirascope/getting-started.mdx"
        );
        assert_eq!(
            build_file_path("terms/service.mdx", ContentType::Policy),
            "/content/policy/terms/service.mdx"
        );
    }

    #[test]
    fn test_resolve_production_paths() {
        assert_eq!(
            resolve_content_path(
                "/docs/mirascope/getting-started",
                ContentType::Doc,
                ContentMode::Production,
            ),
            "/static/content/doc/mirascope/getting-started.json"
        );
        assert_eq!(
            resolve_content_path("/privacy", ContentType::Policy, ContentMode::Production),
            "/static/content/policy/privacy.json"
        );
    }

    #[test]
    fn test_canonical_url() {
        assert_eq!(canonical_url("mirascope/index.mdx", ContentType::Doc), "/docs/mirascope/");
        assert_eq!(
            canonical_url("mirascope/learn/calls.mdx", ContentType::Doc),
            "/docs/mirascope/learn/calls"
        );
        assert_eq!(canonical_url("index.mdx", ContentType::Doc), "/docs");
        assert_eq!(canonical_url("new-release.mdx", ContentType::Blog), "/blog/new-release");
        assert_eq!(canonical_url("privacy.mdx", ContentType::Policy), "/privacy");
        assert_eq!(canonical_url("index.mdx", ContentType::Policy), "/");
    }

    #[test]
    fn test_canonical_url_inverts_normalize() {
        for url in ["/docs/mirascope/", "/docs/mirascope/learn/calls", "/blog/new-release"] {
            let ty = if url.starts_with("/blog") {
                ContentType::Blog
            } else {
                ContentType::Doc
            };
            assert_eq!(canonical_url(&normalize_path(url, ty), ty), url);
        }
    }
}
