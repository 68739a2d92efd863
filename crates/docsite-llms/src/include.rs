//! Include patterns and doc filtering.
//!
//! Patterns address docs by content path (`mirascope/learn/calls`), never by
//! URL. Three shapes are supported:
//!
//! | Pattern                   | Matches                                   |
//! |---------------------------|-------------------------------------------|
//! | `mirascope/index.mdx`     | exactly `mirascope/index`                 |
//! | `mirascope/learn/*.mdx`   | direct children of `mirascope/learn`      |
//! | `mirascope/learn/*`       | `mirascope/learn` and everything below it |

use std::path::{Path, PathBuf};

use docsite_content::{Frontmatter, fm_str, parse_frontmatter};
use docsite_spec::DocInfo;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

const MDX_EXT: &str = ".mdx";

/// Typed include matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncludePattern {
    /// A single doc path, without extension.
    Exact(String),
    /// Docs one level below `prefix`.
    DirectChildren { prefix: String },
    /// `prefix` itself and every doc below it.
    Recursive { prefix: String },
}

impl IncludePattern {
    /// Parse a route pattern string.
    ///
    /// ```
    /// use docsite_llms::IncludePattern;
    ///
    /// assert_eq!(
    ///     IncludePattern::parse("/mirascope/learn/*.mdx"),
    ///     IncludePattern::DirectChildren { prefix: "mirascope/learn".to_owned() }
    /// );
    /// assert_eq!(
    ///     IncludePattern::parse("mirascope/index.mdx"),
    ///     IncludePattern::Exact("mirascope/index".to_owned())
    /// );
    /// ```
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim_matches('/');
        if let Some(prefix) = pattern.strip_suffix("/*.mdx") {
            Self::DirectChildren {
                prefix: prefix.to_owned(),
            }
        } else if let Some(prefix) = pattern.strip_suffix("/*") {
            Self::Recursive {
                prefix: prefix.to_owned(),
            }
        } else {
            Self::Exact(pattern.strip_suffix(MDX_EXT).unwrap_or(pattern).to_owned())
        }
    }

    /// Whether a doc content path matches.
    #[must_use]
    pub fn matches(&self, doc_path: &str) -> bool {
        let path = doc_path.trim_matches('/');
        match self {
            Self::Exact(exact) => path == exact,
            Self::DirectChildren { prefix } => path
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
            Self::Recursive { prefix } => path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

/// How an [`IncludeDirective`] pattern is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeType {
    /// A single doc path.
    Exact,
    /// Direct children of a directory (`dir/*.mdx` or `dir/*`).
    Glob,
    /// A directory and everything below it (`dir/*` or `dir`).
    Wildcard,
}

/// Include entry of an LLM document section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeDirective {
    #[serde(rename = "type")]
    pub include_type: IncludeType,
    pub pattern: String,
}

impl IncludeDirective {
    #[must_use]
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self {
            include_type: IncludeType::Exact,
            pattern: pattern.into(),
        }
    }

    #[must_use]
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            include_type: IncludeType::Glob,
            pattern: pattern.into(),
        }
    }

    #[must_use]
    pub fn wildcard(pattern: impl Into<String>) -> Self {
        Self {
            include_type: IncludeType::Wildcard,
            pattern: pattern.into(),
        }
    }

    /// Matcher for this directive, or `None` for a glob without a `/*` suffix.
    #[must_use]
    pub fn to_pattern(&self) -> Option<IncludePattern> {
        let pattern = self.pattern.trim_matches('/');
        match self.include_type {
            IncludeType::Exact => Some(IncludePattern::Exact(
                pattern.strip_suffix(MDX_EXT).unwrap_or(pattern).to_owned(),
            )),
            IncludeType::Glob => pattern
                .strip_suffix("/*.mdx")
                .or_else(|| pattern.strip_suffix("/*"))
                .map(|prefix| IncludePattern::DirectChildren {
                    prefix: prefix.to_owned(),
                }),
            IncludeType::Wildcard => Some(IncludePattern::Recursive {
                prefix: pattern.strip_suffix("/*").unwrap_or(pattern).to_owned(),
            }),
        }
    }
}

/// Whether `doc_path` matches a route pattern string.
///
/// ```
/// use docsite_llms::matches_route_pattern;
///
/// assert!(matches_route_pattern("mirascope/learn/calls", "mirascope/learn/*.mdx"));
/// assert!(!matches_route_pattern("mirascope/learn/extensions/custom", "mirascope/learn/*.mdx"));
/// assert!(matches_route_pattern("mirascope/learn/calls", "mirascope/learn/*"));
/// ```
#[must_use]
pub fn matches_route_pattern(doc_path: &str, pattern: &str) -> bool {
    IncludePattern::parse(pattern).matches(doc_path)
}

/// Collect docs matching any pattern.
///
/// Patterns are applied in order and each contributes its matches in doc
/// order. A doc already collected by an earlier pattern is skipped.
#[must_use]
pub fn filter_docs<'a>(docs: &'a [DocInfo], patterns: &[IncludePattern]) -> Vec<&'a DocInfo> {
    let mut filtered: Vec<&DocInfo> = Vec::new();
    for pattern in patterns {
        for doc in docs.iter().filter(|doc| pattern.matches(&doc.path)) {
            if !filtered.iter().any(|seen| seen.path == doc.path) {
                filtered.push(doc);
            }
        }
    }
    filtered
}

/// [`filter_docs`] over route pattern strings.
#[must_use]
pub fn filter_docs_by_routes<'a, S: AsRef<str>>(
    docs: &'a [DocInfo],
    routes: &[S],
) -> Vec<&'a DocInfo> {
    let patterns: Vec<IncludePattern> = routes
        .iter()
        .map(|route| IncludePattern::parse(route.as_ref()))
        .collect();
    filter_docs(docs, &patterns)
}

/// Doc source read for inclusion.
#[derive(Debug)]
pub(crate) struct DocSource {
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl DocSource {
    /// Read `<docs_root>/<doc.path>.mdx`.
    pub(crate) fn read(docs_root: &Path, doc: &DocInfo) -> Result<Self, LlmError> {
        let file: PathBuf = docs_root.join(format!("{}{MDX_EXT}", doc.path));
        if !file.is_file() {
            return Err(LlmError::MissingDoc(file));
        }
        let raw = std::fs::read_to_string(&file).map_err(|e| LlmError::io(&file, e))?;
        let parsed = parse_frontmatter(&raw);
        Ok(Self {
            frontmatter: parsed.frontmatter,
            body: parsed.content,
        })
    }

    pub(crate) fn title(&self) -> Option<String> {
        fm_str(&self.frontmatter, "title")
    }

    pub(crate) fn description(&self) -> Option<String> {
        fm_str(&self.frontmatter, "description")
    }

    /// Body wrapped in a `<ContentSection>` element pointing at `url`.
    pub(crate) fn wrap(&self, url: &str) -> String {
        let mut out = String::from("<ContentSection");
        if let Some(title) = self.title() {
            out.push_str(&format!(" title=\"{title}\""));
        }
        if let Some(description) = self.description() {
            out.push_str(&format!(" description=\"{description}\""));
        }
        out.push_str(&format!(" url=\"{url}\">\n\n"));
        out.push_str(&self.body);
        out.push_str("\n\n</ContentSection>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsite_spec::{DocRegistry, DocSpec, ProductSpec, SectionSpec};
    use pretty_assertions::assert_eq;

    fn sample_docs() -> Vec<DocInfo> {
        DocRegistry::new(vec![ProductSpec::new(
            "mirascope",
            vec![SectionSpec::new(
                "index",
                "Docs",
                vec![
                    DocSpec::page("index", "Welcome"),
                    DocSpec::folder(
                        "learn",
                        "Learn",
                        vec![
                            DocSpec::page("index", "Overview"),
                            DocSpec::page("calls", "Calls"),
                            DocSpec::folder(
                                "extensions",
                                "Extensions",
                                vec![DocSpec::page("custom", "Custom")],
                            ),
                            DocSpec::page("prompts", "Prompts"),
                        ],
                    ),
                    DocSpec::page("learning", "Learning"),
                ],
            )],
        )])
        .all_docs()
    }

    fn paths(docs: &[&DocInfo]) -> Vec<String> {
        docs.iter().map(|d| d.path.clone()).collect()
    }

    #[test]
    fn test_parse_patterns() {
        assert_eq!(
            IncludePattern::parse("mirascope/learn/*"),
            IncludePattern::Recursive {
                prefix: "mirascope/learn".to_owned()
            }
        );
        assert_eq!(
            IncludePattern::parse("/mirascope/learn/calls/"),
            IncludePattern::Exact("mirascope/learn/calls".to_owned())
        );
    }

    #[test]
    fn test_direct_children_only() {
        assert!(matches_route_pattern("mirascope/learn/calls", "mirascope/learn/*.mdx"));
        assert!(!matches_route_pattern(
            "mirascope/learn/extensions/custom",
            "mirascope/learn/*.mdx"
        ));
        assert!(!matches_route_pattern("mirascope/learn", "mirascope/learn/*.mdx"));
    }

    #[test]
    fn test_recursive_is_segment_aware() {
        assert!(matches_route_pattern("mirascope/learn/extensions/custom", "mirascope/learn/*"));
        assert!(matches_route_pattern("mirascope/learn", "mirascope/learn/*"));
        assert!(!matches_route_pattern("mirascope/learning", "mirascope/learn/*"));
    }

    #[test]
    fn test_exact_strips_extension() {
        assert!(matches_route_pattern("mirascope/index", "mirascope/index.mdx"));
        assert!(matches_route_pattern("/mirascope/index/", "mirascope/index"));
        assert!(!matches_route_pattern("mirascope/index", "mirascope"));
    }

    #[test]
    fn test_filter_dedupes_in_pattern_order() {
        let docs = sample_docs();
        let filtered = filter_docs_by_routes(
            &docs,
            &["mirascope/learn/calls.mdx", "mirascope/learn/*", "mirascope/index.mdx"],
        );
        assert_eq!(
            paths(&filtered),
            vec![
                "mirascope/learn/calls",
                "mirascope/learn/index",
                "mirascope/learn/extensions/custom",
                "mirascope/learn/prompts",
                "mirascope/index",
            ]
        );
    }

    #[test]
    fn test_directive_patterns() {
        assert_eq!(
            IncludeDirective::glob("mirascope/learn/*").to_pattern(),
            Some(IncludePattern::DirectChildren {
                prefix: "mirascope/learn".to_owned()
            })
        );
        assert_eq!(
            IncludeDirective::wildcard("lilypad").to_pattern(),
            Some(IncludePattern::Recursive {
                prefix: "lilypad".to_owned()
            })
        );
        assert_eq!(IncludeDirective::glob("mirascope/learn").to_pattern(), None);
    }

    #[test]
    fn test_directive_serde() {
        let directive: IncludeDirective =
            serde_yaml::from_str("type: wildcard\npattern: lilypad/*").unwrap();
        assert_eq!(directive, IncludeDirective::wildcard("lilypad/*"));
    }

    #[test]
    fn test_wrap_content_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("mirascope/learn")).unwrap();
        std::fs::write(
            dir.path().join("mirascope/learn/calls.mdx"),
            "---\ntitle: Calls\ndescription: Making calls\n---\n# Calls",
        )
        .unwrap();

        let docs = sample_docs();
        let calls = docs.iter().find(|d| d.slug == "calls").unwrap();
        let source = DocSource::read(dir.path(), calls).unwrap();
        assert_eq!(
            source.wrap(&calls.route_path),
            "<ContentSection title=\"Calls\" description=\"Making calls\" \
             url=\"/docs/mirascope/learn/calls\">\n\n# Calls\n\n</ContentSection>"
        );
    }

    #[test]
    fn test_missing_doc_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let docs = sample_docs();
        let err = DocSource::read(dir.path(), &docs[0]).unwrap_err();
        assert!(matches!(err, LlmError::MissingDoc(_)));
    }
}
