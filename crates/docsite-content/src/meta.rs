//! Typed content metadata and required-field validation.

use docsite_spec::{DocInfo, ValidationResult};
use serde::{Deserialize, Serialize};

use crate::content_type::ContentType;
use crate::frontmatter::{Frontmatter, fm_str};

/// Metadata shared by every content type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl ContentMeta {
    /// Base metadata with `title` and `description` taken from frontmatter.
    ///
    /// The slug is the last path segment; a missing title stays empty so
    /// validation reports it.
    #[must_use]
    pub fn from_frontmatter(
        frontmatter: &Frontmatter,
        path: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        let path = path.into();
        let slug = path.rsplit('/').next().unwrap_or_default().to_owned();
        Self {
            title: fm_str(frontmatter, "title").unwrap_or_default(),
            description: fm_str(frontmatter, "description"),
            path,
            slug,
            content_type,
        }
    }
}

/// Documentation page metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMeta {
    #[serde(flatten)]
    pub base: ContentMeta,
    pub product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub has_extractable_snippets: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_weight: Option<f64>,
}

impl DocMeta {
    /// Metadata for a registered page. Frontmatter `title` and `description`
    /// override the label from the docs tree.
    #[must_use]
    pub fn from_doc_info(doc: &DocInfo, frontmatter: &Frontmatter) -> Self {
        Self {
            base: ContentMeta {
                title: fm_str(frontmatter, "title").unwrap_or_else(|| doc.label.clone()),
                description: fm_str(frontmatter, "description"),
                path: doc.path.clone(),
                slug: doc.slug.clone(),
                content_type: ContentType::Doc,
            },
            product: doc.product.clone(),
            section: None,
            has_extractable_snippets: doc.has_extractable_snippets,
            search_weight: Some(doc.search_weight),
        }
    }

    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

/// Blog post metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogMeta {
    #[serde(flatten)]
    pub base: ContentMeta,
    pub date: String,
    pub author: String,
    pub read_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl BlogMeta {
    /// Build from frontmatter, falling back to `default_author`.
    #[must_use]
    pub fn from_frontmatter(
        frontmatter: &Frontmatter,
        path: impl Into<String>,
        default_author: &str,
    ) -> Self {
        Self {
            base: ContentMeta::from_frontmatter(frontmatter, path, ContentType::Blog),
            date: fm_str(frontmatter, "date").unwrap_or_default(),
            author: fm_str(frontmatter, "author").unwrap_or_else(|| default_author.to_owned()),
            read_time: fm_str(frontmatter, "readTime").unwrap_or_default(),
            last_updated: fm_str(frontmatter, "lastUpdated"),
        }
    }
}

/// Policy page metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyMeta {
    #[serde(flatten)]
    pub base: ContentMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl PolicyMeta {
    #[must_use]
    pub fn from_frontmatter(frontmatter: &Frontmatter, path: impl Into<String>) -> Self {
        Self {
            base: ContentMeta::from_frontmatter(frontmatter, path, ContentType::Policy),
            last_updated: fm_str(frontmatter, "lastUpdated"),
        }
    }
}

/// Access to the fields checked by [`validate_metadata`].
pub trait Metadata {
    fn base(&self) -> &ContentMeta;

    /// Type-specific required fields as `(name, value)` pairs.
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

impl Metadata for ContentMeta {
    fn base(&self) -> &ContentMeta {
        self
    }
}

impl Metadata for DocMeta {
    fn base(&self) -> &ContentMeta {
        &self.base
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("product", &self.product)]
    }
}

impl Metadata for BlogMeta {
    fn base(&self) -> &ContentMeta {
        &self.base
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("date", &self.date),
            ("author", &self.author),
            ("readTime", &self.read_time),
        ]
    }
}

impl Metadata for PolicyMeta {
    fn base(&self) -> &ContentMeta {
        &self.base
    }
}

/// Check that base and type-specific required fields are non-empty.
#[must_use]
pub fn validate_metadata<M: Metadata + ?Sized>(meta: &M) -> ValidationResult {
    let base = meta.base();
    let mut errors = Vec::new();

    for (name, value) in [("title", &base.title), ("slug", &base.slug), ("path", &base.path)] {
        if value.trim().is_empty() {
            errors.push(format!("Missing required field: {name}"));
        }
    }

    for (name, value) in meta.required_fields() {
        if value.trim().is_empty() {
            errors.push(format!(
                "Missing required field for {}: {name}",
                base.content_type
            ));
        }
    }

    ValidationResult::from_errors(errors)
}
