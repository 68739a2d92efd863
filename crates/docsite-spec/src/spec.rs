//! Authored documentation tree and its flattened runtime form.
//!
//! A [`FullDocsSpec`] is an ordered list of products. Each product holds
//! sections, each section holds a tree of [`DocSpec`] nodes. Nodes with
//! `children` are folders; nodes without are pages. A section whose slug is
//! `"index"` is the product's default section and adds no URL segment.

use serde::{Deserialize, Serialize};

/// Slug that marks a default section or a folder's landing page.
pub const INDEX_SLUG: &str = "index";

/// Weight applied when a node does not set one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Ordered collection of product specs.
pub type FullDocsSpec = Vec<ProductSpec>;

/// One page or folder in the documentation tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSpec {
    /// URL segment (no slashes).
    pub slug: String,
    /// Sidebar label.
    pub label: String,
    /// Child nodes; present for folders only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_extractable_snippets: Option<bool>,
    /// Search weight multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl DocSpec {
    /// Create a page node.
    #[must_use]
    pub fn page(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            children: None,
            has_extractable_snippets: None,
            weight: None,
        }
    }

    /// Create a folder node.
    #[must_use]
    pub fn folder(
        slug: impl Into<String>,
        label: impl Into<String>,
        children: Vec<DocSpec>,
    ) -> Self {
        Self {
            children: Some(children),
            ..Self::page(slug, label)
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_snippets(mut self) -> Self {
        self.has_extractable_snippets = Some(true);
        self
    }

    /// Whether this node is a folder (has a `children` list, even an empty one).
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }

    /// Children of a folder, or an empty slice for a page.
    #[must_use]
    pub fn child_specs(&self) -> &[DocSpec] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Whether the node has at least one child.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.child_specs().is_empty()
    }

    #[must_use]
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }
}

/// Top-level navigation section of a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    pub slug: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<DocSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl SectionSpec {
    #[must_use]
    pub fn new(slug: impl Into<String>, label: impl Into<String>, children: Vec<DocSpec>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            children,
            weight: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Whether this is the product's default section.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.slug == INDEX_SLUG
    }

    #[must_use]
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Content path prefix for documents in this section.
    ///
    /// The default section contributes nothing beyond the product name.
    #[must_use]
    pub fn path_prefix(&self, product: &str) -> String {
        if self.is_default() {
            product.to_owned()
        } else {
            format!("{product}/{}", self.slug)
        }
    }
}

/// Documentation of one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpec {
    /// Product name, used as the first path segment.
    pub product: String,
    pub sections: Vec<SectionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl ProductSpec {
    #[must_use]
    pub fn new(product: impl Into<String>, sections: Vec<SectionSpec>) -> Self {
        Self {
            product: product.into(),
            sections,
            weight: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Find a section by slug.
    #[must_use]
    pub fn section(&self, slug: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.slug == slug)
    }
}

/// Kind tag carried by every [`DocInfo`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    #[default]
    Docs,
}

/// Flattened record for one documentation page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocInfo {
    pub label: String,
    /// Content-relative path (e.g. `mirascope/learn/calls`, `mirascope/index`).
    pub path: String,
    /// URL path (e.g. `/docs/mirascope/learn/calls`, `/docs/mirascope/`).
    pub route_path: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub product: String,
    pub has_extractable_snippets: bool,
    /// Product of every weight from the product down to this page.
    pub search_weight: f64,
}

/// Slug and title of a product section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub slug: String,
    pub title: String,
}
