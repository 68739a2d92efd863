//! Immutable lookup structure over a flattened docs spec.
//!
//! # Architecture
//!
//! Documents are stored once in a flat `Vec<DocInfo>` in tree order, and
//! lookups go through `HashMap` indices into that vector:
//! - content path (`mirascope/learn/calls`)
//! - route path, under both its trailing-slash and bare form
//! - product name into the owned spec
//!
//! The registry is built once and never mutated. Share it with `Arc`.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{SpecError, load_spec};
use crate::process::{get_docs_from_spec, process_doc_spec};
use crate::spec::{DocInfo, FullDocsSpec, ProductSpec, SectionSummary};

/// Flattened documentation with path and route lookups.
#[derive(Debug)]
pub struct DocRegistry {
    spec: FullDocsSpec,
    docs: Vec<DocInfo>,
    path_index: HashMap<String, usize>,
    route_index: HashMap<String, usize>,
    product_index: HashMap<String, usize>,
}

impl DocRegistry {
    /// Build the registry from a full spec.
    ///
    /// When two products share a name, lookups resolve to the first one.
    /// When two pages share a path or route, the later one wins.
    #[must_use]
    pub fn new(spec: FullDocsSpec) -> Self {
        let docs = get_docs_from_spec(&spec);

        let mut path_index = HashMap::with_capacity(docs.len());
        let mut route_index = HashMap::with_capacity(docs.len() * 2);
        for (idx, doc) in docs.iter().enumerate() {
            if let Some(prev) = path_index.insert(doc.path.clone(), idx) {
                tracing::warn!(
                    path = %doc.path,
                    previous = %docs[prev].label,
                    current = %doc.label,
                    "Duplicate document path"
                );
            }
            route_index.insert(doc.route_path.clone(), idx);
            let alternate = match doc.route_path.strip_suffix('/') {
                Some(bare) => bare.to_owned(),
                None => format!("{}/", doc.route_path),
            };
            route_index.insert(alternate, idx);
        }

        let mut product_index = HashMap::with_capacity(spec.len());
        for (idx, product) in spec.iter().enumerate() {
            product_index.entry(product.product.clone()).or_insert(idx);
        }

        tracing::debug!(
            products = spec.len(),
            documents = docs.len(),
            "Built doc registry"
        );

        Self {
            spec,
            docs,
            path_index,
            route_index,
            product_index,
        }
    }

    /// Load a spec file and build the registry.
    ///
    /// With `validate`, structural errors abort the load.
    pub fn from_file(path: &Path, validate: bool) -> Result<Self, SpecError> {
        let spec = load_spec(path)?;
        if validate {
            crate::validate_full_docs_spec(&spec).into_result()?;
        }
        Ok(Self::new(spec))
    }

    /// Copy of every document, in tree order.
    #[must_use]
    pub fn all_docs(&self) -> Vec<DocInfo> {
        self.docs.clone()
    }

    /// Borrowed view of every document, in tree order.
    #[must_use]
    pub fn docs(&self) -> &[DocInfo] {
        &self.docs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Look up a document by content path (`mirascope/learn/calls`).
    #[must_use]
    pub fn doc_by_path(&self, path: &str) -> Option<&DocInfo> {
        self.path_index.get(path).map(|&idx| &self.docs[idx])
    }

    /// Look up a document by route, with or without the trailing slash.
    #[must_use]
    pub fn doc_by_route_path(&self, route_path: &str) -> Option<&DocInfo> {
        self.route_index.get(route_path).map(|&idx| &self.docs[idx])
    }

    #[must_use]
    pub fn docs_by_product(&self, product: &str) -> Vec<&DocInfo> {
        self.docs.iter().filter(|d| d.product == product).collect()
    }

    #[must_use]
    pub fn product_spec(&self, product: &str) -> Option<&ProductSpec> {
        self.product_index.get(product).map(|&idx| &self.spec[idx])
    }

    /// Product names in authored order, without duplicates.
    #[must_use]
    pub fn product_names(&self) -> Vec<&str> {
        self.spec
            .iter()
            .enumerate()
            .filter(|(idx, p)| self.product_index.get(&p.product) == Some(idx))
            .map(|(_, p)| p.product.as_str())
            .collect()
    }

    /// Flatten one section of a product.
    ///
    /// Weights include the product and section weights, so the records match
    /// the corresponding entries of [`all_docs`](Self::all_docs).
    #[must_use]
    pub fn docs_in_section(&self, product: &str, section_slug: &str) -> Vec<DocInfo> {
        let Some(product_spec) = self.product_spec(product) else {
            return Vec::new();
        };
        let Some(section) = product_spec.section(section_slug) else {
            return Vec::new();
        };

        let prefix = section.path_prefix(product);
        let weight = product_spec.effective_weight() * section.effective_weight();
        section
            .children
            .iter()
            .flat_map(|child| process_doc_spec(child, product, &prefix, weight))
            .collect()
    }

    /// Sections of a product as slug/title pairs.
    #[must_use]
    pub fn sections_for_product(&self, product: &str) -> Vec<SectionSummary> {
        self.product_spec(product)
            .map(|p| {
                p.sections
                    .iter()
                    .map(|s| SectionSummary {
                        slug: s.slug.clone(),
                        title: s.label.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn full_spec(&self) -> &[ProductSpec] {
        &self.spec
    }

    /// Every route path, in tree order.
    pub fn route_paths(&self) -> impl Iterator<Item = &str> {
        self.docs.iter().map(|d| d.route_path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{DocSpec, SectionSpec};
    use pretty_assertions::assert_eq;

    fn registry() -> DocRegistry {
        DocRegistry::new(vec![
            ProductSpec::new(
                "mirascope",
                vec![
                    SectionSpec::new(
                        "index",
                        "Docs",
                        vec![
                            DocSpec::page("index", "Welcome"),
                            DocSpec::folder(
                                "learn",
                                "Learn",
                                vec![
                                    DocSpec::page("calls", "Calls"),
                                    DocSpec::page("tools", "Tools"),
                                ],
                            )
                            .with_weight(2.0),
                        ],
                    ),
                    SectionSpec::new("api", "API", vec![DocSpec::page("index", "API Overview")])
                        .with_weight(0.5),
                ],
            )
            .with_weight(3.0),
            ProductSpec::new(
                "lilypad",
                vec![SectionSpec::new("index", "Docs", vec![DocSpec::page("index", "Welcome")])],
            ),
        ])
    }

    #[test]
    fn test_all_docs_is_a_copy() {
        let registry = registry();
        let mut docs = registry.all_docs();
        docs.clear();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.all_docs().len(), 5);
    }

    #[test]
    fn test_doc_by_path() {
        let registry = registry();
        let doc = registry.doc_by_path("mirascope/learn/calls").unwrap();
        assert_eq!(doc.label, "Calls");
        assert!(registry.doc_by_path("mirascope/learn").is_none());
    }

    #[test]
    fn test_doc_by_route_path_both_slash_forms() {
        let registry = registry();
        assert_eq!(
            registry.doc_by_route_path("/docs/mirascope/").unwrap().label,
            "Welcome"
        );
        assert_eq!(
            registry.doc_by_route_path("/docs/mirascope").unwrap().label,
            "Welcome"
        );
        assert_eq!(
            registry.doc_by_route_path("/docs/mirascope/learn/calls/").unwrap().label,
            "Calls"
        );
        assert_eq!(
            registry.doc_by_route_path("/docs/mirascope/api").unwrap().label,
            "API Overview"
        );
        assert!(registry.doc_by_route_path("/docs/unknown").is_none());
    }

    #[test]
    fn test_docs_by_product() {
        let registry = registry();
        let lilypad = registry.docs_by_product("lilypad");
        assert_eq!(lilypad.len(), 1);
        assert_eq!(lilypad[0].route_path, "/docs/lilypad/");
        assert!(registry.docs_by_product("missing").is_empty());
    }

    #[test]
    fn test_product_names_in_order() {
        assert_eq!(registry().product_names(), vec!["mirascope", "lilypad"]);
    }

    #[test]
    fn test_docs_in_section_matches_all_docs() {
        let registry = registry();
        let learn = registry.docs_in_section("mirascope", "index");
        let paths: Vec<&str> = learn.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["mirascope/index", "mirascope/learn/calls", "mirascope/learn/tools"]
        );
        assert_eq!(learn[1], *registry.doc_by_path("mirascope/learn/calls").unwrap());
        assert_eq!(learn[1].search_weight, 6.0);

        let api = registry.docs_in_section("mirascope", "api");
        assert_eq!(api[0].route_path, "/docs/mirascope/api/");
        assert_eq!(api[0].search_weight, 1.5);
    }

    #[test]
    fn test_docs_in_unknown_section() {
        let registry = registry();
        assert!(registry.docs_in_section("mirascope", "guides").is_empty());
        assert!(registry.docs_in_section("unknown", "index").is_empty());
    }

    #[test]
    fn test_sections_for_product() {
        let sections = registry().sections_for_product("mirascope");
        assert_eq!(
            sections,
            vec![
                SectionSummary {
                    slug: "index".to_owned(),
                    title: "Docs".to_owned(),
                },
                SectionSummary {
                    slug: "api".to_owned(),
                    title: "API".to_owned(),
                },
            ]
        );
        assert!(registry().sections_for_product("missing").is_empty());
    }

    #[test]
    fn test_route_paths() {
        let registry = registry();
        assert_eq!(
            registry.route_paths().collect::<Vec<_>>(),
            vec![
                "/docs/mirascope/",
                "/docs/mirascope/learn/calls",
                "/docs/mirascope/learn/tools",
                "/docs/mirascope/api/",
                "/docs/lilypad/",
            ]
        );
    }

    #[test]
    fn test_from_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_meta.yaml");
        std::fs::write(
            &path,
            "- product: mirascope\n  sections:\n    - slug: index\n      label: Docs\n      children: []\n",
        )
        .unwrap();

        let err = DocRegistry::from_file(&path, true).err().unwrap();
        assert!(matches!(err, SpecError::Invalid(_)));

        let registry = DocRegistry::from_file(&path, false).unwrap();
        assert!(registry.is_empty());
    }
}
