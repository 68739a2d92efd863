//! Flattening of the documentation tree into [`DocInfo`] records.

use crate::spec::{DocInfo, DocSpec, DocType, INDEX_SLUG, ProductSpec};

/// URL prefix shared by all documentation routes.
pub const DOCS_ROUTE_PREFIX: &str = "/docs";

/// Flatten one doc node into page records.
///
/// `prefix` is the content path of the node's parent (for top-level section
/// children this is the section's path prefix). `parent_weight` is the
/// product of every weight above this node.
///
/// Pages yield one record with weight `parent_weight * weight`. A page whose
/// slug is `index` is routed at its parent directory with a trailing slash.
/// Folders yield nothing themselves; their children are flattened with the
/// folder slug appended to the prefix.
#[must_use]
pub fn process_doc_spec(
    doc: &DocSpec,
    product: &str,
    prefix: &str,
    parent_weight: f64,
) -> Vec<DocInfo> {
    let mut out = Vec::new();
    flatten_into(doc, product, prefix, parent_weight, &mut out);
    out
}

fn flatten_into(
    doc: &DocSpec,
    product: &str,
    prefix: &str,
    parent_weight: f64,
    out: &mut Vec<DocInfo>,
) {
    let weight = parent_weight * doc.effective_weight();
    let path = join_path(prefix, &doc.slug);

    if let Some(children) = &doc.children {
        if doc.slug == INDEX_SLUG {
            tracing::warn!(
                path = %path,
                label = %doc.label,
                "index node has children, treating it as a folder"
            );
        }
        for child in children {
            flatten_into(child, product, &path, weight, out);
        }
        return;
    }

    let route_path = if doc.slug == INDEX_SLUG {
        if prefix.is_empty() {
            format!("{DOCS_ROUTE_PREFIX}/")
        } else {
            format!("{DOCS_ROUTE_PREFIX}/{prefix}/")
        }
    } else {
        format!("{DOCS_ROUTE_PREFIX}/{path}")
    };

    out.push(DocInfo {
        label: doc.label.clone(),
        path,
        route_path,
        slug: doc.slug.clone(),
        doc_type: DocType::Docs,
        product: product.to_owned(),
        has_extractable_snippets: doc.has_extractable_snippets.unwrap_or(false),
        search_weight: weight,
    });
}

fn join_path(prefix: &str, slug: &str) -> String {
    if prefix.is_empty() {
        slug.to_owned()
    } else {
        format!("{prefix}/{slug}")
    }
}

/// Flatten a single product, section by section, in authored order.
#[must_use]
pub fn get_docs_from_product(product: &ProductSpec) -> Vec<DocInfo> {
    let product_weight = product.effective_weight();
    let mut out = Vec::new();
    for section in &product.sections {
        let prefix = section.path_prefix(&product.product);
        let weight = product_weight * section.effective_weight();
        for child in &section.children {
            flatten_into(child, &product.product, &prefix, weight, &mut out);
        }
    }
    out
}

/// Flatten every product of a full spec, in authored order.
#[must_use]
pub fn get_docs_from_spec(spec: &[ProductSpec]) -> Vec<DocInfo> {
    spec.iter().flat_map(get_docs_from_product).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SectionSpec;
    use pretty_assertions::assert_eq;

    fn routes(docs: &[DocInfo]) -> Vec<&str> {
        docs.iter().map(|d| d.route_path.as_str()).collect()
    }

    fn mirascope() -> ProductSpec {
        ProductSpec::new(
            "mirascope",
            vec![
                SectionSpec::new(
                    "index",
                    "Docs",
                    vec![
                        DocSpec::page("index", "Welcome").with_snippets(),
                        DocSpec::folder(
                            "learn",
                            "Learn",
                            vec![
                                DocSpec::page("index", "Overview"),
                                DocSpec::page("calls", "Calls").with_weight(1.5),
                            ],
                        )
                        .with_weight(4.0),
                    ],
                )
                .with_weight(2.0),
                SectionSpec::new("api", "API", vec![DocSpec::page("index", "API Overview")]),
            ],
        )
    }

    #[test]
    fn test_index_routes_keep_trailing_slash() {
        let docs = get_docs_from_spec(&[mirascope()]);
        assert_eq!(
            routes(&docs),
            vec![
                "/docs/mirascope/",
                "/docs/mirascope/learn/",
                "/docs/mirascope/learn/calls",
                "/docs/mirascope/api/",
            ]
        );
    }

    #[test]
    fn test_content_paths() {
        let docs = get_docs_from_spec(&[mirascope()]);
        let paths: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "mirascope/index",
                "mirascope/learn/index",
                "mirascope/learn/calls",
                "mirascope/api/index",
            ]
        );
    }

    #[test]
    fn test_weights_multiply_along_path() {
        let product = mirascope().with_weight(0.5);
        let docs = get_docs_from_spec(&[product]);
        let weights: Vec<f64> = docs.iter().map(|d| d.search_weight).collect();
        // product 0.5 * section 2 = 1; learn 4; calls 1.5
        assert_eq!(weights, vec![1.0, 4.0, 6.0, 0.5]);
    }

    #[test]
    fn test_one_record_per_leaf() {
        let docs = get_docs_from_spec(&[mirascope()]);
        assert_eq!(docs.len(), 4);
        assert!(docs.iter().all(|d| d.slug != "learn"));
    }

    #[test]
    fn test_leaf_fields() {
        let docs = get_docs_from_spec(&[mirascope()]);
        let welcome = &docs[0];
        assert_eq!(welcome.label, "Welcome");
        assert_eq!(welcome.slug, "index");
        assert_eq!(welcome.product, "mirascope");
        assert_eq!(welcome.doc_type, DocType::Docs);
        assert!(welcome.has_extractable_snippets);
        assert!(!docs[2].has_extractable_snippets);
    }

    #[test]
    fn test_process_doc_spec_with_prefix() {
        let doc = DocSpec::folder(
            "extensions",
            "Extensions",
            vec![DocSpec::page("custom", "Custom")],
        )
        .with_weight(3.0);
        let docs = process_doc_spec(&doc, "mirascope", "mirascope/learn", 2.0);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "mirascope/learn/extensions/custom");
        assert_eq!(docs[0].route_path, "/docs/mirascope/learn/extensions/custom");
        assert_eq!(docs[0].search_weight, 6.0);
    }

    #[test]
    fn test_index_with_children_takes_folder_branch() {
        let doc = DocSpec::folder("index", "Overview", vec![DocSpec::page("a", "A")]);
        let docs = process_doc_spec(&doc, "mirascope", "mirascope", 1.0);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "mirascope/index/a");
    }

    #[test]
    fn test_empty_folder_yields_nothing() {
        let doc = DocSpec::folder("empty", "Empty", vec![]);
        assert!(process_doc_spec(&doc, "mirascope", "mirascope", 1.0).is_empty());
    }

    #[test]
    fn test_products_in_order() {
        let lilypad = ProductSpec::new(
            "lilypad",
            vec![SectionSpec::new("index", "Docs", vec![DocSpec::page("index", "Welcome")])],
        );
        let docs = get_docs_from_spec(&[lilypad, mirascope()]);
        assert_eq!(docs[0].route_path, "/docs/lilypad/");
        assert_eq!(docs[1].route_path, "/docs/mirascope/");
    }
}
