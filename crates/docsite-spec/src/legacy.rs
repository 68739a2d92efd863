//! Conversion between the spec tree and the legacy nested-record format.
//!
//! The legacy format is two levels deep: a product has top-level `items`,
//! `groups` of items, and named `sections`. Converting a spec to legacy form
//! treats any default-section child that has children as a group and the
//! rest as items. That projection is lossy for deeper trees and drops
//! weights; it round-trips only for structures already shaped this way.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::spec::{DocSpec, FullDocsSpec, INDEX_SLUG, ProductSpec, SectionSpec};

/// Label given to a product's default section when converting from legacy form.
pub const DEFAULT_SECTION_LABEL: &str = "Docs";

/// String-keyed map that keeps insertion order.
///
/// Serializes as a JSON object with keys in the order they were inserted,
/// which the legacy format relies on for navigation order.
#[derive(Clone, Debug, PartialEq)]
pub struct LegacyRecord<T>(Vec<(String, T)>);

impl<T> LegacyRecord<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for LegacyRecord<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for LegacyRecord<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl<T: Serialize> Serialize for LegacyRecord<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LegacyRecord<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for RecordVisitor<T> {
            type Value = LegacyRecord<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of slugs to entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut record = LegacyRecord::new();
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    record.insert(key, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor(PhantomData))
    }
}

/// Legacy page entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMetaItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_extractable_snippets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<LegacyRecord<DocMetaItem>>,
}

/// Legacy group of pages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocGroup {
    pub title: String,
    pub items: LegacyRecord<DocMetaItem>,
}

/// Legacy named section (e.g. API reference).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocSection {
    pub title: String,
    #[serde(default)]
    pub items: LegacyRecord<DocMetaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<LegacyRecord<DocGroup>>,
}

/// Legacy documentation of one product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDocs {
    #[serde(default)]
    pub items: LegacyRecord<DocMetaItem>,
    #[serde(default)]
    pub groups: LegacyRecord<DocGroup>,
    #[serde(default)]
    pub sections: LegacyRecord<DocSection>,
}

/// Legacy documentation of all products, keyed by product name.
pub type DocsStructure = LegacyRecord<ProductDocs>;

// ----- spec -> legacy -----

/// Convert a doc node to a legacy item.
#[must_use]
pub fn convert_doc_to_legacy(doc: &DocSpec) -> DocMetaItem {
    DocMetaItem {
        title: doc.label.clone(),
        has_extractable_snippets: doc.has_extractable_snippets.filter(|&flag| flag),
        items: doc.has_children().then(|| convert_docs_to_record(doc.child_specs())),
    }
}

fn convert_docs_to_record<'a>(
    docs: impl IntoIterator<Item = &'a DocSpec>,
) -> LegacyRecord<DocMetaItem> {
    docs.into_iter()
        .map(|doc| (doc.slug.clone(), convert_doc_to_legacy(doc)))
        .collect()
}

fn convert_group_to_legacy(doc: &DocSpec) -> DocGroup {
    DocGroup {
        title: doc.label.clone(),
        items: convert_docs_to_record(doc.child_specs()),
    }
}

/// Convert a non-default section to a legacy section.
#[must_use]
pub fn convert_section_to_legacy(section: &SectionSpec) -> DocSection {
    let (nested, direct): (Vec<&DocSpec>, Vec<&DocSpec>) =
        section.children.iter().partition(|child| child.has_children());

    DocSection {
        title: section.label.clone(),
        items: convert_docs_to_record(direct),
        groups: (!nested.is_empty()).then(|| {
            nested
                .into_iter()
                .map(|doc| (doc.slug.clone(), convert_group_to_legacy(doc)))
                .collect()
        }),
    }
}

/// Convert a product to legacy form.
#[must_use]
pub fn convert_product_to_legacy(product: &ProductSpec) -> ProductDocs {
    let mut legacy = ProductDocs::default();

    for section in &product.sections {
        if section.is_default() {
            for item in &section.children {
                if item.has_children() {
                    legacy
                        .groups
                        .insert(item.slug.clone(), convert_group_to_legacy(item));
                } else {
                    legacy
                        .items
                        .insert(item.slug.clone(), convert_doc_to_legacy(item));
                }
            }
        } else {
            legacy
                .sections
                .insert(section.slug.clone(), convert_section_to_legacy(section));
        }
    }

    legacy
}

/// Convert a full spec to the legacy structure.
#[must_use]
pub fn convert_docs_to_legacy(spec: &[ProductSpec]) -> DocsStructure {
    spec.iter()
        .map(|product| (product.product.clone(), convert_product_to_legacy(product)))
        .collect()
}

// ----- legacy -> spec -----

/// Convert a legacy item to a doc node.
#[must_use]
pub fn convert_legacy_to_doc(slug: &str, item: &DocMetaItem) -> DocSpec {
    let children = item
        .items
        .as_ref()
        .filter(|items| !items.is_empty())
        .map(convert_record_to_docs);

    DocSpec {
        slug: slug.to_owned(),
        label: item.title.clone(),
        children,
        has_extractable_snippets: item.has_extractable_snippets.filter(|&flag| flag),
        weight: None,
    }
}

fn convert_record_to_docs(record: &LegacyRecord<DocMetaItem>) -> Vec<DocSpec> {
    record
        .iter()
        .map(|(slug, item)| convert_legacy_to_doc(slug, item))
        .collect()
}

/// Convert a legacy group to a folder node.
#[must_use]
pub fn convert_legacy_group_to_doc(slug: &str, group: &DocGroup) -> DocSpec {
    DocSpec::folder(slug, group.title.clone(), convert_record_to_docs(&group.items))
}

/// Convert a legacy section to a section spec: items first, then groups as folders.
#[must_use]
pub fn convert_legacy_section_to_section(slug: &str, section: &DocSection) -> SectionSpec {
    let mut children = convert_record_to_docs(&section.items);
    if let Some(groups) = &section.groups {
        children.extend(
            groups
                .iter()
                .map(|(group_slug, group)| convert_legacy_group_to_doc(group_slug, group)),
        );
    }
    SectionSpec::new(slug, section.title.clone(), children)
}

/// Convert legacy product docs to a product spec.
///
/// Top-level items and groups form the default section, which comes first.
/// The default section is omitted when the product has neither.
#[must_use]
pub fn convert_legacy_to_product(product: &str, docs: &ProductDocs) -> ProductSpec {
    let mut default_children = convert_record_to_docs(&docs.items);
    default_children.extend(
        docs.groups
            .iter()
            .map(|(slug, group)| convert_legacy_group_to_doc(slug, group)),
    );

    let mut sections = Vec::with_capacity(docs.sections.len() + 1);
    if !default_children.is_empty() {
        sections.push(SectionSpec::new(
            INDEX_SLUG,
            DEFAULT_SECTION_LABEL,
            default_children,
        ));
    }
    sections.extend(
        docs.sections
            .iter()
            .map(|(slug, section)| convert_legacy_section_to_section(slug, section)),
    );

    ProductSpec::new(product, sections)
}

/// Convert a legacy structure to a full spec.
#[must_use]
pub fn convert_legacy_to_docs(legacy: &DocsStructure) -> FullDocsSpec {
    legacy
        .iter()
        .map(|(product, docs)| convert_legacy_to_product(product, docs))
        .collect()
}
