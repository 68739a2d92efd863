//! Structural validation of documentation specs.
//!
//! Validation never stops at the first problem: every function collects all
//! errors for its subtree, prefixing nested messages with their location so
//! that a single run reports everything an author needs to fix.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::SpecError;
use crate::spec::{DocSpec, INDEX_SLUG, ProductSpec, SectionSpec};

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9\-_]+$").expect("valid regex"));

/// Outcome of a validation pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Build a result from collected errors; valid when there are none.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Convert into a `Result`, turning collected errors into [`SpecError::Invalid`].
    pub fn into_result(self) -> Result<(), SpecError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(SpecError::Invalid(self.errors))
        }
    }
}

/// Validate a single slug.
#[must_use]
pub fn validate_slug(slug: &str) -> ValidationResult {
    if slug.trim().is_empty() {
        return ValidationResult::from_errors(vec!["Slug cannot be empty".to_owned()]);
    }
    if slug == INDEX_SLUG {
        return ValidationResult::from_errors(Vec::new());
    }

    let mut errors = Vec::new();
    if !SLUG_PATTERN.is_match(slug) {
        errors.push(
            "Slug must contain only lowercase letters, numbers, hyphens, and underscores"
                .to_owned(),
        );
    }
    if slug.contains('/') {
        errors.push("Slug cannot contain slashes".to_owned());
    }
    ValidationResult::from_errors(errors)
}

fn check_weight(weight: Option<f64>, owner: &str, errors: &mut Vec<String>) {
    if let Some(weight) = weight
        && !(weight.is_finite() && weight > 0.0)
    {
        errors.push(format!(
            "Invalid weight {weight} for \"{owner}\": weight must be a positive number"
        ));
    }
}

/// Report sibling slugs that occur more than once, in first-seen order.
fn duplicate_slugs(items: &[DocSpec]) -> Vec<String> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(slug, _)| *slug == item.slug) {
            Some((_, labels)) => labels.push(&item.label),
            None => groups.push((&item.slug, vec![&item.label])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, labels)| labels.len() > 1)
        .map(|(slug, labels)| {
            format!(
                "Duplicate slug \"{slug}\" found for items: {}",
                labels.join(", ")
            )
        })
        .collect()
}

/// Validate a doc node and its descendants.
#[must_use]
pub fn validate_doc_spec(spec: &DocSpec) -> ValidationResult {
    let mut errors: Vec<String> = validate_slug(&spec.slug)
        .errors
        .into_iter()
        .map(|err| format!("Invalid slug \"{}\": {err}", spec.slug))
        .collect();
    check_weight(spec.weight, &spec.label, &mut errors);

    if let Some(children) = &spec.children {
        if spec.slug == INDEX_SLUG {
            errors.push(format!(
                "Index item \"{}\" cannot have children",
                spec.label
            ));
        }
        if children.is_empty() {
            errors.push(format!(
                "Folder \"{}\" must have at least one child",
                spec.label
            ));
        }

        errors.extend(
            duplicate_slugs(children)
                .into_iter()
                .map(|err| format!("In \"{}\": {err}", spec.label)),
        );

        for child in children {
            errors.extend(
                validate_doc_spec(child)
                    .errors
                    .into_iter()
                    .map(|err| format!("In child \"{}\": {err}", child.label)),
            );
        }
    }

    ValidationResult::from_errors(errors)
}

/// Validate a section and its tree.
#[must_use]
pub fn validate_section_spec(spec: &SectionSpec) -> ValidationResult {
    let mut errors: Vec<String> = validate_slug(&spec.slug)
        .errors
        .into_iter()
        .map(|err| format!("Invalid section slug \"{}\": {err}", spec.slug))
        .collect();
    check_weight(spec.weight, &spec.label, &mut errors);

    if spec.children.is_empty() {
        errors.push(format!(
            "Section \"{}\" must have at least one child",
            spec.label
        ));
    } else {
        errors.extend(
            duplicate_slugs(&spec.children)
                .into_iter()
                .map(|err| format!("In section \"{}\": {err}", spec.label)),
        );

        for child in &spec.children {
            errors.extend(validate_doc_spec(child).errors.into_iter().map(|err| {
                format!(
                    "In section \"{}\", child \"{}\": {err}",
                    spec.label, child.label
                )
            }));
        }
    }

    ValidationResult::from_errors(errors)
}

/// Validate a product and its sections.
#[must_use]
pub fn validate_product_spec(spec: &ProductSpec) -> ValidationResult {
    let mut errors: Vec<String> = validate_slug(&spec.product)
        .errors
        .into_iter()
        .map(|err| format!("Invalid product name \"{}\": {err}", spec.product))
        .collect();
    check_weight(spec.weight, &spec.product, &mut errors);

    let mut seen = std::collections::HashSet::new();
    if !spec.sections.iter().all(|s| seen.insert(s.slug.as_str())) {
        errors.push("Duplicate section slugs found".to_owned());
    }

    for section in &spec.sections {
        errors.extend(
            validate_section_spec(section)
                .errors
                .into_iter()
                .map(|err| format!("In section \"{}\": {err}", section.label)),
        );
    }

    ValidationResult::from_errors(errors)
}

/// Validate every product in a full spec.
#[must_use]
pub fn validate_full_docs_spec(spec: &[ProductSpec]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut seen: Vec<&str> = Vec::new();
    for product in spec {
        if seen.contains(&product.product.as_str()) {
            errors.push(format!("Duplicate product \"{}\"", product.product));
        } else {
            seen.push(&product.product);
        }
    }

    for product in spec {
        errors.extend(
            validate_product_spec(product)
                .errors
                .into_iter()
                .map(|err| format!("In product \"{}\": {err}", product.product)),
        );
    }

    ValidationResult::from_errors(errors)
}
