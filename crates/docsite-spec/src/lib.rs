//! Documentation tree specification for docsite.
//!
//! This crate provides:
//! - [`DocSpec`], [`SectionSpec`], [`ProductSpec`]: the authored tree
//! - Validation that collects every problem instead of failing fast
//! - Flattening into weighted, URL-addressable [`DocInfo`] records
//! - [`DocRegistry`]: immutable lookups by content path and route
//! - Conversion to and from the legacy nested-record format
//!
//! # Quick Start
//!
//! ```
//! use docsite_spec::{DocRegistry, DocSpec, ProductSpec, SectionSpec};
//!
//! let spec = vec![ProductSpec::new(
//!     "mirascope",
//!     vec![
//!         SectionSpec::new("index", "Docs", vec![DocSpec::page("index", "Welcome")]),
//!         SectionSpec::new("api", "API", vec![DocSpec::page("index", "API Overview")]),
//!     ],
//! )];
//!
//! let registry = DocRegistry::new(spec);
//! let api = registry.doc_by_route_path("/docs/mirascope/api/").unwrap();
//! assert_eq!(api.path, "mirascope/api/index");
//! ```

mod error;
pub mod legacy;
mod process;
mod registry;
mod spec;
mod validate;

pub use error::{SpecError, SpecFormat, load_spec, parse_spec};
pub use process::{DOCS_ROUTE_PREFIX, get_docs_from_product, get_docs_from_spec, process_doc_spec};
pub use registry::DocRegistry;
pub use spec::{
    DEFAULT_WEIGHT, DocInfo, DocSpec, DocType, FullDocsSpec, INDEX_SLUG, ProductSpec,
    SectionSpec, SectionSummary,
};
pub use validate::{
    ValidationResult, validate_doc_spec, validate_full_docs_spec, validate_product_spec,
    validate_section_spec, validate_slug,
};
