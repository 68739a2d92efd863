//! LLM-oriented aggregation of documentation.
//!
//! Two generators share the include matcher:
//! - [`TemplateProcessor`] expands `{{include routes=[...]}}` directives in
//!   MDX templates
//! - [`LlmDocumentProcessor`] builds structured [`LlmDocument`]s with a table
//!   of contents and token counts
//!
//! Matched docs are read from the docs source directory; a matched doc
//! without a file is an error.

mod document;
mod error;
mod include;
mod template;

pub use document::{
    ContentContainer, IncludedDocument, LlmContent, LlmDocDirective, LlmDocMeta, LlmDocument,
    LlmDocumentMetadata, LlmDocumentProcessor, SectionDirective, count_tokens, generate_section_id,
};
pub use error::LlmError;
pub use include::{
    IncludeDirective, IncludePattern, IncludeType, filter_docs, filter_docs_by_routes,
    matches_route_pattern,
};
pub use template::{
    DEFAULT_ORDER, TemplateFile, TemplateInclude, TemplateMetadata, TemplateProcessor,
    parse_include_directives,
};
