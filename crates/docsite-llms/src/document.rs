//! LLM document aggregation.
//!
//! An [`LlmDocDirective`] names sections, each pulling docs through
//! [`IncludeDirective`]s. Processing produces an [`LlmDocument`]: a header
//! with a table of contents followed by one container per section.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use docsite_spec::DocInfo;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::include::{DocSource, IncludeDirective, IncludePattern, filter_docs};

/// Section of an LLM document directive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDirective {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_path: Option<String>,
    pub includes: Vec<IncludeDirective>,
}

impl SectionDirective {
    #[must_use]
    pub fn new(title: impl Into<String>, includes: Vec<IncludeDirective>) -> Self {
        Self {
            title: title.into(),
            description: None,
            route_path: None,
            includes,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Explicit route path, or `#` followed by the hyphenated lowercase title.
    #[must_use]
    pub fn effective_route_path(&self) -> String {
        self.route_path.clone().unwrap_or_else(|| {
            let anchor = self
                .title
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-");
            format!("#{anchor}")
        })
    }
}

/// Definition of one generated LLM document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmDocDirective {
    pub title: String,
    pub description: String,
    /// Output location without leading slash (e.g. `docs/mirascope/llms-full`).
    pub route_path: String,
    pub sections: Vec<SectionDirective>,
}

impl LlmDocDirective {
    /// Check required fields and that every section includes something.
    pub fn validate(&self) -> Result<(), LlmError> {
        let invalid = |message: String| Err(LlmError::InvalidDirective(message));

        if self.title.trim().is_empty() {
            return invalid("LLM document must have a title".to_owned());
        }
        if self.description.trim().is_empty() {
            return invalid("LLM document must have a description".to_owned());
        }
        if self.route_path.trim().is_empty() {
            return invalid("LLM document must have a routePath".to_owned());
        }
        if self.sections.is_empty() {
            return invalid("LLM document must have at least one content section".to_owned());
        }
        for section in &self.sections {
            if section.title.trim().is_empty() {
                return invalid("Content section must have a title".to_owned());
            }
            if section.includes.is_empty() {
                return invalid(format!(
                    "Content section \"{}\" must have at least one include directive",
                    section.title
                ));
            }
        }
        Ok(())
    }
}

/// Registry of LLM documents, read from the LLM meta file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmDocMeta {
    #[serde(default)]
    pub documents: Vec<LlmDocDirective>,
}

impl LlmDocMeta {
    /// Load a YAML (or JSON) meta file.
    pub fn load(path: &Path) -> Result<Self, LlmError> {
        let raw = std::fs::read_to_string(path).map_err(|e| LlmError::io(path, e))?;
        serde_yaml::from_str(&raw).map_err(|source| LlmError::Meta {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Approximate token count: one token per four characters, rounded up.
#[must_use]
pub fn count_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Slug-style id for a route path.
///
/// ```
/// use docsite_llms::generate_section_id;
///
/// assert_eq!(generate_section_id("/docs/mirascope/learn/calls"), "docs-mirascope-learn-calls");
/// ```
#[must_use]
pub fn generate_section_id(route_path: &str) -> String {
    route_path.trim_matches('/').replace('/', "-").to_lowercase()
}

/// One doc included in an LLM document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedDocument {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub route_path: String,
    /// Body wrapped in `<ContentSection>`.
    pub content: String,
    pub token_count: usize,
}

/// Group of included documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentContainer {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub route_path: String,
    pub children: Vec<IncludedDocument>,
    pub token_count: usize,
    #[serde(rename = "generateToC", default)]
    pub generate_toc: bool,
}

/// Top-level entry of an [`LlmDocument`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LlmContent {
    Document(IncludedDocument),
    Container(ContentContainer),
}

impl LlmContent {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Document(doc) => &doc.title,
            Self::Container(container) => &container.title,
        }
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        match self {
            Self::Document(doc) => doc.token_count,
            Self::Container(container) => container.token_count,
        }
    }

    /// Full text; containers join their children with blank lines.
    #[must_use]
    pub fn content(&self) -> String {
        match self {
            Self::Document(doc) => doc.content.clone(),
            Self::Container(container) => container
                .children
                .iter()
                .map(|child| child.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

/// Generation statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmDocumentMetadata {
    pub total_tokens: usize,
    /// RFC 3339 timestamp with millisecond precision.
    pub generated_at: String,
    /// Header plus every included document.
    pub sections_count: usize,
}

/// Processed LLM document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmDocument {
    pub title: String,
    pub description: String,
    pub route_path: String,
    pub token_count: usize,
    pub children: Vec<LlmContent>,
    #[serde(rename = "generateToC", default)]
    pub generate_toc: bool,
    pub metadata: LlmDocumentMetadata,
}

impl LlmDocument {
    /// Full text of every entry, blank-line separated.
    #[must_use]
    pub fn content(&self) -> String {
        self.children
            .iter()
            .map(LlmContent::content)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Write `<dir>/<route_path>.json` and `<dir>/<route_path>.txt`.
    ///
    /// Extensions are appended, so dotted route segments such as `llms-v1.5`
    /// are kept intact.
    pub fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf), LlmError> {
        let route = self.route_path.trim_matches('/');
        if route.is_empty() {
            return Err(LlmError::InvalidDirective("LLM document must have a routePath".to_owned()));
        }
        let json_path = dir.join(format!("{route}.json"));
        if let Some(parent) = json_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LlmError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&json_path, json).map_err(|e| LlmError::io(&json_path, e))?;

        let txt_path = dir.join(format!("{route}.txt"));
        std::fs::write(&txt_path, self.content()).map_err(|e| LlmError::io(&txt_path, e))?;

        Ok((json_path, txt_path))
    }
}

/// Builds [`LlmDocument`]s from directives against a doc list.
#[derive(Debug)]
pub struct LlmDocumentProcessor<'a> {
    docs_root: PathBuf,
    docs: &'a [DocInfo],
}

impl<'a> LlmDocumentProcessor<'a> {
    #[must_use]
    pub fn new(docs_root: impl Into<PathBuf>, docs: &'a [DocInfo]) -> Self {
        Self {
            docs_root: docs_root.into(),
            docs,
        }
    }

    /// Docs matched by `includes`, first match wins.
    #[must_use]
    pub fn resolve_includes(&self, includes: &[IncludeDirective]) -> Vec<&'a DocInfo> {
        let patterns: Vec<IncludePattern> = includes
            .iter()
            .filter_map(|include| {
                let pattern = include.to_pattern();
                if pattern.is_none() {
                    tracing::warn!(pattern = %include.pattern, "Glob include matches nothing");
                }
                pattern
            })
            .collect();
        filter_docs(self.docs, &patterns)
    }

    /// Read and wrap one doc.
    pub fn generate_included_document(&self, doc: &DocInfo) -> Result<IncludedDocument, LlmError> {
        let source = DocSource::read(&self.docs_root, doc)?;
        let content = source.wrap(&doc.route_path);
        Ok(IncludedDocument {
            id: generate_section_id(&doc.route_path),
            title: source.title().unwrap_or_else(|| doc.path.clone()),
            description: source.description(),
            route_path: doc.route_path.clone(),
            token_count: count_tokens(&content),
            content,
        })
    }

    /// Markdown table of contents: sections as `#`, documents as `##`.
    #[must_use]
    pub fn generate_table_of_contents(
        sections: &[SectionDirective],
        docs_by_section: &[Vec<IncludedDocument>],
    ) -> String {
        let mut toc = String::from("# Table of Contents\n\n");
        for (section, docs) in sections.iter().zip(docs_by_section) {
            toc.push_str("# ");
            toc.push_str(&section.title);
            if let Some(description) = &section.description {
                toc.push_str(" - ");
                toc.push_str(description);
            }
            toc.push_str("\n\n");

            for doc in docs {
                toc.push_str("## ");
                toc.push_str(&doc.title);
                if let Some(description) = &doc.description {
                    toc.push_str("\n- ");
                    toc.push_str(description);
                }
                toc.push_str("\n\n");
            }
            toc.push('\n');
        }
        toc.trim().to_owned()
    }

    fn header(
        directive: &LlmDocDirective,
        docs_by_section: &[Vec<IncludedDocument>],
    ) -> IncludedDocument {
        let toc = Self::generate_table_of_contents(&directive.sections, docs_by_section);
        let content = format!("# {}\n\n{}\n\n{toc}", directive.title, directive.description);
        IncludedDocument {
            id: "header".to_owned(),
            title: "Table of Contents".to_owned(),
            description: Some(directive.description.clone()),
            route_path: format!("/{}", directive.route_path.trim_start_matches('/')),
            token_count: count_tokens(&content),
            content,
        }
    }

    /// Process a directive, stamping it with the current time.
    pub fn process_directive(&self, directive: &LlmDocDirective) -> Result<LlmDocument, LlmError> {
        self.process_directive_at(directive, Utc::now())
    }

    /// Process a directive with an explicit generation time.
    ///
    /// Fails when a matched doc file is missing or two included docs share
    /// an id.
    pub fn process_directive_at(
        &self,
        directive: &LlmDocDirective,
        generated_at: DateTime<Utc>,
    ) -> Result<LlmDocument, LlmError> {
        directive.validate()?;

        let mut ids: HashSet<String> = HashSet::new();
        let mut docs_by_section: Vec<Vec<IncludedDocument>> = Vec::new();
        for section in &directive.sections {
            let mut section_docs = Vec::new();
            for doc in self.resolve_includes(&section.includes) {
                let included = self.generate_included_document(doc)?;
                if !ids.insert(included.id.clone()) {
                    return Err(LlmError::IdCollision {
                        id: included.id,
                        route: doc.route_path.clone(),
                    });
                }
                section_docs.push(included);
            }
            tracing::debug!(
                document = %directive.route_path,
                section = %section.title,
                docs = section_docs.len(),
                "Resolved section"
            );
            docs_by_section.push(section_docs);
        }

        let header = Self::header(directive, &docs_by_section);
        let total_tokens = header.token_count
            + docs_by_section
                .iter()
                .flatten()
                .map(|doc| doc.token_count)
                .sum::<usize>();
        let sections_count = 1 + docs_by_section.iter().map(Vec::len).sum::<usize>();

        let mut children = vec![LlmContent::Document(header)];
        for (section, docs) in directive.sections.iter().zip(docs_by_section) {
            children.push(LlmContent::Container(ContentContainer {
                title: section.title.clone(),
                description: section.description.clone(),
                route_path: section.effective_route_path(),
                token_count: docs.iter().map(|doc| doc.token_count).sum(),
                children: docs,
                generate_toc: false,
            }));
        }

        Ok(LlmDocument {
            title: directive.title.clone(),
            description: directive.description.clone(),
            route_path: directive.route_path.clone(),
            token_count: total_tokens,
            children,
            generate_toc: true,
            metadata: LlmDocumentMetadata {
                total_tokens,
                generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                sections_count,
            },
        })
    }

    /// Process every document in `meta`, in order.
    pub fn process_all(&self, meta: &LlmDocMeta) -> Result<Vec<LlmDocument>, LlmError> {
        meta.documents
            .iter()
            .map(|directive| self.process_directive(directive))
            .collect()
    }
}
