//! `{{include routes=[...]}}` template expansion.
//!
//! Templates are `*.mdx` files in the templates directory. Each include
//! directive is replaced by the matched docs, every one wrapped in a
//! `<ContentSection>` element.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use docsite_content::{fm_str, parse_frontmatter};
use docsite_spec::DocInfo;
use regex::Regex;
use serde::Serialize;

use crate::error::LlmError;
use crate::include::{DocSource, filter_docs_by_routes};

static INCLUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{include\s+routes=\[(.*?)\](?:\s+([^}]*))?\}\}").expect("valid regex")
});

/// Order assigned to templates without an `order` key.
pub const DEFAULT_ORDER: i64 = 7;

/// Template frontmatter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateMetadata {
    pub title: String,
    pub description: String,
    /// Lower orders sort first.
    pub order: Option<i64>,
}

/// Template discovered on disk.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateFile {
    pub file_path: PathBuf,
    /// File name without `.mdx`; also the output name.
    pub slug: String,
    pub metadata: TemplateMetadata,
    /// Body without frontmatter.
    pub content: String,
}

/// Include directive found in a template body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateInclude {
    /// Matched directive text, replaced on expansion.
    pub full_match: String,
    pub routes: Vec<String>,
}

/// Parse every `{{include routes=[...]}}` directive in `content`.
///
/// Route entries are comma separated; quotes are removed.
#[must_use]
pub fn parse_include_directives(content: &str) -> Vec<TemplateInclude> {
    INCLUDE_PATTERN
        .captures_iter(content)
        .map(|caps| TemplateInclude {
            full_match: caps[0].to_owned(),
            routes: caps[1]
                .split(',')
                .map(|route| route.trim().replace(['"', '\''], ""))
                .filter(|route| !route.is_empty())
                .collect(),
        })
        .collect()
}

/// Expands include templates against a doc list.
#[derive(Debug)]
pub struct TemplateProcessor<'a> {
    templates_dir: PathBuf,
    docs_root: PathBuf,
    docs: &'a [DocInfo],
}

impl<'a> TemplateProcessor<'a> {
    #[must_use]
    pub fn new(
        templates_dir: impl Into<PathBuf>,
        docs_root: impl Into<PathBuf>,
        docs: &'a [DocInfo],
    ) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            docs_root: docs_root.into(),
            docs,
        }
    }

    /// Discover templates, sorted by `order`.
    ///
    /// Files without `title` or `description` are rejected.
    pub fn find_template_files(&self) -> Result<Vec<TemplateFile>, LlmError> {
        if !self.templates_dir.is_dir() {
            return Err(LlmError::TemplatesDirNotFound(self.templates_dir.clone()));
        }

        let pattern = self.templates_dir.join("*.mdx");
        let mut templates = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let file_path = match entry {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping unreadable template");
                    continue;
                }
            };
            templates.push(read_template(file_path)?);
        }

        templates.sort_by_key(|t| t.metadata.order.unwrap_or(DEFAULT_ORDER));
        Ok(templates)
    }

    /// Matched docs wrapped in `<ContentSection>` elements, blank-line separated.
    ///
    /// A matched doc without a source file fails the whole expansion.
    pub fn generate_included_content(&self, docs: &[&DocInfo]) -> Result<String, LlmError> {
        let sections = docs
            .iter()
            .map(|doc| -> Result<String, LlmError> {
                Ok(DocSource::read(&self.docs_root, doc)?.wrap(&doc.route_path))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sections.join("\n\n"))
    }

    /// Replace every include directive in the template body.
    pub fn process_template(&self, template: &TemplateFile) -> Result<String, LlmError> {
        let mut processed = template.content.clone();
        for include in parse_include_directives(&template.content) {
            let docs = filter_docs_by_routes(self.docs, &include.routes);
            tracing::debug!(
                template = %template.slug,
                routes = ?include.routes,
                matched = docs.len(),
                "Expanding include"
            );
            let expanded = self.generate_included_content(&docs)?;
            processed = processed.replacen(&include.full_match, &expanded, 1);
        }
        Ok(processed)
    }

    /// Expand every template into `<output_dir>/<slug>.mdx`.
    pub fn generate_templates(&self, output_dir: &Path) -> Result<Vec<TemplateFile>, LlmError> {
        let templates = self.find_template_files()?;
        tracing::info!(count = templates.len(), "Found template files");

        std::fs::create_dir_all(output_dir).map_err(|e| LlmError::io(output_dir, e))?;
        for template in &templates {
            let processed = self.process_template(template)?;
            let output = output_dir.join(format!("{}.mdx", template.slug));
            std::fs::write(&output, &processed).map_err(|e| LlmError::io(&output, e))?;
            tracing::info!(
                path = %output.display(),
                chars = processed.chars().count(),
                "Generated template"
            );
        }
        Ok(templates)
    }
}

fn read_template(file_path: PathBuf) -> Result<TemplateFile, LlmError> {
    let raw = std::fs::read_to_string(&file_path).map_err(|e| LlmError::io(&file_path, e))?;
    let parsed = parse_frontmatter(&raw);

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let slug = file_name
        .strip_suffix(".mdx")
        .unwrap_or(&file_name)
        .to_owned();

    let title = fm_str(&parsed.frontmatter, "title").ok_or_else(|| LlmError::MissingField {
        template: file_name.clone(),
        field: "title",
    })?;
    let description =
        fm_str(&parsed.frontmatter, "description").ok_or_else(|| LlmError::MissingField {
            template: file_name.clone(),
            field: "description",
        })?;
    let order = parsed.frontmatter.get("order").and_then(|value| match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    Ok(TemplateFile {
        file_path,
        slug,
        metadata: TemplateMetadata {
            title,
            description,
            order,
        },
        content: parsed.content,
    })
}
