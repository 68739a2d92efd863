use std::path::PathBuf;

/// Template or LLM document generation error.
///
/// Every variant is fatal: a broken include is an authoring bug.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Templates directory not found: {}", .0.display())]
    TemplatesDirNotFound(PathBuf),

    #[error("Template {template} is missing required field: {field}")]
    MissingField {
        template: String,
        field: &'static str,
    },

    /// A matched doc has no source file.
    #[error("Required doc file not found: {}", .0.display())]
    MissingDoc(PathBuf),

    #[error("ID collision detected: {id} (from {route})")]
    IdCollision { id: String, route: String },

    /// Directive failed structural checks.
    #[error("{0}")]
    InvalidDirective(String),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid LLM document meta {}: {source}", .path.display())]
    Meta {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize LLM document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid template pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl LlmError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
