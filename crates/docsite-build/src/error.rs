use std::path::PathBuf;

/// Static build error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// One or more content files failed; every message is kept.
    #[error("Content preprocessing failed:\n  - {}", .0.join("\n  - "))]
    Preprocess(Vec<String>),

    #[error(
        "Invalid filename \"{filename}\" in {}. Filenames must be lowercase, contain only \
         letters, numbers, and hyphens, and cannot have consecutive or leading/trailing hyphens.",
        .path.display()
    )]
    InvalidFilename { filename: String, path: PathBuf },

    #[error(
        "Missing required fields in {}: {}. These fields must be provided in the frontmatter.",
        .path.display(),
        .fields.join(", ")
    )]
    MissingFields {
        path: PathBuf,
        fields: Vec<&'static str>,
    },

    #[error("Invalid date format in {}. Date must be in YYYY-MM-DD format.", .path.display())]
    InvalidDate { path: PathBuf },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write sitemap")]
    Sitemap(#[source] std::io::Error),

    #[error("Failed to read metadata index {}: {source}", .path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid content pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
