use std::path::{Path, PathBuf};

use crate::spec::FullDocsSpec;

/// Error loading or checking a documentation spec.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Spec file could not be read.
    #[error("Failed to read spec {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON spec failed to parse.
    #[error("Invalid JSON spec {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// YAML spec failed to parse.
    #[error("Invalid YAML spec {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// Spec parsed but failed structural validation.
    #[error("Invalid docs spec:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

/// Serialization format of a spec file, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Pick the format from a file extension. Anything other than `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse a full spec from a string.
pub fn parse_spec(input: &str, format: SpecFormat, path: &Path) -> Result<FullDocsSpec, SpecError> {
    match format {
        SpecFormat::Json => serde_json::from_str(input).map_err(|source| SpecError::Json {
            path: path.to_path_buf(),
            source,
        }),
        SpecFormat::Yaml => serde_yaml::from_str(input).map_err(|source| SpecError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read and parse a full spec file (JSON or YAML by extension).
pub fn load_spec(path: &Path) -> Result<FullDocsSpec, SpecError> {
    let content = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = parse_spec(&content, SpecFormat::from_path(path), path)?;
    tracing::debug!(path = %path.display(), products = spec.len(), "Loaded docs spec");
    Ok(spec)
}
