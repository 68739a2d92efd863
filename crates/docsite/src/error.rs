//! CLI error types.

use docsite_build::BuildError;
use docsite_config::ConfigError;
use docsite_content::ContentError;
use docsite_llms::LlmError;
use docsite_spec::SpecError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Spec(#[from] SpecError),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
