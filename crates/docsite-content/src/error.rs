use crate::content_type::ContentType;
use crate::source::SourceError;

/// Boxed error accepted by [`handle_content_error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Content loading error.
///
/// Every variant records the content type and, where known, the path that
/// was being loaded.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Path does not belong to the content type.
    #[error("Invalid {content_type} path: {path}")]
    InvalidPath {
        content_type: ContentType,
        path: String,
    },
    /// Nothing is stored for the path.
    #[error("{content_type} document not found: {path}")]
    DocumentNotFound {
        content_type: ContentType,
        path: String,
    },
    /// Fetching or decoding failed for another reason.
    #[error("Failed to load {content_type} content: {path} - {cause}")]
    ContentLoad {
        content_type: ContentType,
        path: String,
        cause: String,
    },
    /// Metadata failed required-field validation.
    #[error("Failed to process {content_type} metadata: {path} - {cause}")]
    Metadata {
        content_type: ContentType,
        path: String,
        cause: String,
    },
    /// Any other content failure.
    #[error("{message}")]
    Other {
        content_type: ContentType,
        path: Option<String>,
        message: String,
    },
}

impl ContentError {
    #[must_use]
    pub fn invalid_path(content_type: ContentType, path: impl Into<String>) -> Self {
        Self::InvalidPath {
            content_type,
            path: path.into(),
        }
    }

    #[must_use]
    pub fn not_found(content_type: ContentType, path: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            content_type,
            path: path.into(),
        }
    }

    #[must_use]
    pub fn load(
        content_type: ContentType,
        path: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::ContentLoad {
            content_type,
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    #[must_use]
    pub fn metadata(
        content_type: ContentType,
        path: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::Metadata {
            content_type,
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::InvalidPath { content_type, .. }
            | Self::DocumentNotFound { content_type, .. }
            | Self::ContentLoad { content_type, .. }
            | Self::Metadata { content_type, .. }
            | Self::Other { content_type, .. } => *content_type,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidPath { path, .. }
            | Self::DocumentNotFound { path, .. }
            | Self::ContentLoad { path, .. }
            | Self::Metadata { path, .. } => Some(path),
            Self::Other { path, .. } => path.as_deref(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }
}

/// Messages that signal a missing resource when no typed error is available.
const NOT_FOUND_MARKERS: [&str; 3] = ["404", "not found", "ENOENT"];

/// Classify an arbitrary error raised while loading content.
///
/// A [`ContentError`] is returned unchanged, so classifying twice is a
/// no-op. Missing-resource signals become [`ContentError::DocumentNotFound`]:
/// a [`SourceError`] of kind `NotFound`, or any message mentioning `404`,
/// `not found`, or `ENOENT`. Everything else is wrapped as
/// [`ContentError::ContentLoad`] with the original message as the cause.
#[must_use]
pub fn handle_content_error(err: BoxError, content_type: ContentType, path: &str) -> ContentError {
    let err = match err.downcast::<ContentError>() {
        Ok(known) => return *known,
        Err(other) => other,
    };

    if err
        .downcast_ref::<SourceError>()
        .is_some_and(SourceError::is_not_found)
    {
        return ContentError::not_found(content_type, path);
    }

    let message = err.to_string();
    if NOT_FOUND_MARKERS.iter().any(|marker| message.contains(marker)) {
        return ContentError::not_found(content_type, path);
    }

    ContentError::load(content_type, path, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceErrorKind;

    #[test]
    fn test_messages() {
        assert_eq!(
            ContentError::not_found(ContentType::Doc, "mirascope/index.mdx").to_string(),
            "doc document not found: mirascope/index.mdx"
        );
        assert_eq!(
            ContentError::invalid_path(ContentType::Blog, "/docs/x").to_string(),
            "Invalid blog path: /docs/x"
        );
        assert_eq!(
            ContentError::load(ContentType::Policy, "privacy.mdx", "boom").to_string(),
            "Failed to load policy content: privacy.mdx - boom"
        );
        assert_eq!(
            ContentError::metadata(ContentType::Blog, "/blog/x", "Invalid metadata: a").to_string(),
            "Failed to process blog metadata: /blog/x - Invalid metadata: a"
        );
    }

    #[test]
    fn test_accessors() {
        let err = ContentError::invalid_path(ContentType::Dev, "/x");
        assert_eq!(err.content_type(), ContentType::Dev);
        assert_eq!(err.path(), Some("/x"));

        let other = ContentError::Other {
            content_type: ContentType::Doc,
            path: None,
            message: "failed".to_owned(),
        };
        assert_eq!(other.path(), None);
    }

    #[test]
    fn test_known_errors_pass_through() {
        let original = ContentError::invalid_path(ContentType::Doc, "/bad");
        let handled = handle_content_error(Box::new(original), ContentType::Blog, "/other");
        assert!(matches!(
            handled,
            ContentError::InvalidPath { content_type: ContentType::Doc, ref path } if path == "/bad"
        ));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let once = handle_content_error("disk on fire".into(), ContentType::Doc, "a.mdx");
        let twice = handle_content_error(Box::new(once), ContentType::Doc, "a.mdx");
        assert_eq!(
            twice.to_string(),
            "Failed to load doc content: a.mdx - disk on fire"
        );
    }

    #[test]
    fn test_source_not_found_becomes_document_not_found() {
        let err = SourceError::not_found("/content/doc/a.mdx");
        let handled = handle_content_error(Box::new(err), ContentType::Doc, "a.mdx");
        assert!(handled.is_not_found());
    }

    #[test]
    fn test_not_found_messages() {
        for message in [
            "HTTP 404",
            "file not found",
            "ENOENT: no such file or directory",
        ] {
            let handled = handle_content_error(message.into(), ContentType::Blog, "x");
            assert!(handled.is_not_found(), "{message}");
        }
    }

    #[test]
    fn test_other_errors_are_wrapped() {
        let err = SourceError::new(SourceErrorKind::PermissionDenied).with_path("/content/x");
        let handled = handle_content_error(Box::new(err), ContentType::Policy, "x");
        assert!(matches!(
            handled,
            ContentError::ContentLoad { ref cause, .. } if cause.contains("Permission denied")
        ));
    }
}
