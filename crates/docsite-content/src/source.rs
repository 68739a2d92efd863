//! Raw content sources and their error type.
//!
//! A [`ContentSource`] maps a resolved content path (`/content/doc/x.mdx`,
//! `/static/content/doc/x.json`) to the raw text stored there. Sources do not
//! interpret the text; the loader decides whether it is MDX or JSON.

use std::path::{Component, Path, PathBuf};

/// Category of a source failure.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Nothing is stored at the path.
    NotFound,
    PermissionDenied,
    /// Path does not map to any location of this source.
    InvalidPath,
    /// Data exists but could not be decoded.
    InvalidData,
    Other,
}

/// Error returned by [`ContentSource`] implementations.
#[derive(Debug)]
pub struct SourceError {
    pub kind: SourceErrorKind,
    pub path: Option<String>,
    /// Name of the source that failed (e.g. `"fs"`).
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the underlying cause, if any.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == SourceErrorKind::NotFound
    }

    /// Classify an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => SourceErrorKind::InvalidData,
            _ => SourceErrorKind::Other,
        };
        Self::new(kind).with_source(err).with_path(path)
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidPath => "Invalid path",
            SourceErrorKind::InvalidData => "Invalid data",
            SourceErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }
        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Raw text storage addressed by resolved content paths.
pub trait ContentSource: Send + Sync {
    /// Read the text stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceErrorKind::NotFound`] when nothing is stored at `path`.
    fn fetch(&self, path: &str) -> Result<String, SourceError>;

    /// Whether something is stored at `path`.
    fn exists(&self, path: &str) -> bool {
        self.fetch(path).is_ok()
    }
}

/// Filesystem source that serves URL prefixes from directories.
///
/// ```
/// use docsite_content::{ContentSource, FsSource};
///
/// let source = FsSource::new()
///     .mount("/content", "site/content")
///     .mount("/static", "site/public/static");
/// assert!(!source.exists("/content/doc/missing.mdx"));
/// ```
#[derive(Debug, Default)]
pub struct FsSource {
    mounts: Vec<(String, PathBuf)>,
}

impl FsSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve paths under `prefix` from `dir`.
    #[must_use]
    pub fn mount(mut self, prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_owned();
        self.mounts.push((prefix, dir.into()));
        // Longest prefix first so nested mounts take precedence.
        self.mounts.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    /// Map a content path to a file, using the longest matching mount.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        self.mounts.iter().find_map(|(prefix, dir)| {
            let rest = path.strip_prefix(prefix.as_str())?;
            let rest = Path::new(rest.strip_prefix('/')?);
            // Plain segments only, so the result stays under `dir`.
            if rest.as_os_str().is_empty()
                || !rest.components().all(|c| matches!(c, Component::Normal(_)))
            {
                return None;
            }
            Some(dir.join(rest))
        })
    }
}

impl ContentSource for FsSource {
    fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let file = self.resolve(path).ok_or_else(|| {
            SourceError::new(SourceErrorKind::InvalidPath)
                .with_path(path)
                .with_backend("fs")
        })?;
        tracing::debug!(path, file = %file.display(), "Reading content");
        std::fs::read_to_string(&file).map_err(|err| SourceError::io(err, path).with_backend("fs"))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|file| file.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_longest_mount() {
        let source = FsSource::new()
            .mount("/static", "/public/static")
            .mount("/static/content", "/srv/content");
        assert_eq!(
            source.resolve("/static/content/doc/a.json"),
            Some(PathBuf::from("/srv/content/doc/a.json"))
        );
        assert_eq!(
            source.resolve("/static/posts-list.json"),
            Some(PathBuf::from("/public/static/posts-list.json"))
        );
    }

    #[test]
    fn test_resolve_rejects_unmounted_and_traversal() {
        let source = FsSource::new().mount("/content", "/site/content");
        assert!(source.resolve("/other/a.mdx").is_none());
        assert!(source.resolve("/contentx/a.mdx").is_none());
        assert!(source.resolve("/content/../secret").is_none());
        assert!(source.resolve("/content//etc/hosts").is_none());
        assert!(source.resolve("/content/").is_none());
        assert!(source.resolve("/content/./a.mdx").is_none());
    }

    #[test]
    fn test_fetch_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("doc")).unwrap();
        std::fs::write(dir.path().join("doc/index.mdx"), "# Hello").unwrap();
        let source = FsSource::new().mount("/content", dir.path());

        assert_eq!(source.fetch("/content/doc/index.mdx").unwrap(), "# Hello");
        assert!(source.exists("/content/doc/index.mdx"));
    }

    #[test]
    fn test_fetch_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new().mount("/content", dir.path());

        let err = source.fetch("/content/doc/missing.mdx").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.downcast_source::<std::io::Error>().is_some());
        assert_eq!(err.path.as_deref(), Some("/content/doc/missing.mdx"));
    }

    #[test]
    fn test_fetch_unmounted_is_invalid_path() {
        let err = FsSource::new().fetch("/content/doc/a.mdx").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::InvalidPath);
        assert_eq!(err.to_string(), "[fs] Invalid path (path: /content/doc/a.mdx)");
    }
}
