//! Mock content source for testing.
//!
//! Provides [`MockSource`] for exercising the loader without a filesystem.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::source::{ContentSource, SourceError, SourceErrorKind};

/// In-memory content source.
///
/// # Example
///
/// ```ignore
/// use docsite_content::{ContentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_file("/content/doc/mirascope/index.mdx", "---\ntitle: Welcome\n---\n# Hi");
/// assert!(source.exists("/content/doc/mirascope/index.mdx"));
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    files: RwLock<HashMap<String, String>>,
    failures: RwLock<HashMap<String, String>>,
    fetches: AtomicUsize,
}

impl MockSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` at `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Make fetching `path` fail with `message`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(path.into(), message.into());
        self
    }

    /// Replace the content stored at `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Number of `fetch` calls so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl ContentSource for MockSource {
    fn fetch(&self, path: &str) -> Result<String, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = self.failures.read().unwrap().get(path) {
            return Err(SourceError::new(SourceErrorKind::Other)
                .with_source(std::io::Error::other(message.clone()))
                .with_path(path)
                .with_backend("mock"));
        }

        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::not_found(path).with_backend("mock"))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
    }
}
