//! MDX to static JSON preprocessing.
//!
//! Every `<content_root>/<type>/**/*.mdx` file is validated and written to
//! `<public>/static/content/<type>/<path>.json` as `{meta, content}`, where
//! `content` is the full source with its frontmatter. Per-type metadata
//! indexes land in `<public>/static/content-meta/<type>/index.json`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use docsite_content::{
    BlogMeta, ContentMeta, ContentType, DocMeta, Frontmatter, PolicyMeta, StaticContent, fm_str,
    parse_frontmatter,
};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BuildError;

static VALID_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("valid regex"));

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

const INDEX_FILE: &str = "index.json";

/// Metadata of every processed file, grouped by content type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataIndex {
    /// Newest first.
    pub blog: Vec<BlogMeta>,
    pub doc: Vec<DocMeta>,
    pub policy: Vec<PolicyMeta>,
    pub dev: Vec<ContentMeta>,
}

impl MetadataIndex {
    /// Read the index files under `static_dir/content-meta`.
    ///
    /// Types without an index file are left empty.
    pub fn read(static_dir: &Path) -> Result<Self, BuildError> {
        let meta_dir = static_dir.join("content-meta");
        Ok(Self {
            blog: read_index(&meta_dir, ContentType::Blog)?,
            doc: read_index(&meta_dir, ContentType::Doc)?,
            policy: read_index(&meta_dir, ContentType::Policy)?,
            dev: read_index(&meta_dir, ContentType::Dev)?,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blog.len() + self.doc.len() + self.policy.len() + self.dev.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, meta: FileMeta) {
        match meta {
            FileMeta::Blog(meta) => self.blog.push(meta),
            FileMeta::Doc(meta) => self.doc.push(meta),
            FileMeta::Policy(meta) => self.policy.push(meta),
            FileMeta::Dev(meta) => self.dev.push(meta),
        }
    }

    fn sort_blog_posts(&mut self) {
        // Dates are validated as YYYY-MM-DD, so string order is date order.
        self.blog.sort_by(|a, b| b.date.cmp(&a.date));
    }
}

fn read_index<T: DeserializeOwned>(
    meta_dir: &Path,
    content_type: ContentType,
) -> Result<Vec<T>, BuildError> {
    let path = meta_dir.join(content_type.as_str()).join(INDEX_FILE);
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(&path).map_err(|e| BuildError::io(&path, e))?;
    serde_json::from_str(&raw).map_err(|source| BuildError::Index { path, source })
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
enum FileMeta {
    Blog(BlogMeta),
    Doc(DocMeta),
    Policy(PolicyMeta),
    Dev(ContentMeta),
}

/// Converts authored MDX into production static files.
#[derive(Debug)]
pub struct ContentPreprocessor {
    content_root: PathBuf,
    public_dir: PathBuf,
}

impl ContentPreprocessor {
    #[must_use]
    pub fn new(content_root: impl Into<PathBuf>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            public_dir: public_dir.into(),
        }
    }

    /// `<public>/static`.
    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        self.public_dir.join("static")
    }

    fn content_dir(&self, content_type: ContentType) -> PathBuf {
        self.static_dir().join("content").join(content_type.as_str())
    }

    fn meta_dir(&self, content_type: ContentType) -> PathBuf {
        self.static_dir()
            .join("content-meta")
            .join(content_type.as_str())
    }

    /// Process every content type and write the metadata indexes.
    ///
    /// File-level failures do not stop the run. They are collected and
    /// returned together as [`BuildError::Preprocess`] once the indexes for
    /// the valid files are written.
    pub fn process_all(&self) -> Result<MetadataIndex, BuildError> {
        for content_type in ContentType::ALL {
            for dir in [self.content_dir(content_type), self.meta_dir(content_type)] {
                std::fs::create_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;
            }
        }

        let mut index = MetadataIndex::default();
        let mut errors = Vec::new();
        for content_type in ContentType::ALL {
            self.process_content_type(content_type, &mut index, &mut errors);
        }
        index.sort_blog_posts();

        self.write_index(ContentType::Blog, &index.blog)?;
        self.write_index(ContentType::Doc, &index.doc)?;
        self.write_index(ContentType::Policy, &index.policy)?;
        self.write_index(ContentType::Dev, &index.dev)?;

        if !errors.is_empty() {
            return Err(BuildError::Preprocess(errors));
        }
        tracing::info!(files = index.len(), "Content preprocessing complete");
        Ok(index)
    }

    fn process_content_type(
        &self,
        content_type: ContentType,
        index: &mut MetadataIndex,
        errors: &mut Vec<String>,
    ) {
        let src_dir = self.content_root.join(content_type.as_str());
        if !src_dir.is_dir() {
            tracing::warn!(
                content_type = %content_type,
                dir = %src_dir.display(),
                "Source directory not found, skipping"
            );
            return;
        }

        let files = match find_mdx_files(&src_dir) {
            Ok(files) => files,
            Err(err) => {
                errors.push(format!("Error processing {content_type} content: {err}"));
                return;
            }
        };
        tracing::info!(content_type = %content_type, count = files.len(), "Found MDX files");

        for file in files {
            match self.process_file(&file, &src_dir, content_type) {
                Ok(meta) => index.push(meta),
                Err(err) => {
                    tracing::error!(
                        file = %file.display(),
                        error = %err,
                        "Failed to process content"
                    );
                    errors.push(format!("Error processing {}: {err}", file.display()));
                }
            }
        }
    }

    fn process_file(
        &self,
        file: &Path,
        src_dir: &Path,
        content_type: ContentType,
    ) -> Result<FileMeta, BuildError> {
        let raw = std::fs::read_to_string(file).map_err(|e| BuildError::io(file, e))?;
        let parsed = parse_frontmatter(&raw);

        let filename = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !VALID_FILENAME.is_match(&filename) {
            return Err(BuildError::InvalidFilename {
                filename,
                path: file.to_path_buf(),
            });
        }

        let relative = file
            .strip_prefix(src_dir)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/");
        let subpath = relative.strip_suffix(".mdx").unwrap_or(&relative);

        let meta = create_metadata(content_type, &parsed.frontmatter, subpath, file)?;

        let output = self.content_dir(content_type).join(format!("{subpath}.json"));
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        let entry = StaticContent {
            meta: &meta,
            content: raw,
        };
        std::fs::write(&output, serde_json::to_string(&entry)?)
            .map_err(|e| BuildError::io(&output, e))?;

        tracing::debug!(content_type = %content_type, subpath, "Processed content file");
        Ok(meta)
    }

    fn write_index<T: Serialize>(
        &self,
        content_type: ContentType,
        items: &[T],
    ) -> Result<(), BuildError> {
        if items.is_empty() {
            return Ok(());
        }
        let path = self.meta_dir(content_type).join(INDEX_FILE);
        std::fs::write(&path, serde_json::to_string(items)?)
            .map_err(|e| BuildError::io(&path, e))?;
        tracing::info!(content_type = %content_type, count = items.len(), "Wrote metadata index");
        Ok(())
    }
}

fn find_mdx_files(src_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let pattern = src_dir.join("**").join("*.mdx");
    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) => files.push(path),
            Err(err) => tracing::warn!(error = %err, "Skipping unreadable content file"),
        }
    }
    Ok(files)
}

/// Build typed metadata for one file, reporting every missing field at once.
fn create_metadata(
    content_type: ContentType,
    frontmatter: &Frontmatter,
    subpath: &str,
    file: &Path,
) -> Result<FileMeta, BuildError> {
    let has = |key: &str| fm_str(frontmatter, key).is_some();
    let type_path = format!("{content_type}/{subpath}");

    let mut missing = Vec::new();
    if !has("title") {
        missing.push("title");
    }

    let meta = match content_type {
        ContentType::Blog => {
            missing.extend(["date", "author", "readTime"].into_iter().filter(|&k| !has(k)));
            if let Some(date) = fm_str(frontmatter, "date")
                && !DATE_FORMAT.is_match(&date)
            {
                return Err(BuildError::InvalidDate {
                    path: file.to_path_buf(),
                });
            }
            FileMeta::Blog(BlogMeta::from_frontmatter(frontmatter, type_path, ""))
        }
        ContentType::Doc => {
            let product = subpath.split('/').next().unwrap_or_default().to_owned();
            if product.is_empty() {
                missing.push("product");
            }
            FileMeta::Doc(DocMeta {
                base: ContentMeta::from_frontmatter(frontmatter, type_path, ContentType::Doc),
                product,
                section: None,
                has_extractable_snippets: frontmatter
                    .get("hasExtractableSnippets")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false),
                search_weight: None,
            })
        }
        ContentType::Policy => {
            if !has("lastUpdated") {
                missing.push("lastUpdated");
            }
            FileMeta::Policy(PolicyMeta::from_frontmatter(frontmatter, type_path))
        }
        ContentType::Dev => FileMeta::Dev(ContentMeta::from_frontmatter(
            frontmatter,
            type_path,
            ContentType::Dev,
        )),
    };

    if !missing.is_empty() {
        return Err(BuildError::MissingFields {
            path: file.to_path_buf(),
            fields: missing,
        });
    }
    Ok(meta)
}
