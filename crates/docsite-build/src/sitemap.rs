//! `sitemap.xml` generation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use docsite_content::{BlogMeta, ContentType, canonical_url};
use docsite_spec::DocRegistry;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::BuildError;
use crate::preprocess::MetadataIndex;

/// Namespace of the sitemap protocol.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const BLOG_ROUTE: &str = "/blog";

/// Route prefixes never listed in the sitemap.
const HIDDEN_PREFIXES: &[&str] = &["/dev"];

/// Expected change frequency of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
}

impl ChangeFreq {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// One `<url>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    /// `YYYY-MM-DD`.
    pub lastmod: String,
    pub changefreq: ChangeFreq,
}

/// Collects site routes and renders them as a sitemap.
#[derive(Debug)]
pub struct SitemapBuilder<'a> {
    site_url: String,
    registry: &'a DocRegistry,
    index: &'a MetadataIndex,
    today: NaiveDate,
}

impl<'a> SitemapBuilder<'a> {
    #[must_use]
    pub fn new(site_url: &str, registry: &'a DocRegistry, index: &'a MetadataIndex) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_owned(),
            registry,
            index,
            today: Utc::now().date_naive(),
        }
    }

    /// Date used as `lastmod` for pages without their own date.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Unique routes, sorted.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        let mut routes = BTreeSet::new();
        routes.insert("/".to_owned());
        routes.insert(BLOG_ROUTE.to_owned());
        routes.extend(self.registry.route_paths().map(str::to_owned));
        routes.extend(
            self.index
                .blog
                .iter()
                .map(|post| format!("{BLOG_ROUTE}/{}", post.base.slug)),
        );
        routes.extend(self.index.policy.iter().map(|policy| {
            let path = &policy.base.path;
            let stem = path.strip_prefix("policy/").unwrap_or(path);
            canonical_url(stem, ContentType::Policy)
        }));

        routes
            .into_iter()
            .filter(|route| !is_hidden(route))
            .collect()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<SitemapEntry> {
        let today = self.today.format("%Y-%m-%d").to_string();
        // Index is sorted newest first.
        let latest_post = self.index.blog.first().map(last_modified);

        self.routes()
            .into_iter()
            .map(|route| {
                let (lastmod, changefreq) = if route == BLOG_ROUTE {
                    (latest_post.unwrap_or(today.as_str()).to_owned(), ChangeFreq::Daily)
                } else if let Some(slug) = route.strip_prefix("/blog/") {
                    let lastmod = self
                        .index
                        .blog
                        .iter()
                        .find(|post| post.base.slug == slug)
                        .map_or(today.as_str(), last_modified);
                    (lastmod.to_owned(), ChangeFreq::Weekly)
                } else {
                    (today.clone(), ChangeFreq::Daily)
                };
                SitemapEntry {
                    loc: format!("{}{route}", self.site_url),
                    lastmod,
                    changefreq,
                }
            })
            .collect()
    }

    /// Render the sitemap document.
    pub fn to_xml(&self) -> Result<String, BuildError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_urlset(&mut writer, &self.entries()).map_err(BuildError::Sitemap)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    /// Write `<public_dir>/sitemap.xml`.
    pub fn write(&self, public_dir: &Path) -> Result<PathBuf, BuildError> {
        let xml = self.to_xml()?;
        std::fs::create_dir_all(public_dir).map_err(|e| BuildError::io(public_dir, e))?;
        let path = public_dir.join("sitemap.xml");
        std::fs::write(&path, xml).map_err(|e| BuildError::io(&path, e))?;
        tracing::info!(path = %path.display(), "Generated sitemap");
        Ok(path)
    }
}

fn last_modified(post: &BlogMeta) -> &str {
    post.last_updated.as_deref().unwrap_or(&post.date)
}

fn is_hidden(route: &str) -> bool {
    HIDDEN_PREFIXES.iter().any(|prefix| {
        route
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn write_urlset(writer: &mut Writer<Vec<u8>>, entries: &[SitemapEntry]) -> std::io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;
    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        writer
            .create_element("loc")
            .write_text_content(BytesText::new(&entry.loc))?;
        writer
            .create_element("lastmod")
            .write_text_content(BytesText::new(&entry.lastmod))?;
        writer
            .create_element("changefreq")
            .write_text_content(BytesText::new(entry.changefreq.as_str()))?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(())
}
