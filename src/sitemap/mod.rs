//! Sitemap generation
//!
//! Sources are merged in a fixed order:
//!
//! 1. static routes from configuration
//! 2. every slug from the route table pipeline
//! 3. published posts from the external feed
//!
//! Entries are keyed by absolute URL. A later source updates `lastmod` of an
//! existing entry but never removes one.

mod feed;
pub mod robots;
mod rules;

pub use feed::{sanitize, ContentFeed, FeedPost, PublishedRecord, RestFeed};
pub use rules::{ChangeFreq, RuleChain};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::borrow::Cow;

use crate::config::ImageConfig;
use crate::routes;
use crate::Site;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Characters escaped inside a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One `<url>` element
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub priority: f32,
    pub changefreq: ChangeFreq,
    pub image: Option<ImageConfig>,
}

/// Deduplicated sitemap in insertion order
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    entries: IndexMap<String, SitemapEntry>,
}

impl Sitemap {
    /// Add an entry; an existing URL only takes the new `lastmod`
    pub fn merge(&mut self, entry: SitemapEntry) {
        match self.entries.get_mut(&entry.loc) {
            Some(existing) => existing.lastmod = entry.lastmod,
            None => {
                self.entries.insert(entry.loc.clone(), entry);
            }
        }
    }

    pub fn get(&self, loc: &str) -> Option<&SitemapEntry> {
        self.entries.get(loc)
    }

    pub fn entries(&self) -> impl Iterator<Item = &SitemapEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the namespaced sitemap document
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 160);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<urlset xmlns=\"{}\" xmlns:image=\"{}\">\n",
            SITEMAP_NS, IMAGE_NS
        ));

        for entry in self.entries.values() {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                entry.lastmod.format("%Y-%m-%d")
            ));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.changefreq
            ));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            if let Some(image) = &entry.image {
                xml.push_str("    <image:image>\n");
                xml.push_str(&format!(
                    "      <image:loc>{}</image:loc>\n",
                    escape_xml(&image.loc)
                ));
                if let Some(title) = &image.title {
                    xml.push_str(&format!(
                        "      <image:title>{}</image:title>\n",
                        escape_xml(title)
                    ));
                }
                xml.push_str("    </image:image>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Merges static, file-derived and feed routes into a [`Sitemap`]
#[derive(Debug, Clone)]
pub struct SitemapAssembler<'a> {
    site: &'a Site,
    rules: RuleChain,
    build_date: NaiveDate,
}

impl<'a> SitemapAssembler<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            rules: RuleChain::from_config(&site.config.sitemap, &site.config.feed.route_prefix),
            build_date: Utc::now().date_naive(),
        }
    }

    /// Override the `lastmod` used for static and file-derived routes
    pub fn with_build_date(mut self, date: NaiveDate) -> Self {
        self.build_date = date;
        self
    }

    /// Assemble using the configured feed, if any
    pub async fn assemble_configured(&self) -> Result<Sitemap> {
        match RestFeed::from_config(&self.site.config.feed) {
            Ok(feed) => self.assemble(Some(&feed)).await,
            Err(e) => {
                tracing::warn!("{}; sitemap uses static and file routes only", e);
                self.assemble(None::<&RestFeed>).await
            }
        }
    }

    /// Scan the content roots and query the feed concurrently, then merge
    pub async fn assemble<F: ContentFeed>(&self, feed: Option<&F>) -> Result<Sitemap> {
        let site = self.site.clone();
        let scan = tokio::task::spawn_blocking(move || routes::build_route_table(&site));

        let limit = self.site.config.feed.effective_limit();
        let fetch = async {
            match feed {
                Some(feed) => feed.fetch_published(limit).await.map(Some),
                None => Ok(None),
            }
        };

        let (table, records) = tokio::join!(scan, fetch);
        let table = table??;

        let posts = match records {
            Ok(Some(records)) => sanitize(records, limit),
            Ok(None) => Vec::new(),
            Err(e) if e.is_degradable() => {
                tracing::warn!("{}; sitemap uses static and file routes only", e);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.merge(table.slugs(), &posts))
    }

    /// Merge the three sources in priority order
    pub fn merge<'s>(
        &self,
        discovered: impl IntoIterator<Item = &'s str>,
        posts: &[FeedPost],
    ) -> Sitemap {
        let mut sitemap = Sitemap::default();

        for path in &self.site.config.sitemap.static_routes {
            sitemap.merge(self.entry(path, self.build_date));
        }

        for slug in discovered {
            sitemap.merge(self.entry(slug, self.build_date));
        }

        let prefix = self.site.config.feed.route_prefix.trim_end_matches('/');
        for post in posts {
            let path = format!("{}/{}", prefix, post.slug);
            sitemap.merge(self.entry(&path, post.published));
        }

        sitemap
    }

    fn entry(&self, path: &str, lastmod: NaiveDate) -> SitemapEntry {
        let (priority, changefreq) = self.rules.classify(path);
        SitemapEntry {
            loc: absolute_url(self.site.config.origin(), path),
            lastmod,
            priority,
            changefreq,
            image: self.site.config.sitemap.images.get(path).cloned(),
        }
    }
}

/// Join the origin and a URL path, percent-encoding each segment
pub fn absolute_url(origin: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
        .collect();

    if encoded.is_empty() {
        format!("{}/", origin)
    } else {
        format!("{}/{}", origin, encoded.join("/"))
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
