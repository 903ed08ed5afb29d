//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Hard ceiling on records requested from the external feed
pub const MAX_FEED_LIMIT: usize = 1000;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute site origin, e.g. `https://www.stockflow.be`
    pub url: String,

    // Directory
    pub source_dir: String,
    pub content_roots: Vec<String>,
    pub extensions: Vec<String>,
    pub public_dir: String,
    pub manifest: String,

    #[serde(default)]
    pub slugs: SlugConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub validate: ValidateConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://www.stockflow.be".to_string(),

            source_dir: "src/pages".to_string(),
            content_roots: vec!["SEO".to_string(), "seo".to_string()],
            extensions: vec!["tsx".to_string()],
            public_dir: "public".to_string(),
            manifest: "src/routes.manifest.json".to_string(),

            slugs: SlugConfig::default(),
            sitemap: SitemapConfig::default(),
            feed: FeedConfig::default(),
            validate: ValidateConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Site origin without a trailing slash
    pub fn origin(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Slug derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugConfig {
    /// Second-level glossary terms that keep their historical flat URL
    pub legacy_glossary_terms: Vec<String>,
    /// Glob patterns for helper files that are never pages
    pub exclude: Vec<String>,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            legacy_glossary_terms: vec![
                "asset-tracking".to_string(),
                "asset-controller-meaning".to_string(),
                "vendor-managed-stock".to_string(),
            ],
            exclude: vec![
                "**/components/**".to_string(),
                "**/*Layout.tsx".to_string(),
                "**/*.test.tsx".to_string(),
                "**/types.tsx".to_string(),
            ],
        }
    }
}

/// Sitemap and robots settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub static_routes: Vec<String>,
    /// Category hubs, ranked just below the home page
    pub hubs: Vec<String>,
    /// Marquee images keyed by URL path
    pub images: IndexMap<String, ImageConfig>,
    /// Prefixes robots must not crawl
    pub disallow: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        let mut images = IndexMap::new();
        images.insert(
            "/".to_string(),
            ImageConfig {
                loc: "https://www.stockflow.be/logo.png".to_string(),
                title: Some("StockFlow".to_string()),
            },
        );
        images.insert(
            "/features".to_string(),
            ImageConfig {
                loc: "https://www.stockflow.be/optimized/desktop.png".to_string(),
                title: Some("StockFlow dashboard".to_string()),
            },
        );

        Self {
            static_routes: ["/", "/features", "/pricing", "/contact", "/demo", "/blog"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hubs: ["/features", "/pricing", "/blog", "/glossary", "/solutions", "/industries"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            images,
            disallow: ["/admin", "/dashboard", "/auth", "/checkout", "/api"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Image sub-element for a sitemap URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub loc: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// External published-content feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// REST endpoint base; unset means the feed is unconfigured
    pub endpoint: Option<String>,
    pub table: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub limit: usize,
    /// URL prefix prepended to feed slugs
    pub route_prefix: String,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            table: "blogposts".to_string(),
            api_key_env: "FEED_API_KEY".to_string(),
            limit: 500,
            route_prefix: "/blog".to_string(),
            timeout_secs: 10,
        }
    }
}

impl FeedConfig {
    /// Requested fetch size, clamped to [`MAX_FEED_LIMIT`]
    pub fn effective_limit(&self) -> usize {
        self.limit.min(MAX_FEED_LIMIT)
    }
}

/// Consistency validator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Live routes allowed to exist without a backing file
    pub allowed_orphans: Vec<String>,
}
