//! slugroute: canonical slugs for nested content pages
//!
//! This crate resolves a tree of page files into unique URL paths and keeps
//! three consumers in agreement on that mapping: the runtime route table,
//! the sitemap/robots generator and the CI consistency validator.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod routes;
pub mod server;
pub mod sitemap;
pub mod validate;

pub use error::RouteError;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A content site rooted at one directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content base directory (parent of the content roots)
    pub source_dir: PathBuf,
    /// Output directory for sitemap.xml and robots.txt
    pub public_dir: PathBuf,
    /// Generated route manifest
    pub manifest_path: PathBuf,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let manifest_path = base_dir.join(&config.manifest);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            manifest_path,
        }
    }

    /// Absolute content roots, in declaration order
    pub fn content_roots(&self) -> Vec<PathBuf> {
        self.config
            .content_roots
            .iter()
            .map(|root| self.source_dir.join(root))
            .collect()
    }

    /// Generate sitemap.xml and robots.txt
    pub async fn generate_sitemap(&self) -> Result<()> {
        commands::sitemap::run(self).await
    }

    /// Check route consistency, failing on duplicates or missing routes
    pub fn validate(&self) -> Result<()> {
        commands::validate::run(self)
    }

    /// Write the route manifest
    pub fn write_manifest(&self) -> Result<()> {
        commands::manifest::run(self)
    }

    /// Remove generated artifacts
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_site_without_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path().join("src/pages"));
        assert_eq!(
            site.content_roots(),
            vec![
                dir.path().join("src/pages/SEO"),
                dir.path().join("src/pages/seo")
            ]
        );
    }

    #[test]
    fn test_site_reads_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "source_dir: content\ncontent_roots: [pages]\npublic_dir: dist\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.content_roots(), vec![dir.path().join("content/pages")]);
        assert_eq!(site.public_dir, dir.path().join("dist"));
    }
}
