//! Generate sitemap.xml and robots.txt

use anyhow::{Context, Result};
use std::fs;

use crate::sitemap::{robots::robots_txt, SitemapAssembler};
use crate::Site;

/// Assemble the sitemap and write both artifacts to the public directory
pub async fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let sitemap = SitemapAssembler::new(site).assemble_configured().await?;

    fs::create_dir_all(&site.public_dir)
        .with_context(|| format!("Failed to create {}", site.public_dir.display()))?;

    let sitemap_path = site.public_dir.join("sitemap.xml");
    fs::write(&sitemap_path, sitemap.to_xml())
        .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;
    tracing::info!("Generated sitemap.xml with {} URLs", sitemap.len());

    let robots_path = site.public_dir.join("robots.txt");
    fs::write(&robots_path, robots_txt(&site.config))
        .with_context(|| format!("Failed to write robots to {}", robots_path.display()))?;
    tracing::info!("Generated robots.txt");

    tracing::info!("Completed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let page = site.content_roots()[0].join("features/barcode/scanning.tsx");
        fs::create_dir_all(page.parent().unwrap()).unwrap();
        fs::write(&page, "").unwrap();

        run(&site).await.unwrap();

        let xml = fs::read_to_string(site.public_dir.join("sitemap.xml")).unwrap();
        assert!(xml.contains("<loc>https://www.stockflow.be/scanning</loc>"));
        assert!(xml.contains("<loc>https://www.stockflow.be/</loc>"));

        let robots = fs::read_to_string(site.public_dir.join("robots.txt")).unwrap();
        assert!(robots.ends_with("Sitemap: https://www.stockflow.be/sitemap.xml\n"));
    }
}
