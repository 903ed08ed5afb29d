//! Remove generated artifacts

use anyhow::Result;
use std::fs;

use crate::Site;

/// Delete sitemap.xml, robots.txt and the route manifest
pub fn run(site: &Site) -> Result<()> {
    let targets = [
        site.public_dir.join("sitemap.xml"),
        site.public_dir.join("robots.txt"),
        site.manifest_path.clone(),
    ];

    for path in targets {
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!("Deleted: {:?}", path);
        }
    }

    Ok(())
}
