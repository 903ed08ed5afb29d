//! Write the route manifest (with optional watch mode)

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::time::Duration;

use crate::routes::{build_route_table, RouteManifest};
use crate::Site;

/// Scan the content roots and write the manifest
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let table = build_route_table(site)?;
    RouteManifest::from_table(&table, &site.base_dir).save(&site.manifest_path)?;

    tracing::info!(
        "Wrote {} routes to {:?} in {:.2}s",
        table.len(),
        site.manifest_path,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Regenerate the manifest whenever content changes
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for root in site.content_roots() {
        if root.exists() {
            debouncer.watcher().watch(&root, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", root);
        }
    }

    tracing::info!("Watching for content changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                // the manifest may live under a content root
                let relevant = events.iter().any(|e| e.path != site.manifest_path);
                if !relevant {
                    continue;
                }

                tracing::info!("Content changed, regenerating manifest...");
                if let Err(e) = run(site) {
                    tracing::error!("Manifest generation failed: {}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_writes_manifest() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let page = site.content_roots()[0].join("solutions/inventory/management.tsx");
        fs::create_dir_all(page.parent().unwrap()).unwrap();
        fs::write(&page, "").unwrap();

        run(&site).unwrap();

        let manifest = RouteManifest::load(&site.manifest_path).unwrap();
        assert_eq!(manifest.routes.len(), 1);
        assert_eq!(manifest.routes[0].slug, "/solutions/inventory/management");
        assert_eq!(
            manifest.routes[0].module,
            "src/pages/SEO/solutions/inventory/management.tsx"
        );
    }
}
