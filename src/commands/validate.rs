//! Route consistency check for CI

use anyhow::Result;

use crate::validate::ConsistencyValidator;
use crate::Site;

/// Print the report; duplicates or missing routes fail the run
pub fn run(site: &Site) -> Result<()> {
    let validator =
        ConsistencyValidator::new(site.config.validate.allowed_orphans.iter().cloned());
    let report = validator.run(site)?;
    report.print();

    if report.has_failures() {
        anyhow::bail!("Route validation failed: {}", report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{self, RouteManifest};
    use std::fs;
    use tempfile::TempDir;

    fn site_with(files: &[&str]) -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        for rel in files {
            let path = site.content_roots()[0].join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        (dir, site)
    }

    fn write_manifest(site: &Site) {
        let table = routes::build_route_table(site).unwrap();
        RouteManifest::from_table(&table, &site.base_dir)
            .save(&site.manifest_path)
            .unwrap();
    }

    #[test]
    fn test_duplicates_fail() {
        let (_dir, site) = site_with(&["features/x.tsx", "uses/x.tsx"]);
        let err = run(&site).unwrap_err();
        assert!(err.to_string().contains("1 duplicate slug(s)"));
    }

    #[test]
    fn test_missing_routes_fail() {
        let (_dir, site) = site_with(&["features/a.tsx"]);
        write_manifest(&site);
        fs::write(site.content_roots()[0].join("features/b.tsx"), "").unwrap();

        let err = run(&site).unwrap_err();
        assert!(err.to_string().contains("1 missing route(s)"));
    }

    #[test]
    fn test_orphans_alone_pass() {
        let (_dir, site) = site_with(&["features/a.tsx", "features/b.tsx"]);
        write_manifest(&site);
        fs::remove_file(site.content_roots()[0].join("features/b.tsx")).unwrap();

        assert!(run(&site).is_ok());
    }
}
