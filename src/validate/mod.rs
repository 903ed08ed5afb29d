//! Route consistency validation
//!
//! Recomputes the file -> slug mapping from disk and checks it against the
//! live route table (the generated manifest). Without a manifest only the
//! file mapping itself is checked; an unreadable one fails the run.

mod report;

pub use report::ValidationReport;

use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::content::{self, ContentFile};
use crate::routes::{RouteManifest, RouteTable};
use crate::Site;

/// Cross-checks discovered files against a live route table
#[derive(Debug, Clone, Default)]
pub struct ConsistencyValidator {
    allowed_orphans: HashSet<String>,
}

impl ConsistencyValidator {
    pub fn new(allowed_orphans: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed_orphans: allowed_orphans.into_iter().collect(),
        }
    }

    /// Validate the site against its manifest
    ///
    /// A missing manifest limits the run to the file mapping. A manifest
    /// that exists but cannot be read is an error.
    pub fn run(&self, site: &Site) -> Result<ValidationReport> {
        let discovered = content::discover(site)?;

        let live = if site.manifest_path.exists() {
            let manifest = RouteManifest::load(&site.manifest_path)?;
            Some(manifest.into_table(&site.base_dir))
        } else {
            tracing::warn!(
                "No route manifest at {:?}; checking file mapping only",
                site.manifest_path
            );
            None
        };

        Ok(self.check(&discovered, live.as_ref()))
    }

    /// Compare a discovered file mapping with an optional live table
    pub fn check(
        &self,
        discovered: &[(ContentFile, Option<String>)],
        live: Option<&RouteTable>,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut claims: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (file, slug) in discovered {
            match slug {
                Some(slug) => {
                    report
                        .expected_routes
                        .insert(file.relative_path.clone(), slug.clone());
                    claims
                        .entry(slug.clone())
                        .or_default()
                        .push(file.relative_path.clone());
                }
                None => report.unroutable.push(file.relative_path.clone()),
            }
        }

        report.duplicates = claims
            .iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(slug, files)| (slug.clone(), files.clone()))
            .collect();

        if let Some(live) = live {
            report.live_checked = true;

            report.missing_routes = claims
                .keys()
                .filter(|slug| !live.contains(slug))
                .cloned()
                .collect();

            let expected: BTreeSet<&str> = claims.keys().map(String::as_str).collect();
            report.orphaned_routes = live
                .slugs()
                .filter(|slug| !expected.contains(slug) && !self.allowed_orphans.contains(*slug))
                .map(str::to_string)
                .collect();

            for slug in &report.orphaned_routes {
                tracing::warn!("Orphaned route {} has no backing file", slug);
            }
        }

        report
    }
}
