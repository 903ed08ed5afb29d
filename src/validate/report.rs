//! Validation report types and formatting

use std::collections::BTreeMap;
use std::fmt;

/// Outcome of a consistency check
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Routable file -> slug recomputed from disk
    pub expected_routes: BTreeMap<String, String>,
    /// Files that do not route (bare root index, excluded helpers)
    pub unroutable: Vec<String>,
    /// Slug -> every file claiming it, only for slugs with more than one file
    pub duplicates: BTreeMap<String, Vec<String>>,
    /// Expected slugs absent from the live table
    pub missing_routes: Vec<String>,
    /// Live slugs with no backing file and not allow-listed
    pub orphaned_routes: Vec<String>,
    /// Whether a live table was available to compare against
    pub live_checked: bool,
}

impl ValidationReport {
    /// Duplicates and missing routes fail the check; orphans only warn
    pub fn has_failures(&self) -> bool {
        !self.duplicates.is_empty() || !self.missing_routes.is_empty()
    }

    /// Print the full report to stdout
    pub fn print(&self) {
        println!(
            "Routes ({} files, {} unroutable):",
            self.expected_routes.len(),
            self.unroutable.len()
        );

        if !self.duplicates.is_empty() {
            println!("\nDuplicate slugs ({}):", self.duplicates.len());
            for (slug, files) in &self.duplicates {
                println!("  {}", slug);
                for file in files {
                    println!("    <- {}", file);
                }
            }
        }

        if !self.missing_routes.is_empty() {
            println!("\nMissing from route table ({}):", self.missing_routes.len());
            for slug in &self.missing_routes {
                println!("  {}", slug);
            }
        }

        if !self.orphaned_routes.is_empty() {
            println!("\nOrphaned routes ({}):", self.orphaned_routes.len());
            for slug in &self.orphaned_routes {
                println!("  {}", slug);
            }
        }

        println!("\n{}", self);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_failures() {
            write!(f, "all checks passed")?;
        } else {
            write!(
                f,
                "found {} duplicate slug(s) and {} missing route(s)",
                self.duplicates.len(),
                self.missing_routes.len()
            )?;
        }

        if !self.orphaned_routes.is_empty() {
            write!(f, ", {} orphaned route(s)", self.orphaned_routes.len())?;
        }
        if !self.live_checked {
            write!(f, " (file mapping only)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphans_do_not_fail() {
        let report = ValidationReport {
            orphaned_routes: vec!["/old".to_string()],
            live_checked: true,
            ..Default::default()
        };
        assert!(!report.has_failures());
        assert_eq!(report.to_string(), "all checks passed, 1 orphaned route(s)");
    }

    #[test]
    fn test_duplicates_fail() {
        let mut report = ValidationReport::default();
        report.duplicates.insert(
            "/x".to_string(),
            vec!["features/x.tsx".to_string(), "uses/x.tsx".to_string()],
        );
        assert!(report.has_failures());
        assert_eq!(
            report.to_string(),
            "found 1 duplicate slug(s) and 0 missing route(s) (file mapping only)"
        );
    }
}
