//! Route table builder

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::content::ContentFile;
use crate::RouteError;

/// One routable page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Canonical URL path
    pub slug: String,
    /// Source path relative to its content root
    pub file: String,
    /// Page module on disk, loaded on first visit
    pub module: PathBuf,
}

/// Deduplicated routes sorted ascending by slug
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Build the table from discovered files and their resolved slugs
    ///
    /// Unroutable files are skipped with a warning. When several files share
    /// a slug the first one encountered is kept; the others are dropped and
    /// logged so the collision stays visible.
    pub fn build(discovered: impl IntoIterator<Item = (ContentFile, Option<String>)>) -> Self {
        let entries = discovered.into_iter().filter_map(|(file, slug)| match slug {
            Some(slug) => Some(RouteEntry {
                slug,
                file: file.relative_path,
                module: file.absolute_path,
            }),
            None => {
                let err = RouteError::MissingSlug {
                    path: file.relative_path,
                };
                tracing::warn!("Skipping file: {}", err);
                None
            }
        });

        Self::from_entries(entries)
    }

    /// Build the table from ready-made entries (e.g. a manifest)
    pub fn from_entries(entries: impl IntoIterator<Item = RouteEntry>) -> Self {
        let mut kept: Vec<RouteEntry> = Vec::new();
        let mut claimed: HashMap<String, usize> = HashMap::new();
        let mut dropped: HashMap<String, Vec<String>> = HashMap::new();

        for entry in entries {
            if let Some(&first) = claimed.get(&entry.slug) {
                dropped
                    .entry(entry.slug.clone())
                    .or_insert_with(|| vec![kept[first].file.clone()])
                    .push(entry.file);
                continue;
            }
            claimed.insert(entry.slug.clone(), kept.len());
            kept.push(entry);
        }

        let mut ambiguous: Vec<_> = dropped.into_iter().collect();
        ambiguous.sort();
        for (slug, files) in ambiguous {
            let err = RouteError::ResolutionAmbiguity { slug, files };
            tracing::warn!("{}; keeping the first", err);
        }

        kept.sort_by(|a, b| a.slug.cmp(&b.slug));
        let index = kept
            .iter()
            .enumerate()
            .map(|(i, e)| (e.slug.clone(), i))
            .collect();

        Self {
            entries: kept,
            index,
        }
    }

    /// All entries, sorted by slug
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Look up a route by slug
    pub fn get(&self, slug: &str) -> Option<&RouteEntry> {
        self.index.get(slug).map(|&i| &self.entries[i])
    }

    /// Whether a slug is routed
    pub fn contains(&self, slug: &str) -> bool {
        self.index.contains_key(slug)
    }

    /// Slugs in ascending order
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
