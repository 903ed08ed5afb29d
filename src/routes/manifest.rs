//! Route manifest - the build-time route table, read at startup so that
//! production never scans the content tree

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{RouteEntry, RouteTable};
use crate::content::to_posix;
use crate::RouteError;

/// Current manifest format version
const VERSION: u32 = 1;

/// Serialized route table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteManifest {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub routes: Vec<ManifestRoute>,
}

/// One manifest line; `module` is relative to the site base directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRoute {
    pub slug: String,
    pub file: String,
    pub module: String,
}

impl RouteManifest {
    /// Snapshot a route table
    pub fn from_table(table: &RouteTable, base_dir: &Path) -> Self {
        let routes = table
            .entries()
            .iter()
            .map(|e| ManifestRoute {
                slug: e.slug.clone(),
                file: e.file.clone(),
                module: e
                    .module
                    .strip_prefix(base_dir)
                    .map(to_posix)
                    .unwrap_or_else(|_| e.module.to_string_lossy().to_string()),
            })
            .collect();

        Self {
            version: VERSION,
            generated_at: Utc::now(),
            routes,
        }
    }

    /// Read a manifest from disk
    pub fn load(path: &Path) -> Result<Self, RouteError> {
        let content = fs::read_to_string(path)
            .map_err(|e| RouteError::Manifest(format!("{}: {}", path.display(), e)))?;
        let manifest: RouteManifest = serde_json::from_str(&content)
            .map_err(|e| RouteError::Manifest(format!("{}: {}", path.display(), e)))?;

        if manifest.version != VERSION {
            return Err(RouteError::Manifest(format!(
                "{}: unsupported version {}",
                path.display(),
                manifest.version
            )));
        }
        Ok(manifest)
    }

    /// Write the manifest as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;
        Ok(())
    }

    /// Rebuild the route table, resolving modules against `base_dir`
    pub fn into_table(self, base_dir: &Path) -> RouteTable {
        RouteTable::from_entries(self.routes.into_iter().map(|r| RouteEntry {
            module: base_dir.join(&r.module),
            slug: r.slug,
            file: r.file,
        }))
    }
}
