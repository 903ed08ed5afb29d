//! Runtime route table
//!
//! The table is computed once per process. [`live_routes`] checks for an
//! existing table and only builds one when none is present; nothing is
//! persisted between runs, so new content (or a regenerated manifest) is
//! picked up on restart.

mod loader;
pub mod manifest;
mod table;

pub use loader::{FsLoader, ModuleCache, PageLoader, PageModule};
pub use manifest::{ManifestRoute, RouteManifest};
pub use table::{RouteEntry, RouteTable};

use anyhow::Result;
use std::sync::{Arc, OnceLock};

use crate::content;
use crate::Site;

/// Route table plus its lazily populated module cache
#[derive(Debug)]
pub struct LiveRoutes {
    pub table: RouteTable,
    pub modules: ModuleCache<FsLoader>,
}

impl LiveRoutes {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            modules: ModuleCache::new(FsLoader),
        }
    }

    /// Load the page module behind `slug`, `None` if the slug is not routed
    pub async fn load(&self, slug: &str) -> Result<Option<Arc<PageModule>>> {
        match self.table.get(slug) {
            Some(entry) => self.modules.load(entry).await.map(Some),
            None => Ok(None),
        }
    }
}

static LIVE_ROUTES: OnceLock<LiveRoutes> = OnceLock::new();

/// Process-wide route table, built on first access
///
/// Later calls return the same table even if `site` differs.
pub fn live_routes(site: &Site) -> Result<&'static LiveRoutes> {
    if let Some(routes) = LIVE_ROUTES.get() {
        return Ok(routes);
    }

    let table = load_route_table(site)?;
    tracing::info!("Route table ready with {} routes", table.len());
    Ok(LIVE_ROUTES.get_or_init(|| LiveRoutes::new(table)))
}

/// Scan the content roots and build a fresh route table
pub fn build_route_table(site: &Site) -> Result<RouteTable> {
    Ok(RouteTable::build(content::discover(site)?))
}

/// Route table from the manifest when present, otherwise from a scan
pub fn load_route_table(site: &Site) -> Result<RouteTable> {
    if site.manifest_path.exists() {
        let manifest = RouteManifest::load(&site.manifest_path)?;
        tracing::debug!("Using route manifest {:?}", site.manifest_path);
        return Ok(manifest.into_table(&site.base_dir));
    }

    tracing::debug!("No route manifest, scanning content roots");
    build_route_table(site)
}
