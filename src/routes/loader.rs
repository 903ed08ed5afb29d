//! Deferred page-module loading
//!
//! Nothing is read until a route is first visited. Each slug owns one
//! `OnceCell`, so concurrent first visits await the same in-flight load.
//! A failed load leaves the cell empty and the next visit retries.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

use super::RouteEntry;

/// A loaded page module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModule {
    pub slug: String,
    pub module: PathBuf,
    pub source: String,
}

/// Fetches the module behind a route
pub trait PageLoader: Send + Sync {
    fn load(&self, entry: &RouteEntry) -> impl Future<Output = Result<PageModule>> + Send;
}

/// Reads page modules from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl PageLoader for FsLoader {
    async fn load(&self, entry: &RouteEntry) -> Result<PageModule> {
        let source = tokio::fs::read_to_string(&entry.module)
            .await
            .with_context(|| format!("Failed to load page module {:?}", entry.module))?;

        tracing::debug!("Loaded module for {}", entry.slug);

        Ok(PageModule {
            slug: entry.slug.clone(),
            module: entry.module.clone(),
            source,
        })
    }
}

type Slot = Arc<OnceCell<Arc<PageModule>>>;

/// Memoizes page modules by slug
#[derive(Debug, Default)]
pub struct ModuleCache<L> {
    loader: L,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<L: PageLoader> ModuleCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Load the module for `entry`, sharing any load already in flight
    pub async fn load(&self, entry: &RouteEntry) -> Result<Arc<PageModule>> {
        let slot = self.slot(&entry.slug);
        let module = slot
            .get_or_try_init(|| async { self.loader.load(entry).await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(module))
    }

    /// Whether the module for `slug` has finished loading
    pub fn is_loaded(&self, slug: &str) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slug)
            .is_some_and(|slot| slot.initialized())
    }

    fn slot(&self, slug: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(slug.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingLoader {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl PageLoader for CountingLoader {
        async fn load(&self, entry: &RouteEntry) -> Result<PageModule> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.fail_first && call == 0 {
                anyhow::bail!("transient failure");
            }
            Ok(PageModule {
                slug: entry.slug.clone(),
                module: entry.module.clone(),
                source: format!("module {}", entry.slug),
            })
        }
    }

    fn entry(slug: &str) -> RouteEntry {
        RouteEntry {
            slug: slug.to_string(),
            file: format!("{}.tsx", slug.trim_start_matches('/')),
            module: PathBuf::from(format!("/pages{}.tsx", slug)),
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_visits_share_one_load() {
        let cache = ModuleCache::new(CountingLoader::default());
        let e = entry("/scanning");

        let (a, b) = tokio::join!(cache.load(&e), cache.load(&e));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.loader.calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_loaded("/scanning"));

        // later visits hit the cache
        cache.load(&e).await.unwrap();
        assert_eq!(cache.loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_slugs_load_separately() {
        let cache = ModuleCache::new(CountingLoader::default());
        let (ea, eb) = (entry("/a"), entry("/b"));
        let (a, b) = tokio::join!(cache.load(&ea), cache.load(&eb));

        assert_eq!(a.unwrap().source, "module /a");
        assert_eq!(b.unwrap().source, "module /b");
        assert_eq!(cache.loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let cache = ModuleCache::new(CountingLoader {
            fail_first: true,
            ..Default::default()
        });
        let e = entry("/flaky");

        assert!(cache.load(&e).await.is_err());
        assert!(!cache.is_loaded("/flaky"));
        assert!(cache.load(&e).await.is_ok());
        assert_eq!(cache.loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fs_loader_reads_module() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("about.tsx");
        std::fs::write(&path, "export default About;").unwrap();

        let cache = ModuleCache::new(FsLoader);
        let e = RouteEntry {
            slug: "/about".to_string(),
            file: "about.tsx".to_string(),
            module: path,
        };
        assert_eq!(cache.load(&e).await.unwrap().source, "export default About;");
    }
}
