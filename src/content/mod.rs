//! Content module - discovers page files and derives their slugs

mod file;
pub mod scanner;
pub mod slug;

pub use file::{to_posix, ContentFile};
pub use scanner::PathScanner;
pub use slug::SlugResolver;

use anyhow::Result;

use crate::Site;

/// Every discovered file paired with its slug, `None` when unroutable
///
/// This is the single pipeline shared by the route table, the sitemap and
/// the validator, so all three agree on the mapping.
pub fn discover(site: &Site) -> Result<Vec<(ContentFile, Option<String>)>> {
    let resolver = SlugResolver::from_config(&site.config)?;
    let files = PathScanner::for_site(site).scan();

    Ok(files
        .into_iter()
        .map(|file| {
            let slug = resolver.resolve(&file.relative_path);
            (file, slug)
        })
        .collect())
}
