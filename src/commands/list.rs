//! List route information

use anyhow::Result;

use crate::content;
use crate::routes::build_route_table;
use crate::Site;

/// List site routes by type
pub fn run(site: &Site, kind: &str) -> Result<()> {
    match kind {
        "route" | "routes" => {
            let table = build_route_table(site)?;
            println!("Routes ({}):", table.len());
            for entry in table.entries() {
                println!("  {} [{}]", entry.slug, entry.file);
            }
        }
        "file" | "files" => {
            let discovered = content::discover(site)?;
            println!("Files ({}):", discovered.len());
            for (file, slug) in discovered {
                println!(
                    "  {} -> {}",
                    file.relative_path,
                    slug.as_deref().unwrap_or("(unroutable)")
                );
            }
        }
        "unroutable" => {
            let unroutable: Vec<_> = content::discover(site)?
                .into_iter()
                .filter(|(_, slug)| slug.is_none())
                .collect();
            println!("Unroutable ({}):", unroutable.len());
            for (file, _) in unroutable {
                println!("  {}", file.relative_path);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: route, file, unroutable",
                kind
            );
        }
    }

    Ok(())
}
