//! robots.txt generation

use crate::config::SiteConfig;

/// Render robots directives: disallowed prefixes plus the sitemap pointer
pub fn robots_txt(config: &SiteConfig) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");

    for prefix in &config.sitemap.disallow {
        out.push_str("Disallow: ");
        out.push_str(prefix);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!("Sitemap: {}/sitemap.xml\n", config.origin()));
    out
}
