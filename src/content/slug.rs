//! Slug resolution - maps a content file's relative path to its canonical URL path
//!
//! Rule precedence, in order:
//!
//! 1. strip the content extension and split into segments
//! 2. drop a trailing `index` segment (any case)
//! 3. excluded helper files never route
//! 4. dispatch on the namespace (first segment):
//!    - `glossary`: `/glossary` for the hub, `/<term>` for legacy-listed
//!      terms, otherwise the full path
//!    - `solutions`: always the full path
//!    - anything else: `/` + the last segment
//!
//! The last rule can map files from different namespaces to the same slug
//! (`features/x` and `uses/x` both become `/x`). That is reported by the
//! validator, not resolved here; changing it would move public URLs.

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;

use crate::config::SiteConfig;

const GLOSSARY: &str = "glossary";
const SOLUTIONS: &str = "solutions";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Derives canonical slugs from relative content paths
#[derive(Debug, Clone)]
pub struct SlugResolver {
    extensions: Vec<String>,
    legacy_terms: HashSet<String>,
    exclude: Vec<Pattern>,
}

impl SlugResolver {
    /// Build a resolver from explicit rules
    pub fn new(
        extensions: Vec<String>,
        legacy_terms: impl IntoIterator<Item = String>,
        exclude: &[String],
    ) -> Result<Self> {
        let exclude = exclude
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern {:?}", p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extensions,
            legacy_terms: legacy_terms.into_iter().collect(),
            exclude,
        })
    }

    /// Build a resolver from site configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(
            config.extensions.clone(),
            config.slugs.legacy_glossary_terms.iter().cloned(),
            &config.slugs.exclude,
        )
    }

    /// Resolve a relative path to its slug
    ///
    /// Returns `None` for files that are not routable: bare root `index`
    /// files, excluded helpers, and files without a content extension.
    pub fn resolve(&self, relative_path: &str) -> Option<String> {
        let normalized = relative_path.replace('\\', "/");
        let stem = self.strip_extension(&normalized)?;

        let mut segments: Vec<&str> = stem.split('/').filter(|s| !s.is_empty()).collect();

        if segments
            .last()
            .is_some_and(|last| last.eq_ignore_ascii_case("index"))
        {
            segments.pop();
        }
        if segments.is_empty() {
            return None;
        }

        if self.is_excluded(&normalized) {
            return None;
        }

        let slug = match segments[0] {
            GLOSSARY => match segments.as_slice() {
                [_] => format!("/{}", GLOSSARY),
                [_, term] if self.legacy_terms.contains(*term) => format!("/{}", term),
                _ => format!("/{}", segments.join("/")),
            },
            SOLUTIONS => format!("/{}", segments.join("/")),
            _ => format!("/{}", segments[segments.len() - 1]),
        };

        Some(slug)
    }

    fn strip_extension<'p>(&self, path: &'p str) -> Option<&'p str> {
        let (stem, ext) = path.rsplit_once('.')?;
        // a dot inside a directory name is not an extension
        if ext.contains('/') {
            return None;
        }
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
            .then_some(stem)
    }

    fn is_excluded(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        self.exclude.iter().any(|pattern| {
            pattern.matches_with(path, MATCH_OPTIONS)
                || pattern.matches_with(file_name, MATCH_OPTIONS)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SlugResolver {
        SlugResolver::new(
            vec!["tsx".to_string()],
            ["asset-tracking".to_string()],
            &[
                "**/components/**".to_string(),
                "**/*Layout.tsx".to_string(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_root_index_is_excluded() {
        let r = resolver();
        assert_eq!(r.resolve("index.tsx"), None);
        assert_eq!(r.resolve("Index.tsx"), None);
    }

    #[test]
    fn test_glossary_rules() {
        let r = resolver();
        assert_eq!(r.resolve("glossary/index.tsx").as_deref(), Some("/glossary"));
        assert_eq!(
            r.resolve("glossary/asset-tracking.tsx").as_deref(),
            Some("/asset-tracking")
        );
        assert_eq!(
            r.resolve("glossary/fifo.tsx").as_deref(),
            Some("/glossary/fifo")
        );
        assert_eq!(
            r.resolve("glossary/category/foo.tsx").as_deref(),
            Some("/glossary/category/foo")
        );
        // legacy terms only flatten directly under the hub
        assert_eq!(
            r.resolve("glossary/terms/asset-tracking.tsx").as_deref(),
            Some("/glossary/terms/asset-tracking")
        );
    }

    #[test]
    fn test_solutions_keep_full_path() {
        let r = resolver();
        assert_eq!(r.resolve("solutions/a/b.tsx").as_deref(), Some("/solutions/a/b"));
        assert_eq!(
            r.resolve("solutions/a/b/c/d.tsx").as_deref(),
            Some("/solutions/a/b/c/d")
        );
        assert_eq!(r.resolve("solutions/index.tsx").as_deref(), Some("/solutions"));
    }

    #[test]
    fn test_default_namespace_collapses_to_last_segment() {
        let r = resolver();
        assert_eq!(r.resolve("features/x/y/z.tsx").as_deref(), Some("/z"));
        assert_eq!(r.resolve("about.tsx").as_deref(), Some("/about"));
        assert_eq!(r.resolve("industries/retail/index.tsx").as_deref(), Some("/retail"));
        // accepted collision between namespaces
        assert_eq!(r.resolve("features/x.tsx"), r.resolve("uses/x.tsx"));
    }

    #[test]
    fn test_exclusions_apply_everywhere() {
        let r = resolver();
        assert_eq!(r.resolve("features/components/Hero.tsx"), None);
        assert_eq!(r.resolve("solutions/components/Card.tsx"), None);
        assert_eq!(r.resolve("SeoPageLayout.tsx"), None);
        assert_eq!(r.resolve("glossary/GlossaryLayout.tsx"), None);
    }

    #[test]
    fn test_foreign_extension_is_not_routable() {
        let r = resolver();
        assert_eq!(r.resolve("features/readme.md"), None);
        assert_eq!(r.resolve("features.d/readme"), None);
    }

    #[test]
    fn test_slug_shape_and_determinism() {
        let r = resolver();
        let inputs = [
            "glossary/index.tsx",
            "glossary/terms/fifo.tsx",
            "solutions/inventory/management.tsx",
            "features//barcode/scanning.tsx",
            "dutch\\voorraadbeheer.tsx",
        ];
        for input in inputs {
            let slug = r.resolve(input).unwrap();
            assert!(slug.starts_with('/'), "{slug}");
            assert!(!slug.ends_with('/'), "{slug}");
            assert!(!slug.ends_with(".tsx"), "{slug}");
            assert_eq!(r.resolve(input).unwrap(), slug);
        }
    }
}
