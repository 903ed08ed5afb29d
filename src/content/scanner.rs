//! Content scanner - enumerates page files under the content roots

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ContentFile;
use crate::Site;

/// Recursively discovers content files under one or more roots
#[derive(Debug, Clone)]
pub struct PathScanner {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl PathScanner {
    /// Create a scanner for the given roots and extensions (without dots)
    pub fn new(roots: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        Self { roots, extensions }
    }

    /// Create a scanner for the site's configured roots
    pub fn for_site(site: &Site) -> Self {
        Self::new(site.content_roots(), site.config.extensions.clone())
    }

    /// Scan all roots, sorted by relative path
    ///
    /// Missing roots contribute nothing. A root that resolves to the same
    /// directory as an earlier one (a case alias on a case-insensitive
    /// filesystem, a symlink) is scanned once. Distinct trees are always
    /// scanned in full, so colliding files in them both surface.
    pub fn scan(&self) -> Vec<ContentFile> {
        let mut files = Vec::new();
        let mut scanned: HashSet<PathBuf> = HashSet::new();

        for root in &self.roots {
            if !root.is_dir() {
                tracing::debug!("Content root {:?} does not exist, skipping", root);
                continue;
            }

            let canonical = root.canonicalize().unwrap_or_else(|_| root.clone());
            if !scanned.insert(canonical) {
                tracing::debug!("Content root {:?} already scanned through an alias", root);
                continue;
            }

            for entry in WalkDir::new(root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| match e {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        tracing::debug!("Skipping unreadable entry: {}", err);
                        None
                    }
                })
            {
                let path = entry.path();
                if !entry.file_type().is_file() || !self.is_content_file(path) {
                    continue;
                }

                if let Some(file) = ContentFile::from_root(root, path) {
                    files.push(file);
                }
            }
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        files
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|ext| ext.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export default {}").unwrap();
    }

    fn relative_paths(files: &[ContentFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn test_scan_recurses_and_filters_extension() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("SEO");
        touch(&root, "index.tsx");
        touch(&root, "glossary/terms/fifo.tsx");
        touch(&root, "features/readme.md");

        let scanner = PathScanner::new(vec![root], vec!["tsx".to_string()]);
        let files = scanner.scan();

        assert_eq!(
            relative_paths(&files),
            vec!["glossary/terms/fifo.tsx", "index.tsx"]
        );
        assert!(files.iter().all(|f| f.extension == "tsx"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let scanner = PathScanner::new(vec![dir.path().join("nope")], vec!["tsx".to_string()]);
        assert!(scanner.scan().is_empty());
    }

    #[test]
    fn test_extension_match_ignores_case() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("SEO");
        touch(&root, "features/Foo.TSX");

        let scanner = PathScanner::new(vec![root], vec!["tsx".to_string()]);
        assert_eq!(relative_paths(&scanner.scan()), vec!["features/Foo.TSX"]);
    }

    #[test]
    fn test_same_directory_is_scanned_once() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("SEO");
        touch(&root, "features/x.tsx");

        let scanner = PathScanner::new(
            vec![root.clone(), root.join("..").join("SEO")],
            vec!["tsx".to_string()],
        );
        assert_eq!(relative_paths(&scanner.scan()), vec!["features/x.tsx"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_is_scanned_once() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("SEO");
        touch(&root, "features/x.tsx");
        let link = dir.path().join("pages");
        std::os::unix::fs::symlink(&root, &link).unwrap();

        let scanner = PathScanner::new(vec![root, link], vec!["tsx".to_string()]);
        assert_eq!(scanner.scan().len(), 1);
    }

    #[test]
    fn test_case_distinct_trees_keep_both_files() {
        let dir = TempDir::new().unwrap();
        let upper = dir.path().join("SEO");
        touch(&upper, "features/x.tsx");

        let lower = dir.path().join("seo");
        if lower.exists() {
            // case-insensitive filesystem: one tree, one file
            let scanner = PathScanner::new(vec![upper, lower], vec!["tsx".to_string()]);
            assert_eq!(scanner.scan().len(), 1);
            return;
        }
        touch(&lower, "features/x.tsx");

        let scanner = PathScanner::new(vec![upper, lower], vec!["tsx".to_string()]);
        let files = scanner.scan();
        assert_eq!(
            relative_paths(&files),
            vec!["features/x.tsx", "features/x.tsx"]
        );
    }

    #[test]
    fn test_unrelated_roots_keep_both_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        touch(&a, "features/x.tsx");
        touch(&b, "features/x.tsx");

        let scanner = PathScanner::new(vec![a, b], vec!["tsx".to_string()]);
        assert_eq!(scanner.scan().len(), 2);
    }
}
