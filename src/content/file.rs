//! Discovered content file model

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A routable candidate found under a content root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFile {
    /// Full path on disk
    pub absolute_path: PathBuf,

    /// POSIX path relative to the declared content root
    pub relative_path: String,

    /// Extension without the dot
    pub extension: String,
}

impl ContentFile {
    /// Build a content file from a path found under `root`
    ///
    /// Returns `None` when `path` is not inside `root` or has no extension.
    pub fn from_root(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let extension = path.extension()?.to_str()?.to_string();

        Some(Self {
            absolute_path: path.to_path_buf(),
            relative_path: to_posix(relative),
            extension,
        })
    }
}

/// Join path components with `/` regardless of platform
pub fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_root() {
        let root = Path::new("/site/pages/SEO");
        let file = ContentFile::from_root(root, &root.join("glossary").join("fifo.tsx")).unwrap();
        assert_eq!(file.relative_path, "glossary/fifo.tsx");
        assert_eq!(file.extension, "tsx");
    }

    #[test]
    fn test_outside_root() {
        let root = Path::new("/site/pages/SEO");
        assert!(ContentFile::from_root(root, Path::new("/elsewhere/a.tsx")).is_none());
    }
}
