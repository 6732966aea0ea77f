//! Path normalization.
//!
//! Watcher events carry canonical paths, so every path compared against them
//! (workspace root, config root) goes through [`normalize_path`] first.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// # Example
/// ```ignore
/// let root = normalize_path(Path::new("./lesson"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_existing_path() {
        let temp = TempDir::new().unwrap();
        let dotted = temp.path().join(".").join("index.html");
        std::fs::write(&dotted, "").unwrap();

        let normalized = normalize_path(&dotted);
        assert!(normalized.is_absolute());
        assert!(!normalized.to_string_lossy().contains("/./"));
        assert!(normalized.ends_with("index.html"));
    }

    #[test]
    fn test_normalize_missing_path() {
        assert_eq!(
            normalize_path(Path::new("/definitely/missing/dir")),
            PathBuf::from("/definitely/missing/dir")
        );
        assert!(normalize_path(Path::new("missing-relative")).is_absolute());
    }
}
