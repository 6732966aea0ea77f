//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Decoded URL path without query string or fragment, always starting with `/`.
pub fn route_path(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let trimmed = decoded.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Resolve a route path to a file under `root`.
///
/// Directories resolve to their `index.html`. Paths escaping `root` (via
/// `..` or symlinks) resolve to nothing.
pub fn resolve_path(route: &str, root: &Path) -> Option<PathBuf> {
    let clean = route.trim_matches('/');
    if clean.split('/').any(|part| part == "..") {
        return None;
    }

    let canonical = root.join(clean).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_route_path() {
        assert_eq!(route_path("/"), "/");
        assert_eq!(route_path(""), "/");
        assert_eq!(route_path("/preview?v=3"), "/preview");
        assert_eq!(route_path("/img/cat%20one.png"), "/img/cat one.png");
        assert_eq!(route_path("/docs/"), "/docs");
        assert_eq!(route_path("/a#top"), "/a");
    }

    #[test]
    fn test_resolve_file_and_directory_index() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs/index.html"), "<p>docs</p>").unwrap();
        fs::write(temp.path().join("cat.png"), b"png").unwrap();

        let file = resolve_path("/cat.png", temp.path()).unwrap();
        assert!(file.ends_with("cat.png"));

        let index = resolve_path("/docs", temp.path()).unwrap();
        assert!(index.ends_with("docs/index.html"));

        assert!(resolve_path("/missing.css", temp.path()).is_none());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("site");
        fs::create_dir(&root).unwrap();
        fs::write(temp.path().join("secret.txt"), "x").unwrap();

        assert!(resolve_path("/../secret.txt", &root).is_none());
    }
}
