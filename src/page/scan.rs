//! Content discovery.

use std::path::{Component, Path, PathBuf};

use crate::utils::path::collect_all_files;

/// Source formats that become pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    /// Template expansion, then Markdown.
    Markdown,
    /// Template expansion only.
    Html,
}

impl PageFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Collect page sources under `input`, sorted.
///
/// Files inside any of `excluded` are skipped, as is any path with a
/// component starting with `_` or `.` (relative to `input`).
pub fn scan_pages(input: &Path, excluded: &[&Path]) -> Vec<PathBuf> {
    collect_all_files(input)
        .into_iter()
        .filter(|path| PageFormat::from_path(path).is_some())
        .filter(|path| !excluded.iter().any(|dir| path.starts_with(dir)))
        .filter(|path| {
            let rel = path.strip_prefix(input).unwrap_or(path);
            !rel.components().any(|c| match c {
                Component::Normal(name) => name
                    .to_str()
                    .is_some_and(|n| n.starts_with('_') || n.starts_with('.')),
                _ => false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_page_format() {
        assert_eq!(PageFormat::from_path(Path::new("a.md")), Some(PageFormat::Markdown));
        assert_eq!(PageFormat::from_path(Path::new("a.html")), Some(PageFormat::Html));
        assert_eq!(PageFormat::from_path(Path::new("a.css")), None);
        assert_eq!(PageFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_scan_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for rel in [
            "index.md",
            "about.html",
            "blog/post.md",
            "style.css",
            "_includes/base.html",
            "_drafts/wip.md",
            ".hidden/x.md",
            "_site/index.html",
            "assets/demo.html",
        ] {
            touch(root, rel);
        }

        let output = root.join("_site");
        let assets = root.join("assets");
        let pages = scan_pages(root, &[&output, &assets]);
        let rel: Vec<_> = pages
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            rel,
            vec![
                PathBuf::from("about.html"),
                PathBuf::from("blog/post.md"),
                PathBuf::from("index.md"),
            ]
        );
    }
}
