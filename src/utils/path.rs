//! Path utilities.

use jwalk::WalkDir;
use std::path::{Path, PathBuf};

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
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

/// Collect all files from a directory recursively, sorted for stable output.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

/// Forward-slash form of a relative path, used in URLs and log lines.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/definitely/not/here");
        assert_eq!(normalize_path(path), PathBuf::from("/definitely/not/here"));
    }

    #[test]
    fn test_collect_all_files_skips_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("a/b/one.txt"), "1").unwrap();
        std::fs::write(dir.path().join("two.txt"), "2").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), "").unwrap();

        let files = collect_all_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| !f.ends_with(".DS_Store")));
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("posts/hello.md")), "posts/hello.md");
    }
}
