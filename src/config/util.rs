//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/posts/          ← cwd
/// /home/user/site/inkpot.toml     ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Same as [`find_config_file`], starting from `start`.
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Check a configured path for unsafe components (`..` or absolute).
pub fn unsafe_path_reason(path: &Path) -> Option<&'static str> {
    use std::path::Component;

    path.components().find_map(|comp| match comp {
        Component::ParentDir => Some("parent directory '..' not allowed"),
        Component::Prefix(_) | Component::RootDir => Some("absolute paths not allowed"),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("inkpot.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("inkpot.toml")).unwrap();
        assert_eq!(found, dir.path().join("inkpot.toml"));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file_from(dir.path(), Path::new("no-such-config.toml")).is_none());
    }

    #[test]
    fn test_unsafe_path_reason() {
        assert!(unsafe_path_reason(Path::new("assets")).is_none());
        assert!(unsafe_path_reason(Path::new("static/img")).is_none());
        assert!(unsafe_path_reason(Path::new("../outside")).is_some());
        assert!(unsafe_path_reason(Path::new("/etc")).is_some());
    }
}
