//! Pre-initialization validation.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Initialization mode determines validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// `inkpot init` - initialize in current directory (must be empty)
    CurrentDir,
    /// `inkpot init <name>` - create new subdirectory (must not exist)
    NewDir,
}

impl InitMode {
    pub const fn from_has_name(has_name: bool) -> Self {
        if has_name { Self::NewDir } else { Self::CurrentDir }
    }
}

/// Refuse to scaffold over existing work.
pub fn validate_target(root: &Path, mode: InitMode) -> Result<()> {
    match mode {
        InitMode::CurrentDir => {
            if !is_empty(root)? {
                bail!(
                    "current directory is not empty, \
                     use `inkpot init <name>` to create the site in a new subdirectory"
                );
            }
        }
        InitMode::NewDir => {
            if root.exists() {
                bail!("directory '{}' already exists", root.display());
            }
        }
    }
    Ok(())
}

fn is_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("failed to read directory '{}'", path.display()))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_current_dir_must_be_empty() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_ok());

        fs::write(temp.path().join("notes.txt"), "content").unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_err());
    }

    #[test]
    fn test_new_dir_must_not_exist() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::NewDir).is_err());
        assert!(validate_target(&temp.path().join("blog"), InitMode::NewDir).is_ok());
    }

    #[test]
    fn test_mode_from_name() {
        assert_eq!(InitMode::from_has_name(true), InitMode::NewDir);
        assert_eq!(InitMode::from_has_name(false), InitMode::CurrentDir);
    }
}
