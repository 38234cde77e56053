//! Site initialization.
//!
//! - [`validate`]: refuse to scaffold over existing work
//! - [`structure`]: directories and starter pages
//! - [`config`]: `inkpot.toml` and `.gitignore`

mod config;
mod structure;
mod validate;

use crate::{config::SiteConfig, log};
use anyhow::Result;
use std::path::Path;

pub use validate::InitMode;

/// Create a new site at `root`.
///
/// With a name the directory must not exist yet; without one, `root` is
/// the current directory and must be empty.
pub fn new_site(root: &Path, has_name: bool) -> Result<()> {
    validate::validate_target(root, InitMode::from_has_name(has_name))?;

    structure::create_structure(root)?;
    config::write_config(root)?;
    config::write_ignore_files(root, &SiteConfig::default().dirs.output)?;

    log!("init"; "site initialized at {}", root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build::build_site;
    use crate::config::CONFIG_FILE;
    use std::fs;

    #[test]
    fn test_new_site_builds() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("blog");
        new_site(&root, true).unwrap();

        let content = fs::read_to_string(root.join(CONFIG_FILE)).unwrap();
        let mut config = SiteConfig::from_str(&content).unwrap();
        config.normalize_paths(&root);
        config.validate().unwrap();

        let report = build_site(&config).unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(report.copied, 1);

        let post = fs::read_to_string(root.join("_site/posts/hello/index.html")).unwrap();
        assert!(post.contains("Published January 1, 2024."), "{post}");
        assert!(post.contains("<aside class=\"note info\">\n  <span class=\"note-title\">Note:</span>"), "{post}");
        assert!(post.contains("href=\"https://example.com/feed.xml\""), "{post}");
        assert!(root.join("_site/feed.xml").is_file());
    }

    #[test]
    fn test_new_site_refuses_existing_dir() {
        let temp = tempfile::tempdir().unwrap();
        assert!(new_site(temp.path(), true).is_err());
    }

    #[test]
    fn test_init_in_nonempty_current_dir_fails() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("README.md"), "hi").unwrap();
        assert!(new_site(temp.path(), false).is_err());
    }
}
