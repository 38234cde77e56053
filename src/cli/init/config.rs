//! `inkpot.toml` and ignore file generation.

use anyhow::Result;
use std::path::Path;

use super::structure::write_if_missing;
use crate::config::CONFIG_FILE;

/// Files to write ignore patterns to.
const IGNORE_FILES: &[&str] = &[".gitignore"];

/// Commented `inkpot.toml` for a new site. Every value shown is the default.
pub fn generate_config_template() -> String {
    format!(
        r#"# inkpot configuration file (v{version})

[site]
title = "My Site"
description = ""
url = "https://example.com"
language = "en"
author = ""

[dirs]
input = "."
output = "_site"
includes = "_includes"
layouts = "_includes"

[front_matter]
excerpt = true
excerpt_separator = "<!-- excerpt -->"

[markdown]
html = true
breaks = true
linkify = true

[markdown.anchor]
level = [1, 2, 3]
permalink = false

# Copied verbatim. Use {{ dir = "static/img", as = "img" }} to rename.
[passthrough]
copy = ["assets"]

[plugins.feed]
enable = true
path = "feed.xml"
collection = "posts"
limit = 20

[plugins.highlight]
enable = true
theme = "InspiredGitHub"
"#,
        version = env!("CARGO_PKG_VERSION")
    )
}

pub fn write_config(root: &Path) -> Result<()> {
    write_if_missing(&root.join(CONFIG_FILE), &generate_config_template())
}

/// Ignore the output directory; user ignore files are never overwritten.
pub fn write_ignore_files(root: &Path, output_dir: &Path) -> Result<()> {
    let pattern = Path::new("/").join(output_dir);
    let content = format!("{}\n.DS_Store\n", pattern.to_string_lossy());
    for filename in IGNORE_FILES {
        write_if_missing(&root.join(filename), &content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_to_valid_config() {
        let config = SiteConfig::from_str(&generate_config_template()).unwrap();
        assert_eq!(config.site.title, "My Site");
        assert_eq!(config.dirs, SiteConfig::default().dirs);
        assert_eq!(config.markdown, SiteConfig::default().markdown);
        assert_eq!(config.plugins, SiteConfig::default().plugins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_write_ignore_files() {
        let temp = TempDir::new().unwrap();
        write_ignore_files(temp.path(), Path::new("_site")).unwrap();

        let content = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(content.starts_with("/_site\n"));
    }

    #[test]
    fn test_ignore_files_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let gitignore = temp.path().join(".gitignore");
        fs::write(&gitignore, "custom content").unwrap();

        write_ignore_files(temp.path(), Path::new("_site")).unwrap();
        assert_eq!(fs::read_to_string(&gitignore).unwrap(), "custom content");
    }
}
