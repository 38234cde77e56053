//! Page route - source to output path mapping.

use std::path::{Component, Path, PathBuf};

use crate::utils::path::to_slash;

/// Where a page is written and the URL it is served at.
///
/// ```text
/// index.md             -> index.html                /
/// about.md             -> about/index.html          /about/
/// blog/index.html      -> blog/index.html           /blog/
/// blog/hello.md        -> blog/hello/index.html     /blog/hello/
/// permalink: /feed.xml -> feed.xml                  /feed.xml
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    /// URL path, always starting with `/`.
    pub url: String,
    /// Output file relative to the output directory.
    pub output_file: PathBuf,
}

impl PageRoute {
    /// Default route for a source file relative to the input directory.
    pub fn from_source(source: &Path) -> Self {
        let stem_path = source.with_extension("");
        let is_index = stem_path.file_name().is_some_and(|n| n == "index");
        let dir = if is_index {
            stem_path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            stem_path
        };

        let dir_url = to_slash(&dir);
        let url = if dir_url.is_empty() {
            "/".to_string()
        } else {
            format!("/{dir_url}/")
        };

        Self {
            url,
            output_file: dir.join("index.html"),
        }
    }

    /// Route from a `permalink:` value.
    ///
    /// A trailing slash or a last segment without an extension writes
    /// `index.html` inside that directory. Returns `None` for paths that
    /// would leave the output directory.
    pub fn from_permalink(permalink: &str) -> Option<Self> {
        let trimmed = permalink.trim().trim_start_matches('/');
        let path = Path::new(trimmed);
        if path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }

        let is_file = !trimmed.ends_with('/') && path.extension().is_some();
        if is_file {
            return Some(Self {
                url: format!("/{}", to_slash(path)),
                output_file: path.to_path_buf(),
            });
        }

        let dir_url = to_slash(path);
        Some(Self {
            url: if dir_url.is_empty() {
                "/".to_string()
            } else {
                format!("/{dir_url}/")
            },
            output_file: path.join("index.html"),
        })
    }
}
