//! `[plugins.*]` sections.
//!
//! ```toml
//! [plugins.feed]
//! enable = true
//! path = "feed.xml"
//! collection = "posts"
//! limit = 20
//!
//! [plugins.highlight]
//! enable = true
//! theme = "InspiredGitHub"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::util::unsafe_path_reason;
use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PluginsConfig {
    pub feed: FeedConfig,
    pub highlight: HighlightConfig,
}

impl PluginsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        self.feed.validate(diag);
    }
}

/// RSS feed plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    /// Output path relative to the output directory.
    pub path: PathBuf,
    /// Tag whose pages make up the feed.
    pub collection: String,
    /// Maximum number of items, newest first.
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "feed.xml".into(),
            collection: "posts".into(),
            limit: 20,
        }
    }
}

impl FeedConfig {
    pub const PATH: FieldPath = FieldPath::new("plugins.feed.path");
    pub const LIMIT: FieldPath = FieldPath::new("plugins.feed.limit");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if let Some(reason) = unsafe_path_reason(&self.path) {
            diag.error(Self::PATH, format!("path '{}': {reason}", self.path.display()));
        }
        if self.limit == 0 {
            diag.error(Self::LIMIT, "limit must be at least 1");
        }
    }
}

/// Build-time syntax highlighting plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// Name of a bundled syntect theme.
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "InspiredGitHub".into(),
        }
    }
}

impl HighlightConfig {
    pub const THEME: FieldPath = FieldPath::new("plugins.highlight.theme");
}
