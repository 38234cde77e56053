//! `[site]` section: metadata shared by templates and the feed.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteInfoConfig {
    pub title: String,
    pub description: String,
    /// Public base URL, e.g. `https://example.com`. Required by the feed.
    pub url: Option<String>,
    pub language: String,
    pub author: String,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            url: None,
            language: "en".into(),
            author: String::new(),
        }
    }
}

impl SiteInfoConfig {
    pub const URL: FieldPath = FieldPath::new("site.url");

    pub fn validate(&self, feed_enabled: bool, diag: &mut ConfigDiagnostics) {
        match &self.url {
            Some(url) => {
                if let Err(err) = url::Url::parse(url) {
                    diag.error(Self::URL, format!("invalid url '{url}': {err}"));
                }
            }
            None if feed_enabled => diag.error_with_hint(
                Self::URL,
                "the feed needs an absolute site url",
                "set `site.url` or disable `plugins.feed.enable`",
            ),
            None => {}
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }
}
