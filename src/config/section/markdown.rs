//! `[markdown]` section.
//!
//! ```toml
//! [markdown]
//! html = true       # raw HTML passes through
//! breaks = true     # soft line breaks render as <br />
//! linkify = true    # bare URLs become links
//!
//! [markdown.anchor]
//! level = [1, 2, 3] # or a number: minimum heading level
//! permalink = false
//! permalink_symbol = "¶"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkdownConfig {
    pub html: bool,
    pub breaks: bool,
    pub linkify: bool,
    pub anchor: AnchorConfig,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            html: true,
            breaks: true,
            linkify: true,
            anchor: AnchorConfig::default(),
        }
    }
}

impl MarkdownConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        self.anchor.validate(diag);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnchorConfig {
    /// Heading levels that receive an `id`.
    pub level: AnchorLevel,
    /// Append a visible link to each anchored heading.
    pub permalink: bool,
    pub permalink_symbol: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            level: AnchorLevel::List(vec![1, 2, 3]),
            permalink: false,
            permalink_symbol: "¶".into(),
        }
    }
}

impl AnchorConfig {
    pub const LEVEL: FieldPath = FieldPath::new("markdown.anchor.level");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let out_of_range = match &self.level {
            AnchorLevel::Min(min) => !(1..=6).contains(min),
            AnchorLevel::List(levels) => levels.iter().any(|l| !(1..=6).contains(l)),
        };
        if out_of_range {
            diag.error(Self::LEVEL, "heading levels must be between 1 and 6");
        }
    }
}

/// Which heading levels get anchors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AnchorLevel {
    /// Every heading level from `n` down to h6.
    Min(u8),
    /// Exactly these levels.
    List(Vec<u8>),
}

impl AnchorLevel {
    pub fn includes(&self, level: u8) -> bool {
        match self {
            Self::Min(min) => level >= *min,
            Self::List(levels) => levels.contains(&level),
        }
    }
}
