//! `[front_matter]` section.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FrontMatterConfig {
    /// Split `page.excerpt` off the body at `excerpt_separator`.
    pub excerpt: bool,
    pub excerpt_separator: String,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            excerpt: true,
            excerpt_separator: "<!-- excerpt -->".into(),
        }
    }
}

impl FrontMatterConfig {
    pub const EXCERPT_SEPARATOR: FieldPath = FieldPath::new("front_matter.excerpt_separator");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.excerpt && self.excerpt_separator.trim().is_empty() {
            diag.error(Self::EXCERPT_SEPARATOR, "separator cannot be empty");
        }
    }
}
