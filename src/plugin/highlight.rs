//! Build-time code highlighting with syntect.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::SyntaxSet,
};

use crate::markdown::CodeHighlighter;
use crate::site::{Plugin, SiteBuilder};

/// Highlights fenced code blocks whose language syntect knows.
pub struct SyntaxHighlightPlugin {
    theme: String,
}

impl SyntaxHighlightPlugin {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }
}

impl Plugin for SyntaxHighlightPlugin {
    fn name(&self) -> &'static str {
        "syntax-highlight"
    }

    fn register(&self, site: &mut SiteBuilder) -> Result<()> {
        let highlighter = SyntectHighlighter::new(&self.theme)?;
        site.set_highlighter(Arc::new(highlighter));
        Ok(())
    }
}

pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl SyntectHighlighter {
    /// Load the bundled syntaxes and the named bundled theme.
    pub fn new(theme: &str) -> Result<Self> {
        let mut themes = ThemeSet::load_defaults().themes;
        // `remove` hands back an owned `Theme`
        let Some(theme) = themes.remove(theme) else {
            let available: Vec<_> = themes.keys().map(String::as_str).collect();
            return Err(anyhow!(
                "unknown highlight theme '{theme}', available: {}",
                available.join(", ")
            ));
        };

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self.syntaxes.find_syntax_by_token(lang)?;
        highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme).ok()
    }
}
