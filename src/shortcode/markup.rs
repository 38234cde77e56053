//! Trusted HTML fragments.

use std::fmt;

use crate::utils::html::escape;

/// A fragment of HTML that is emitted without further escaping.
///
/// Shortcodes return `Markup` so the template layer can tell rendered HTML
/// apart from plain values, which are escaped on output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wrap a string that is already valid HTML.
    pub fn raw(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Escape plain text into markup.
    pub fn text(text: &str) -> Self {
        Self(escape(text).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> Self {
        markup.0
    }
}
