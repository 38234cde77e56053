//! Figure and note wrappers.

use super::Markup;
use crate::utils::html::escape_attr;

/// Default note type when none is given.
pub const DEFAULT_NOTE_TYPE: &str = "info";

/// Wrap content in `<figure>`, adding a `<figcaption>` only for a non-empty caption.
pub fn figure(content: &str, caption: Option<&str>) -> Markup {
    match caption.filter(|c| !c.is_empty()) {
        Some(caption) => Markup::raw(format!(
            "<figure>{content}<figcaption>{caption}</figcaption></figure>"
        )),
        None => Markup::raw(format!("<figure>{content}</figure>")),
    }
}

/// Wrap content in an `<aside class="note {kind}">` with a title line.
///
/// `alert` notes are labelled `!important`; every other kind gets `Note:`.
pub fn note(content: &str, kind: Option<&str>) -> Markup {
    let kind = kind.unwrap_or(DEFAULT_NOTE_TYPE);
    let label = if kind == "alert" { "!important" } else { "Note:" };
    Markup::raw(format!(
        "<aside class=\"note {}\">\n  <span class=\"note-title\">{label}</span>\n  {content}\n</aside>",
        escape_attr(kind)
    ))
}
