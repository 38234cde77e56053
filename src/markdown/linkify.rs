//! Bare URL autolinking.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

static RE_BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"'`]+"#).unwrap()
});

/// Trailing characters that end a sentence rather than a URL.
const TRAILING_PUNCT: &[char] = &['.', ',', ':', ';', '!', '?', ')', ']', '\'', '"'];

/// Wrap bare URLs in text events with autolinks.
///
/// Text inside links, images, code blocks and raw `<a>` elements is left alone.
pub fn linkify(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut protected = 0usize;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                protected += 1;
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                protected = protected.saturating_sub(1);
            }
            Event::InlineHtml(html) => {
                let tag = html.trim_start().to_ascii_lowercase();
                if tag.starts_with("<a ") || tag.starts_with("<a>") {
                    protected += 1;
                } else if tag.starts_with("</a") {
                    protected = protected.saturating_sub(1);
                }
            }
            Event::Text(text) if protected == 0 && RE_BARE_URL.is_match(text) => {
                split_text(text, &mut out);
                continue;
            }
            _ => {}
        }
        out.push(event);
    }

    out
}

fn split_text<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut last = 0;

    for m in RE_BARE_URL.find_iter(text) {
        let url = m.as_str().trim_end_matches(TRAILING_PUNCT);
        if url.len() <= 4 {
            continue;
        }
        let start = m.start();
        let end = start + url.len();

        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }

        let href = if url.to_ascii_lowercase().starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };

        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));
        last = end;
    }

    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}
