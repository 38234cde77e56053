//! Heading anchors.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use rustc_hash::FxHashMap;

use super::AnchorOptions;
use crate::utils::{html::escape_attr, slug::slugify};

/// Give headings at the configured levels a unique slug `id`.
///
/// Duplicate slugs get `-1`, `-2`, ... suffixes in document order.
pub fn add_anchors<'a>(events: Vec<Event<'a>>, options: &AnchorOptions) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    let mut iter = events.into_iter();

    while let Some(event) = iter.next() {
        let Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) = event
        else {
            out.push(event);
            continue;
        };

        // Buffer the heading body to compute its text
        let mut body = Vec::new();
        for inner in iter.by_ref() {
            if matches!(inner, Event::End(TagEnd::Heading(_))) {
                break;
            }
            body.push(inner);
        }

        let id = match id {
            Some(id) => Some(id),
            None if options.includes(level) => {
                Some(CowStr::from(unique_slug(&heading_text(&body), &mut seen)))
            }
            None => None,
        };

        let permalink = match (&id, options.permalink) {
            (Some(id), true) => Some(format!(
                r##" <a class="header-anchor" href="#{}">{}</a>"##,
                escape_attr(id),
                options.permalink_symbol
            )),
            _ => None,
        };

        out.push(Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }));
        out.extend(body);
        if let Some(link) = permalink {
            out.push(Event::InlineHtml(CowStr::from(link)));
        }
        out.push(Event::End(TagEnd::Heading(level)));
    }

    out
}

fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

fn unique_slug(text: &str, seen: &mut FxHashMap<String, usize>) -> String {
    let base = match slugify(text) {
        s if s.is_empty() => "section".to_string(),
        s => s,
    };

    let count = seen.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 {
        base.clone()
    } else {
        format!("{base}-{count}")
    };
    *count += 1;

    // A generated suffix may collide with a literal heading like "Intro 1"
    if slug != base && seen.contains_key(&slug) {
        return unique_slug(&slug, seen);
    }
    seen.entry(slug.clone()).or_insert(1);
    slug
}

/// Numeric value of a heading level.
pub const fn level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
