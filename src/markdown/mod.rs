//! Markdown rendering via `pulldown-cmark`.
//!
//! The parser's event stream goes through a few passes before HTML output:
//!
//! | Pass        | Option              | Effect                                    |
//! |-------------|---------------------|-------------------------------------------|
//! | raw HTML    | `html = false`      | raw HTML is escaped into text             |
//! | breaks      | `breaks = true`     | soft line breaks become `<br />`          |
//! | linkify     | `linkify = true`    | bare URLs become links                    |
//! | anchors     | `anchor.level`      | headings get slug ids (+ permalink glyph) |
//! | highlight   | highlighter plugin  | fenced code is highlighted                |

mod anchor;
mod linkify;

use std::sync::Arc;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use pulldown_cmark::{TextMergeStream, html};

use crate::config::{AnchorConfig, AnchorLevel, MarkdownConfig};

/// Core Markdown switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Pass raw HTML through.
    pub html: bool,
    /// Render soft line breaks as `<br />`.
    pub breaks: bool,
    /// Turn bare URLs into links.
    pub linkify: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            html: true,
            breaks: true,
            linkify: true,
        }
    }
}

/// Heading anchor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorOptions {
    pub level: AnchorLevel,
    /// Append a link to the heading's own anchor.
    pub permalink: bool,
    pub permalink_symbol: String,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self::from(&AnchorConfig::default())
    }
}

impl AnchorOptions {
    pub fn includes(&self, level: HeadingLevel) -> bool {
        self.level.includes(anchor::level_number(level))
    }
}

impl From<&AnchorConfig> for AnchorOptions {
    fn from(config: &AnchorConfig) -> Self {
        Self {
            level: config.level.clone(),
            permalink: config.permalink,
            permalink_symbol: config.permalink_symbol.clone(),
        }
    }
}

/// Highlights fenced code blocks. Implemented by the syntax highlight plugin.
pub trait CodeHighlighter: Send + Sync {
    /// Return the full HTML for the block, or `None` if `lang` is unknown.
    fn highlight(&self, code: &str, lang: &str) -> Option<String>;
}

/// Configured Markdown renderer.
#[derive(Clone, Default)]
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    anchor: AnchorOptions,
    highlighter: Option<Arc<dyn CodeHighlighter>>,
}

impl std::fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownRenderer")
            .field("options", &self.options)
            .field("anchor", &self.anchor)
            .field("highlighter", &self.highlighter.is_some())
            .finish()
    }
}

impl MarkdownRenderer {
    pub fn new(options: MarkdownOptions, anchor: AnchorOptions) -> Self {
        Self {
            options,
            anchor,
            highlighter: None,
        }
    }

    pub fn from_config(config: &MarkdownConfig) -> Self {
        Self::new(
            MarkdownOptions {
                html: config.html,
                breaks: config.breaks,
                linkify: config.linkify,
            },
            AnchorOptions::from(&config.anchor),
        )
    }

    pub fn set_highlighter(&mut self, highlighter: Arc<dyn CodeHighlighter>) {
        self.highlighter = Some(highlighter);
    }

    pub const fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    pub const fn anchor(&self) -> &AnchorOptions {
        &self.anchor
    }

    /// Render Markdown source to an HTML string.
    pub fn render(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, parser_options());
        let mut events: Vec<Event<'_>> = TextMergeStream::new(parser).collect();

        if !self.options.html {
            events = escape_raw_html(events);
        }
        if self.options.breaks {
            events = hard_breaks(events);
        }
        if self.options.linkify {
            events = linkify::linkify(events);
        }
        events = anchor::add_anchors(events, &self.anchor);
        if let Some(highlighter) = &self.highlighter {
            events = highlight_code(events, highlighter.as_ref());
        }

        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

/// Extensions matching a typical CommonMark + GFM setup.
fn parser_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

fn escape_raw_html(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    events
        .into_iter()
        .map(|event| match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            other => other,
        })
        .collect()
}

fn hard_breaks(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    events
        .into_iter()
        .map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        })
        .collect()
}

fn highlight_code<'a>(events: Vec<Event<'a>>, highlighter: &dyn CodeHighlighter) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter();

    while let Some(event) = iter.next() {
        let lang = match &event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => fence_lang(info),
            _ => None,
        };
        let Some(lang) = lang else {
            out.push(event);
            continue;
        };

        let mut body = Vec::new();
        let mut code = String::new();
        for inner in iter.by_ref() {
            if matches!(inner, Event::End(TagEnd::CodeBlock)) {
                break;
            }
            if let Event::Text(text) = &inner {
                code.push_str(text);
            }
            body.push(inner);
        }

        match highlighter.highlight(&code, &lang) {
            Some(highlighted) => out.push(Event::Html(CowStr::from(highlighted))),
            None => {
                out.push(event);
                out.extend(body);
                out.push(Event::End(TagEnd::CodeBlock));
            }
        }
    }

    out
}

/// First word of a fence info string (` ```rust,ignore ` → `rust`).
fn fence_lang(info: &str) -> Option<String> {
    let lang = info
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or_default();
    (!lang.is_empty()).then(|| lang.to_string())
}
