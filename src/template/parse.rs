//! Tokenizer and tree builder for `{{ }}` / `{% %}` / `{# #}` templates.

use std::sync::LazyLock;

use regex::Regex;

use super::TemplateError;
use crate::shortcode::ShortcodeRegistry;

static END_RAW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{%-?\s*endraw\s*-?%\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'s> {
    Text(&'s str),
    Output { expr: &'s str, line: usize },
    Tag { body: &'s str, line: usize },
}

/// A parsed template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'s> {
    Text(&'s str),
    /// `{{ expr }}`
    Output { expr: &'s str, line: usize },
    /// `{% include "name" %}`
    Include { target: &'s str, line: usize },
    /// `{% name args %}`, with `body` for paired shortcodes
    Shortcode {
        name: &'s str,
        args: &'s str,
        line: usize,
        body: Option<Vec<Node<'s>>>,
    },
}

/// 1-based line number of byte offset `pos`.
fn line_at(source: &str, pos: usize) -> usize {
    source[..pos].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Find the next opening delimiter at or after `from`.
fn next_open(source: &str, from: usize) -> Option<(usize, &'static str, &'static str)> {
    let rest = &source[from..];
    let mut best: Option<(usize, &'static str, &'static str)> = None;
    for (open, close) in [("{{", "}}"), ("{%", "%}"), ("{#", "#}")] {
        if let Some(i) = rest.find(open)
            && best.is_none_or(|(b, _, _)| i < b)
        {
            best = Some((i, open, close));
        }
    }
    best.map(|(i, open, close)| (from + i, open, close))
}

/// Whitespace control on one side of a tag.
#[derive(Debug, Clone, Copy, Default)]
struct Trim {
    /// `{%-`: strip whitespace before the tag.
    before: bool,
    /// `-%}`: strip whitespace after the tag.
    after: bool,
}

fn strip_trim_markers(inner: &str) -> (&str, Trim) {
    let (inner, before) = match inner.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };
    let (inner, after) = match inner.strip_suffix('-') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };
    (inner.trim(), Trim { before, after })
}

/// Push a text token, trimmed as requested by the neighbouring tags.
fn push_text<'s>(tokens: &mut Vec<Token<'s>>, text: &'s str, trim_start: bool, trim_end: bool) {
    let text = if trim_start { text.trim_start() } else { text };
    let text = if trim_end { text.trim_end() } else { text };
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}

fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    while let Some((start, open, close)) = next_open(source, pos) {
        let line = line_at(source, start);
        let inner_start = start + open.len();
        let Some(len) = source[inner_start..].find(close) else {
            return Err(TemplateError::Unterminated { open, line });
        };
        let (inner, trim) = strip_trim_markers(&source[inner_start..inner_start + len]);

        push_text(&mut tokens, &source[pos..start], trim_next, trim.before);
        pos = inner_start + len + close.len();
        trim_next = trim.after;

        match open {
            "{{" => tokens.push(Token::Output { expr: inner, line }),
            "{%" if inner == "raw" => {
                let Some(end) = END_RAW.find(&source[pos..]) else {
                    return Err(TemplateError::Unclosed { name: "raw".into(), line });
                };
                let closing = end.as_str();
                push_text(
                    &mut tokens,
                    &source[pos..pos + end.start()],
                    trim_next,
                    closing.starts_with("{%-"),
                );
                trim_next = closing.ends_with("-%}");
                pos += end.end();
            }
            "{%" => tokens.push(Token::Tag { body: inner, line }),
            // Comments produce nothing
            _ => {}
        }
    }

    push_text(&mut tokens, &source[pos..], trim_next, false);
    Ok(tokens)
}

fn split_tag(body: &str) -> (&str, &str) {
    match body.find(char::is_whitespace) {
        Some(i) => (&body[..i], body[i..].trim()),
        None => (body, ""),
    }
}

struct Open<'s> {
    name: &'s str,
    args: &'s str,
    line: usize,
    children: Vec<Node<'s>>,
}

/// Parse `source` into a node tree.
///
/// Every tag name must be `include`, a registered shortcode, or the `end`
/// tag of an open paired shortcode.
pub fn parse<'s>(source: &'s str, shortcodes: &ShortcodeRegistry) -> Result<Vec<Node<'s>>, TemplateError> {
    let mut root = Vec::new();
    let mut stack: Vec<Open<'s>> = Vec::new();

    for token in tokenize(source)? {
        let node = match token {
            Token::Text(text) => Node::Text(text),
            Token::Output { expr, line } => Node::Output { expr, line },
            Token::Tag { body, line } => {
                let (name, args) = split_tag(body);
                if name == "include" {
                    Node::Include { target: args, line }
                } else if let Some(open) = name
                    .strip_prefix("end")
                    .and_then(|closed| stack.pop_if(|open| open.name == closed))
                {
                    Node::Shortcode {
                        name: open.name,
                        args: open.args,
                        line: open.line,
                        body: Some(open.children),
                    }
                } else if shortcodes.is_paired(name) {
                    stack.push(Open { name, args, line, children: Vec::new() });
                    continue;
                } else if shortcodes.get(name).is_some() {
                    Node::Shortcode { name, args, line, body: None }
                } else if name.starts_with("end") {
                    return Err(TemplateError::UnexpectedTag { tag: name.into(), line });
                } else {
                    return Err(TemplateError::UnknownShortcode { name: name.into(), line });
                }
            }
        };

        match stack.last_mut() {
            Some(open) => open.children.push(node),
            None => root.push(node),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(TemplateError::Unclosed {
            name: open.name.into(),
            line: open.line,
        });
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::{Markup, arg_str, figure, youtube};

    fn registry() -> ShortcodeRegistry {
        let mut registry = ShortcodeRegistry::new();
        registry.add_simple("youtube", |args| youtube(&arg_str(args, 0).unwrap_or_default()));
        registry.add_paired("figure", |content, args| figure(content, arg_str(args, 0).as_deref()));
        registry
    }

    #[test]
    fn test_plain_text() {
        let nodes = parse("just text", &registry()).unwrap();
        assert_eq!(nodes, vec![Node::Text("just text")]);
    }

    #[test]
    fn test_output_and_comment() {
        let nodes = parse("a{{ title | upper }}{# hidden #}b", &registry()).unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("a"),
                Node::Output { expr: "title | upper", line: 1 },
                Node::Text("b"),
            ]
        );
    }

    #[test]
    fn test_simple_and_paired() {
        let src = "{% youtube \"abc\" %}\n{% figure \"cap\" %}<img>{% endfigure %}";
        let nodes = parse(src, &registry()).unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(
            nodes[0],
            Node::Shortcode { name: "youtube", args: "\"abc\"", body: None, .. }
        ));
        let Node::Shortcode { name, body: Some(body), line, .. } = &nodes[2] else {
            panic!("expected paired shortcode");
        };
        assert_eq!(*name, "figure");
        assert_eq!(*line, 2);
        assert_eq!(body, &vec![Node::Text("<img>")]);
    }

    #[test]
    fn test_nested_paired() {
        let src = "{% figure \"outer\" %}{% figure \"inner\" %}x{% endfigure %}{% endfigure %}";
        let nodes = parse(src, &registry()).unwrap();
        let [Node::Shortcode { body: Some(outer), .. }] = nodes.as_slice() else {
            panic!("expected one outer figure");
        };
        assert!(matches!(
            outer.as_slice(),
            [Node::Shortcode { args: "\"inner\"", body: Some(_), .. }]
        ));
    }

    #[test]
    fn test_raw_block_is_text() {
        let nodes = parse("{% raw %}{% youtube \"x\" %}{{ y }}{% endraw %}", &registry()).unwrap();
        assert_eq!(nodes, vec![Node::Text("{% youtube \"x\" %}{{ y }}")]);
    }

    #[test]
    fn test_trim_markers_strip_whitespace() {
        let nodes = parse("a \n {%- youtube \"x\" -%} \n b {{ c -}}\n d", &registry()).unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0], Node::Text("a"));
        assert!(matches!(nodes[1], Node::Shortcode { name: "youtube", .. }));
        assert_eq!(nodes[2], Node::Text("b "));
        assert_eq!(nodes[3], Node::Output { expr: "c", line: 3 });
        assert_eq!(nodes[4], Node::Text("d"));
    }

    #[test]
    fn test_trim_markers_only_touch_their_side() {
        let nodes = parse("x {# note -#}  y", &registry()).unwrap();
        assert_eq!(nodes, vec![Node::Text("x "), Node::Text("y")]);

        let nodes = parse("{% raw -%}\n  kept {{ x }}\n{%- endraw %}", &registry()).unwrap();
        assert_eq!(nodes, vec![Node::Text("kept {{ x }}")]);
    }

    #[test]
    fn test_errors() {
        let registry = registry();
        assert!(matches!(
            parse("a\n{{ open", &registry),
            Err(TemplateError::Unterminated { open: "{{", line: 2 })
        ));
        assert!(matches!(
            parse("{% nope %}", &registry),
            Err(TemplateError::UnknownShortcode { .. })
        ));
        assert!(matches!(
            parse("{% figure %}unclosed", &registry),
            Err(TemplateError::Unclosed { .. })
        ));
        assert!(matches!(
            parse("{% endfigure %}", &registry),
            Err(TemplateError::UnexpectedTag { .. })
        ));
    }

    #[test]
    fn test_custom_paired_registration() {
        let mut registry = ShortcodeRegistry::new();
        registry.add_paired("box", |content, _| Markup::raw(format!("[{content}]")));
        let nodes = parse("{% box %}in{% endbox %}", &registry).unwrap();
        assert!(matches!(nodes[0], Node::Shortcode { name: "box", body: Some(_), .. }));
    }
}
