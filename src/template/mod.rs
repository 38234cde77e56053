//! Template expansion for pages, includes and layouts.
//!
//! ```text
//! {{ page.date | readableDate }}      output, HTML-escaped
//! {{ content | safe }}                output, trusted
//! {% include "header.html" %}         partial from the includes dir
//! {% youtube "abc123" %}              simple shortcode
//! {% figure "Caption" %}…{% endfigure %}   paired shortcode
//! {% raw %}…{% endraw %}              literal text
//! {# comment #}
//! ```
//!
//! Deliberately small: there are no loops, conditionals or macros.

mod expr;
mod layout;
mod parse;

pub use layout::MAX_LAYOUT_DEPTH;

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::config::util::unsafe_path_reason;
use crate::filter::FilterRegistry;
use crate::page::front_matter::FrontMatterError;
use crate::shortcode::{Shortcode, ShortcodeRegistry};
use crate::utils::html::escape;
use parse::Node;

/// Includes may nest this deep.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Filter that marks output as trusted markup.
const SAFE_FILTER: &str = "safe";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("`{open}` on line {line} is never closed")]
    Unterminated { open: &'static str, line: usize },

    #[error("`{{% {name} %}}` on line {line} has no matching `{{% end{name} %}}`")]
    Unclosed { name: String, line: usize },

    #[error("unexpected `{{% {tag} %}}` on line {line}")]
    UnexpectedTag { tag: String, line: usize },

    #[error("unknown shortcode `{name}` on line {line}")]
    UnknownShortcode { name: String, line: usize },

    #[error("unknown filter `{name}` on line {line}")]
    UnknownFilter { name: String, line: usize },

    #[error("invalid expression `{expr}` on line {line}")]
    InvalidExpression { expr: String, line: usize },

    #[error("cannot include '{name}': {reason}")]
    UnsafeInclude { name: String, reason: &'static str },

    #[error("include '{}' not found", path.display())]
    MissingInclude {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("includes nested deeper than {MAX_INCLUDE_DEPTH} levels")]
    IncludeDepth,

    #[error("layout '{}' not found", path.display())]
    MissingLayout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front matter in layout '{name}'")]
    LayoutFrontMatter {
        name: String,
        #[source]
        source: FrontMatterError,
    },

    #[error("layout '{0}' includes itself")]
    LayoutCycle(String),

    #[error("layouts nested deeper than {MAX_LAYOUT_DEPTH} levels")]
    LayoutDepth,

    #[error("in '{name}'")]
    In {
        name: String,
        #[source]
        source: Box<TemplateError>,
    },
}

impl TemplateError {
    fn within(self, name: impl Into<String>) -> Self {
        Self::In {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

/// Everything a template can reach: filters, shortcodes and partials.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEnv<'a> {
    pub filters: &'a FilterRegistry,
    pub shortcodes: &'a ShortcodeRegistry,
    pub includes: &'a Path,
    pub layouts: &'a Path,
}

impl TemplateEnv<'_> {
    /// Expand `source` against `data`.
    pub fn render(&self, source: &str, data: &Value) -> Result<String, TemplateError> {
        self.render_at_depth(source, data, 0)
    }

    fn render_at_depth(&self, source: &str, data: &Value, depth: usize) -> Result<String, TemplateError> {
        let nodes = parse::parse(source, self.shortcodes)?;
        let mut out = String::with_capacity(source.len());
        self.render_nodes(&nodes, data, depth, &mut out)?;
        Ok(out)
    }

    fn render_nodes(
        &self,
        nodes: &[Node<'_>],
        data: &Value,
        depth: usize,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output { expr, line } => out.push_str(&self.eval_output(expr, *line, data)?),
                Node::Include { target, line } => {
                    out.push_str(&self.include(target, *line, data, depth)?);
                }
                Node::Shortcode { name, args, line, body } => {
                    let args = eval_args(args, *line, data)?;
                    let markup = match (self.shortcodes.get(name), body) {
                        (Some(Shortcode::Paired(f)), Some(body)) => {
                            let mut content = String::new();
                            self.render_nodes(body, data, depth, &mut content)?;
                            f(&content, &args)
                        }
                        (Some(Shortcode::Simple(f)), None) => f(&args),
                        _ => {
                            return Err(TemplateError::UnknownShortcode {
                                name: (*name).to_string(),
                                line: *line,
                            });
                        }
                    };
                    out.push_str(markup.as_str());
                }
            }
        }
        Ok(())
    }

    /// `operand | filter | filter`; escaped unless the last filter is `safe`.
    fn eval_output(&self, source: &str, line: usize, data: &Value) -> Result<String, TemplateError> {
        let invalid = || TemplateError::InvalidExpression {
            expr: source.to_string(),
            line,
        };

        let mut parts = expr::split_unquoted(source, |c| c == '|').into_iter();
        let operand = parts.next().ok_or_else(invalid)?;
        let mut value = expr::eval_operand(operand, data).ok_or_else(invalid)?;

        let mut safe = false;
        for name in parts.map(str::trim) {
            if name.is_empty() {
                return Err(invalid());
            }
            safe = name == SAFE_FILTER;
            if safe {
                continue;
            }
            value = self
                .filters
                .apply(name, &value)
                .ok_or_else(|| TemplateError::UnknownFilter {
                    name: name.to_string(),
                    line,
                })?;
        }

        let text = expr::stringify(&value);
        Ok(if safe { text } else { escape(&text).into_owned() })
    }

    fn include(&self, target: &str, line: usize, data: &Value, depth: usize) -> Result<String, TemplateError> {
        if depth >= MAX_INCLUDE_DEPTH {
            return Err(TemplateError::IncludeDepth);
        }

        let name = match expr::eval_operand(target, data) {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => {
                return Err(TemplateError::InvalidExpression {
                    expr: format!("include {target}"),
                    line,
                });
            }
        };
        if let Some(reason) = unsafe_path_reason(Path::new(&name)) {
            return Err(TemplateError::UnsafeInclude { name, reason });
        }

        let path = self.includes.join(&name);
        let source = std::fs::read_to_string(&path)
            .map_err(|source| TemplateError::MissingInclude { path, source })?;

        self.render_at_depth(&source, data, depth + 1)
            .map_err(|err| err.within(name))
    }
}

fn eval_args(args: &str, line: usize, data: &Value) -> Result<Vec<Value>, TemplateError> {
    expr::split_args(args)
        .into_iter()
        .map(|arg| {
            expr::eval_operand(arg, data).ok_or_else(|| TemplateError::InvalidExpression {
                expr: arg.to_string(),
                line,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::{self, Markup};
    use crate::site::{Site, SiteBuilder, register_filters, register_shortcodes};
    use serde_json::json;
    use std::fs;

    struct Fixture {
        site: Site,
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with(|_| {})
        }

        fn with(extra: impl FnOnce(&mut SiteBuilder)) -> Self {
            let mut builder = SiteBuilder::new();
            register_filters(&mut builder);
            register_shortcodes(&mut builder);
            builder.add_filter("upper", |v| json!(expr::stringify(v).to_uppercase()));
            extra(&mut builder);
            Self {
                site: builder.build(),
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn env(&self) -> TemplateEnv<'_> {
            TemplateEnv {
                filters: self.site.filters(),
                shortcodes: self.site.shortcodes(),
                includes: self.dir.path(),
                layouts: self.dir.path(),
            }
        }

        fn render(&self, source: &str, data: &Value) -> Result<String, TemplateError> {
            self.env().render(source, data)
        }
    }

    #[test]
    fn test_output_is_escaped() {
        let fx = Fixture::new();
        let data = json!({"title": "<b>Fish & Chips</b>"});
        assert_eq!(
            fx.render("<h1>{{ title }}</h1>", &data).unwrap(),
            "<h1>&lt;b&gt;Fish &amp; Chips&lt;/b&gt;</h1>"
        );
        assert_eq!(fx.render("{{ title | safe }}", &data).unwrap(), "<b>Fish & Chips</b>");
    }

    #[test]
    fn test_safe_only_counts_last() {
        let fx = Fixture::new();
        let data = json!({"t": "<i>"});
        assert_eq!(fx.render("{{ t | safe | upper }}", &data).unwrap(), "&lt;I&gt;");
    }

    #[test]
    fn test_missing_values_render_empty() {
        let fx = Fixture::new();
        assert_eq!(fx.render("[{{ nope.deeper }}]", &json!({})).unwrap(), "[]");
    }

    #[test]
    fn test_filters_chain() {
        let fx = Fixture::new();
        let data = json!({"page": {"date": "2024-06-15T23:30:00-05:00"}});
        assert_eq!(
            fx.render("{{ page.date | readableDate | upper }}", &data).unwrap(),
            "JUNE 16, 2024"
        );
        assert_eq!(
            fx.render("{{ \"garbage\" | readableDate }}", &data).unwrap(),
            "Invalid Date"
        );
    }

    #[test]
    fn test_unknown_filter_is_error() {
        let fx = Fixture::new();
        let err = fx.render("\n{{ x | nope }}", &json!({})).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownFilter { ref name, line: 2 } if name == "nope"));
    }

    #[test]
    fn test_invalid_expressions() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.render("{{ }}", &json!({})),
            Err(TemplateError::InvalidExpression { .. })
        ));
        assert!(matches!(
            fx.render("{{ x | }}", &json!({})),
            Err(TemplateError::InvalidExpression { .. })
        ));
        assert!(matches!(
            fx.render("{% youtube \"unterminated %}", &json!({})),
            Err(TemplateError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_simple_shortcodes() {
        let fx = Fixture::new();
        let out = fx
            .render("{% note \"Read this\", \"alert\" %}", &json!({}))
            .unwrap();
        assert_eq!(out, shortcode::note("Read this", Some("alert")).into_string());

        let out = fx.render("{% youtube video.id %}", &json!({"video": {"id": "abc123"}})).unwrap();
        assert_eq!(out, shortcode::youtube("abc123").into_string());
    }

    #[test]
    fn test_paired_shortcode_receives_expanded_content() {
        let fx = Fixture::new();
        let out = fx
            .render(
                "{% figure \"A {{cap}}\" %}<img alt=\"{{ alt }}\">{% endfigure %}",
                &json!({"alt": "a&b"}),
            )
            .unwrap();
        assert_eq!(
            out,
            "<figure><img alt=\"a&amp;b\"><figcaption>A {{cap}}</figcaption></figure>"
        );
    }

    #[test]
    fn test_nested_paired_shortcodes() {
        let fx = Fixture::with(|site| {
            site.add_paired_shortcode("wrap", |content, _| Markup::raw(format!("<div>{content}</div>")));
        });
        let out = fx
            .render("{% wrap %}{% figure %}x{% endfigure %}{% endwrap %}", &json!({}))
            .unwrap();
        assert_eq!(out, "<div><figure>x</figure></div>");
    }

    #[test]
    fn test_include() {
        let fx = Fixture::new();
        fs::write(fx.dir.path().join("header.html"), "<header>{{ site }}</header>").unwrap();
        let out = fx
            .render("{% include \"header.html\" %}<main></main>", &json!({"site": "Inkpot"}))
            .unwrap();
        assert_eq!(out, "<header>Inkpot</header><main></main>");
    }

    #[test]
    fn test_include_errors() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.render("{% include \"missing.html\" %}", &json!({})),
            Err(TemplateError::MissingInclude { .. })
        ));
        assert!(matches!(
            fx.render("{% include \"../secret\" %}", &json!({})),
            Err(TemplateError::UnsafeInclude { .. })
        ));
        assert!(matches!(
            fx.render("{% include %}", &json!({})),
            Err(TemplateError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_recursive_include_hits_depth_limit() {
        let fx = Fixture::new();
        fs::write(fx.dir.path().join("loop.html"), "{% include \"loop.html\" %}").unwrap();
        let mut err = fx.render("{% include \"loop.html\" %}", &json!({})).unwrap_err();
        let mut levels = 0;
        while let TemplateError::In { source, .. } = err {
            err = *source;
            levels += 1;
        }
        assert!(matches!(err, TemplateError::IncludeDepth));
        assert_eq!(levels, MAX_INCLUDE_DEPTH);
    }

    #[test]
    fn test_error_inside_include_names_file() {
        let fx = Fixture::new();
        fs::write(fx.dir.path().join("bad.html"), "{% nope %}").unwrap();
        let err = fx.render("{% include \"bad.html\" %}", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "in 'bad.html'");
        assert!(matches!(
            err,
            TemplateError::In { source, .. } if matches!(*source, TemplateError::UnknownShortcode { .. })
        ));
    }
}
