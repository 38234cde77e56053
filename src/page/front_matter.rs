//! Front matter: the metadata block at the top of a content file.
//!
//! ```text
//! ---                      +++
//! title: Hello             title = "Hello"
//! date: 2024-06-15         date = 2024-06-15
//! ---                      +++
//! Body...                  Body...
//! ```
//!
//! YAML is fenced by `---`, TOML by `+++`. Both are converted into a JSON
//! object so templates see one data model.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::FrontMatterConfig;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front matter opened with `{0}` is never closed")]
    Unterminated(&'static str),

    #[error("invalid YAML front matter")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML front matter")]
    Toml(#[from] toml::de::Error),

    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,
}

/// A content file split into metadata and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub data: Map<String, Value>,
    pub body: String,
    /// Text before the excerpt separator, when one was found.
    pub excerpt: Option<String>,
}

/// Split `source` into front matter and body.
pub fn parse(source: &str, options: &FrontMatterConfig) -> Result<FrontMatter, FrontMatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (data, body) = match split_block(source)? {
        Some((Fence::Yaml, block, body)) => (parse_yaml(block)?, body),
        Some((Fence::Toml, block, body)) => (parse_toml(block)?, body),
        None => (Map::new(), source),
    };

    let (body, excerpt) = if options.excerpt {
        split_excerpt(body, &options.excerpt_separator)
    } else {
        (body.to_string(), None)
    };

    Ok(FrontMatter {
        data,
        body,
        excerpt,
    })
}

#[derive(Debug, Clone, Copy)]
enum Fence {
    Yaml,
    Toml,
}

impl Fence {
    const fn marker(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Locate a fenced block on the first line. Returns `(fence, block, body)`.
fn split_block(source: &str) -> Result<Option<(Fence, &str, &str)>, FrontMatterError> {
    let first_line_end = source.find('\n').unwrap_or(source.len());
    let fence = match source[..first_line_end].trim_end() {
        "---" => Fence::Yaml,
        "+++" => Fence::Toml,
        _ => return Ok(None),
    };

    let block_start = (first_line_end + 1).min(source.len());
    let mut offset = block_start;
    for line in source[block_start..].split_inclusive('\n') {
        if line.trim_end() == fence.marker() {
            let block = &source[block_start..offset];
            let body = &source[offset + line.len()..];
            return Ok(Some((fence, block, body)));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated(fence.marker()))
}

fn parse_yaml(block: &str) -> Result<Map<String, Value>, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_yaml::from_str::<Value>(block)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

fn parse_toml(block: &str) -> Result<Map<String, Value>, FrontMatterError> {
    let table: toml::Table = toml::from_str(block)?;
    Ok(table
        .into_iter()
        .map(|(k, v)| (k, toml_to_json(v)))
        .collect())
}

/// TOML datetimes become ISO strings; everything else maps one to one.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Remove the separator from the body and return the text before it.
fn split_excerpt(body: &str, separator: &str) -> (String, Option<String>) {
    let Some(idx) = body.find(separator) else {
        return (body.to_string(), None);
    };

    let before = &body[..idx];
    let after = &body[idx + separator.len()..];
    let after = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    let excerpt = before.trim();
    let excerpt = (!excerpt.is_empty()).then(|| excerpt.to_string());
    (format!("{before}{after}"), excerpt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_default(source: &str) -> FrontMatter {
        parse(source, &FrontMatterConfig::default()).unwrap()
    }

    #[test]
    fn test_no_front_matter() {
        let fm = parse_default("# Just a body\n");
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "# Just a body\n");
        assert_eq!(fm.excerpt, None);
    }

    #[test]
    fn test_yaml_front_matter() {
        let fm = parse_default("---\ntitle: Hello\ndate: 2024-06-15\ntags:\n  - posts\n---\nBody\n");
        assert_eq!(fm.data["title"], json!("Hello"));
        assert_eq!(fm.data["date"], json!("2024-06-15"));
        assert_eq!(fm.data["tags"], json!(["posts"]));
        assert_eq!(fm.body, "Body\n");
    }

    #[test]
    fn test_toml_front_matter() {
        let fm = parse_default("+++\ntitle = \"Hello\"\ndate = 2024-06-15\ndraft = true\n+++\nBody");
        assert_eq!(fm.data["title"], json!("Hello"));
        assert_eq!(fm.data["date"], json!("2024-06-15"));
        assert_eq!(fm.data["draft"], json!(true));
        assert_eq!(fm.body, "Body");
    }

    #[test]
    fn test_empty_block_and_crlf() {
        let fm = parse_default("---\r\n---\r\nBody");
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "Body");
    }

    #[test]
    fn test_horizontal_rule_later_is_not_front_matter() {
        let fm = parse_default("Intro\n\n---\n\nMore");
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "Intro\n\n---\n\nMore");
    }

    #[test]
    fn test_unterminated() {
        let err = parse("---\ntitle: x\n", &FrontMatterConfig::default()).unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated("---")));
    }

    #[test]
    fn test_not_a_mapping() {
        let err = parse("---\n- a\n- b\n---\n", &FrontMatterConfig::default()).unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAMapping));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("---\ntitle: [oops\n---\n", &FrontMatterConfig::default()).unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_excerpt_split() {
        let fm = parse_default("---\ntitle: x\n---\nFirst para.\n<!-- excerpt -->\nRest.\n");
        assert_eq!(fm.excerpt.as_deref(), Some("First para."));
        assert_eq!(fm.body, "First para.\nRest.\n");
    }

    #[test]
    fn test_excerpt_disabled() {
        let options = FrontMatterConfig {
            excerpt: false,
            ..FrontMatterConfig::default()
        };
        let fm = parse("A\n<!-- excerpt -->\nB", &options).unwrap();
        assert_eq!(fm.excerpt, None);
        assert_eq!(fm.body, "A\n<!-- excerpt -->\nB");
    }
}
