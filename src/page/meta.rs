//! Front matter keys the build itself understands.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Deserialize tags from a single string, a list, or `null`.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::One(tag)) => vec![tag],
        Some(Tags::Many(tags)) => tags,
        None => Vec::new(),
    })
}

/// `permalink:` in front matter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Permalink {
    /// `permalink: false` skips writing; `true` keeps the default route.
    Enabled(bool),
    /// Custom output path, e.g. `/archive/hello/` or `/feed.xml`.
    Path(String),
}

/// Page metadata
///
/// | Field       | Type                 | Description                     |
/// |-------------|----------------------|---------------------------------|
/// | `title`     | `String`             | Page title                      |
/// | `date`      | string or number     | Publication date                |
/// | `draft`     | `bool`               | Skipped unless building drafts  |
/// | `tags`      | string or list       | Collections the page belongs to |
/// | `permalink` | string or `false`    | Output path override            |
/// | `layout`    | `String`             | Layout file in the layouts dir  |
///
/// Any other key stays available to templates through the raw data map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    pub title: Option<String>,
    pub date: Option<Value>,
    pub draft: bool,
    #[serde(deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    pub permalink: Option<Permalink>,
    pub layout: Option<String>,
}

impl PageMeta {
    pub fn from_data(data: &Map<String, Value>) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(data.clone()))
    }

    /// Whether the page should produce an output file.
    pub fn is_written(&self) -> bool {
        !matches!(self.permalink, Some(Permalink::Enabled(false)))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
