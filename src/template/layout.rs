//! Layout chains: `layout: post.html` wraps rendered content.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{TemplateEnv, TemplateError};
use crate::config::FrontMatterConfig;
use crate::config::util::unsafe_path_reason;
use crate::page::front_matter;

/// Layouts may chain this deep.
pub const MAX_LAYOUT_DEPTH: usize = 8;

impl TemplateEnv<'_> {
    /// Wrap `content` in `layout` and whatever layouts it declares in turn.
    ///
    /// Each layout sees its own front matter overlaid by `data`, plus
    /// `content` bound to the output of the previous step.
    pub fn apply_layouts(
        &self,
        layout: Option<&str>,
        mut content: String,
        data: &Value,
    ) -> Result<String, TemplateError> {
        let options = FrontMatterConfig {
            excerpt: false,
            ..FrontMatterConfig::default()
        };
        let mut seen: Vec<String> = Vec::new();
        let mut next = layout.map(str::to_string);

        while let Some(name) = next.take() {
            if seen.contains(&name) {
                return Err(TemplateError::LayoutCycle(name));
            }
            if seen.len() >= MAX_LAYOUT_DEPTH {
                return Err(TemplateError::LayoutDepth);
            }

            let path = self.resolve_layout(&name)?;
            let source = std::fs::read_to_string(&path)
                .map_err(|source| TemplateError::MissingLayout { path, source })?;
            let parsed = front_matter::parse(&source, &options).map_err(|source| {
                TemplateError::LayoutFrontMatter {
                    name: name.clone(),
                    source,
                }
            })?;

            next = parsed
                .data
                .get("layout")
                .and_then(Value::as_str)
                .map(str::to_string);

            let scope = layout_scope(parsed.data, data, content);
            content = self
                .render(&parsed.body, &scope)
                .map_err(|err| err.within(name.clone()))?;
            seen.push(name);
        }

        Ok(content)
    }

    /// `name` as given, or with `.html` appended when that file exists instead.
    fn resolve_layout(&self, name: &str) -> Result<PathBuf, TemplateError> {
        if let Some(reason) = unsafe_path_reason(Path::new(name)) {
            return Err(TemplateError::UnsafeInclude {
                name: name.to_string(),
                reason,
            });
        }

        let exact = self.layouts.join(name);
        if exact.is_file() || Path::new(name).extension().is_some() {
            return Ok(exact);
        }
        let with_ext = self.layouts.join(format!("{name}.html"));
        Ok(if with_ext.is_file() { with_ext } else { exact })
    }
}

fn layout_scope(mut defaults: Map<String, Value>, data: &Value, content: String) -> Value {
    if let Value::Object(data) = data {
        for (key, value) in data {
            defaults.insert(key.clone(), value.clone());
        }
    }
    defaults.insert("content".into(), Value::String(content));
    Value::Object(defaults)
}
