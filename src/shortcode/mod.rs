//! Shortcodes: named template macros expanding to HTML fragments.
//!
//! | Name      | Kind   | Arguments                      |
//! |-----------|--------|--------------------------------|
//! | `youtube` | simple | embed code                     |
//! | `stream`  | simple | embed code                     |
//! | `note`    | simple | content, type (default `info`) |
//! | `figure`  | paired | caption (content is the block) |
//!
//! The builtin functions are pure: same arguments, same output.

mod callout;
mod embed;
mod markup;

pub use callout::{DEFAULT_NOTE_TYPE, figure, note};
pub use embed::{STREAM_EMBED_BASE, STREAM_EMBED_QUERY, YOUTUBE_EMBED_BASE, stream, youtube};
pub use markup::Markup;

use rustc_hash::FxHashMap;
use serde_json::Value;

type SimpleFn = dyn Fn(&[Value]) -> Markup + Send + Sync;
type PairedFn = dyn Fn(&str, &[Value]) -> Markup + Send + Sync;

/// A registered shortcode.
pub enum Shortcode {
    /// `{% name args %}`
    Simple(Box<SimpleFn>),
    /// `{% name args %}content{% endname %}`
    Paired(Box<PairedFn>),
}

impl Shortcode {
    pub const fn is_paired(&self) -> bool {
        matches!(self, Self::Paired(_))
    }
}

impl std::fmt::Debug for Shortcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(_) => f.write_str("Shortcode::Simple"),
            Self::Paired(_) => f.write_str("Shortcode::Paired"),
        }
    }
}

/// Name → shortcode table, filled once at configuration time.
#[derive(Debug, Default)]
pub struct ShortcodeRegistry {
    entries: FxHashMap<String, Shortcode>,
}

impl ShortcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a simple shortcode.
    pub fn add_simple<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Markup + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Shortcode::Simple(Box::new(f)));
    }

    /// Register (or replace) a paired shortcode.
    pub fn add_paired<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, &[Value]) -> Markup + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Shortcode::Paired(Box::new(f)));
    }

    pub fn get(&self, name: &str) -> Option<&Shortcode> {
        self.entries.get(name)
    }

    pub fn is_paired(&self, name: &str) -> bool {
        self.get(name).is_some_and(Shortcode::is_paired)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Render a template argument as text. `null` and missing arguments yield `None`.
pub fn arg_str(args: &[Value], idx: usize) -> Option<String> {
    match args.get(idx)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arg_str() {
        let args = [json!("a"), json!(3), Value::Null, json!(true)];
        assert_eq!(arg_str(&args, 0).as_deref(), Some("a"));
        assert_eq!(arg_str(&args, 1).as_deref(), Some("3"));
        assert_eq!(arg_str(&args, 2), None);
        assert_eq!(arg_str(&args, 3).as_deref(), Some("true"));
        assert_eq!(arg_str(&args, 9), None);
    }

    #[test]
    fn test_registry_kinds() {
        let mut registry = ShortcodeRegistry::new();
        registry.add_simple("youtube", |args| youtube(&arg_str(args, 0).unwrap_or_default()));
        registry.add_paired("figure", |content, args| figure(content, arg_str(args, 0).as_deref()));

        assert_eq!(registry.names(), ["figure", "youtube"]);
        assert!(registry.is_paired("figure"));
        assert!(!registry.is_paired("youtube"));
        assert!(!registry.is_paired("missing"));

        let Some(Shortcode::Paired(f)) = registry.get("figure") else {
            panic!("figure should be paired");
        };
        assert_eq!(f("<img>", &[Value::Null]).as_str(), "<figure><img></figure>");
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = ShortcodeRegistry::new();
        registry.add_simple("x", |_| Markup::raw("1"));
        registry.add_paired("x", |_, _| Markup::raw("2"));
        assert_eq!(registry.len(), 1);
        assert!(registry.is_paired("x"));
    }
}
