//! Template filters: `{{ value | name }}`.
//!
//! Filters map one template value to another. The builtin date filters are
//! registered by site configuration; plugins add their own.

pub mod date;

pub use date::{INVALID_DATE, html_date_string, readable_date};

use rustc_hash::FxHashMap;
use serde_json::Value;

type FilterFn = dyn Fn(&Value) -> Value + Send + Sync;

/// Name → filter table, filled once at configuration time.
#[derive(Default)]
pub struct FilterRegistry {
    entries: FxHashMap<String, Box<FilterFn>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a filter.
    pub fn add<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Box::new(f));
    }

    /// Apply a filter by name. Returns `None` when no such filter exists.
    pub fn apply(&self, name: &str, value: &Value) -> Option<Value> {
        self.entries.get(name).map(|f| f(value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort_unstable();
        f.debug_struct("FilterRegistry").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_by_name() {
        let mut registry = FilterRegistry::new();
        registry.add("readableDate", |v| Value::String(readable_date(v)));

        assert!(registry.contains("readableDate"));
        assert_eq!(
            registry.apply("readableDate", &json!("2024-06-15")),
            Some(json!("June 15, 2024"))
        );
        assert_eq!(registry.apply("missing", &json!("x")), None);
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = FilterRegistry::new();
        registry.add("f", |_| json!(1));
        registry.add("f", |_| json!(2));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.apply("f", &Value::Null), Some(json!(2)));
    }
}
