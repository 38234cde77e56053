//! Values inside tags: literals, data paths and filter pipelines.

use serde_json::Value;

/// Split `s` on `is_sep` characters that are not inside a quoted string.
pub fn split_unquoted(s: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if is_sep(c) => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split shortcode arguments on commas and whitespace.
pub fn split_args(s: &str) -> Vec<&str> {
    split_unquoted(s, |c| c == ',' || c.is_whitespace())
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect()
}

/// Evaluate a single operand: a literal or a dotted path into `data`.
///
/// Returns `None` when the operand is malformed (e.g. an unterminated string).
pub fn eval_operand(operand: &str, data: &Value) -> Option<Value> {
    let operand = operand.trim();
    if operand.is_empty() {
        return None;
    }

    if let Some(quote) = operand.chars().next().filter(|c| *c == '"' || *c == '\'') {
        return parse_string_literal(operand, quote).map(Value::String);
    }

    match operand {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "null" | "none" | "undefined" => return Some(Value::Null),
        _ => {}
    }

    if operand.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return serde_json::from_str::<serde_json::Number>(operand)
            .ok()
            .map(Value::Number);
    }

    is_path(operand).then(|| lookup(data, operand))
}

fn parse_string_literal(s: &str, quote: char) -> Option<String> {
    let inner = s.strip_prefix(quote)?.strip_suffix(quote)?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                other => out.push(other),
            }
        } else if c == quote {
            // An unescaped quote inside means two literals were glued together
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn is_path(s: &str) -> bool {
    s.split('.').all(|seg| {
        !seg.is_empty()
            && seg
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '$')
    })
}

/// Resolve `a.b.0.c` against `data`. Missing segments yield `null`.
pub fn lookup(data: &Value, path: &str) -> Value {
    let mut current = data;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

/// Text form of a value for output.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
