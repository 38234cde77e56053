//! Heading and path slugs.

use deunicode::deunicode;

/// Slugify text for use as a URL fragment.
///
/// Unicode is transliterated to ASCII, letters are lowercased and every run
/// of other characters collapses into a single `-`.
///
/// # Example
/// ```ignore
/// assert_eq!(slugify("Héllo, World!"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Getting   Started  "), "getting-started");
    }

    #[test]
    fn test_slugify_punctuation_and_unicode() {
        assert_eq!(slugify("Héllo, World!"), "hello-world");
        assert_eq!(slugify("What's new in v2.0?"), "what-s-new-in-v2-0");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
