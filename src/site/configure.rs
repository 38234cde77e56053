//! The site's wiring: what a default `inkpot.toml` turns into.

use anyhow::Result;
use serde_json::Value;

use super::{Site, SiteBuilder};
use crate::config::SiteConfig;
use crate::filter::{html_date_string, readable_date};
use crate::markdown::MarkdownRenderer;
use crate::plugin::{FeedPlugin, SyntaxHighlightPlugin};
use crate::shortcode::{arg_str, figure, note, stream, youtube};

/// Build the [`Site`] for a loaded configuration.
pub fn configure(config: &SiteConfig) -> Result<Site> {
    let mut site = Site::builder();

    site.set_site_info(config.site.clone())
        .set_front_matter_options(config.front_matter.clone());

    if config.plugins.feed.enable {
        site.add_plugin(&FeedPlugin::new(config.plugins.feed.clone()))?;
    }
    if config.plugins.highlight.enable {
        site.add_plugin(&SyntaxHighlightPlugin::new(&config.plugins.highlight.theme))?;
    }

    register_filters(&mut site);

    for entry in &config.passthrough.copy {
        site.add_passthrough_copy(entry.clone());
    }

    site.set_library(MarkdownRenderer::from_config(&config.markdown));

    register_shortcodes(&mut site);

    site.set_dirs(config.dirs.clone());

    let site = site.build();
    crate::debug!(
        "site";
        "{} filters, shortcodes: {}",
        site.filters().len(),
        site.shortcodes().names().join(", ")
    );
    Ok(site)
}

/// `readableDate` and `htmlDateString`.
pub fn register_filters(site: &mut SiteBuilder) {
    site.add_filter("readableDate", |v| Value::String(readable_date(v)))
        .add_filter("htmlDateString", |v| Value::String(html_date_string(v)));
}

/// `youtube`, `stream` and `note`, plus the paired `figure`.
pub fn register_shortcodes(site: &mut SiteBuilder) {
    site.add_shortcode("youtube", |args| youtube(&arg_str(args, 0).unwrap_or_default()))
        .add_shortcode("stream", |args| stream(&arg_str(args, 0).unwrap_or_default()))
        .add_shortcode("note", |args| {
            let content = arg_str(args, 0).unwrap_or_default();
            note(&content, arg_str(args, 1).as_deref())
        })
        .add_paired_shortcode("figure", |content, args| {
            figure(content, arg_str(args, 0).as_deref())
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnchorLevel, PassthroughEntry};
    use crate::shortcode::Shortcode;
    use serde_json::json;

    fn default_site() -> Site {
        let mut config = SiteConfig::default();
        config.site.url = Some("https://example.com".into());
        configure(&config).unwrap()
    }

    #[test]
    fn test_default_wiring() {
        let site = default_site();

        assert_eq!(site.plugins(), ["feed", "syntax-highlight"]);
        assert_eq!(site.shortcodes().names(), ["figure", "note", "stream", "youtube"]);
        assert!(site.shortcodes().is_paired("figure"));
        for name in ["readableDate", "htmlDateString", "absoluteUrl", "dateToRfc2822", "dateToRfc3339"] {
            assert!(site.filters().contains(name), "missing filter {name}");
        }

        let options = site.markdown().options();
        assert!(options.html && options.breaks && options.linkify);
        assert_eq!(site.markdown().anchor().level, AnchorLevel::List(vec![1, 2, 3]));
        assert!(!site.markdown().anchor().permalink);

        assert_eq!(site.dirs().includes, site.dirs().layouts);
        assert_eq!(site.passthrough(), [PassthroughEntry::simple("assets")]);
        assert!(site.front_matter().excerpt);
    }

    #[test]
    fn test_only_figure_is_paired() {
        let site = default_site();
        let paired: Vec<&str> = site
            .shortcodes()
            .names()
            .into_iter()
            .filter(|name| site.shortcodes().is_paired(name))
            .collect();
        assert_eq!(paired, ["figure"]);
    }

    #[test]
    fn test_note_can_be_replaced_by_block_form() {
        let mut builder = Site::builder();
        register_shortcodes(&mut builder);
        builder.add_paired_shortcode("note", |content, args| {
            note(content.trim(), arg_str(args, 0).as_deref())
        });
        let site = builder.build();

        let Some(Shortcode::Paired(f)) = site.shortcodes().get("note") else {
            panic!("note should now be paired");
        };
        assert_eq!(
            f("\nline one\nline two\n", &[json!("alert")]),
            note("line one\nline two", Some("alert"))
        );
    }

    #[test]
    fn test_disabled_plugins_are_skipped() {
        let mut config = SiteConfig::default();
        config.plugins.feed.enable = false;
        config.plugins.highlight.enable = false;
        let site = configure(&config).unwrap();

        assert!(site.plugins().is_empty());
        assert!(!site.filters().contains("absoluteUrl"));
        assert!(site.filters().contains("readableDate"));
    }

    #[test]
    fn test_unknown_theme_fails() {
        let mut config = SiteConfig::default();
        config.plugins.highlight.theme = "nope".into();
        let err = configure(&config).unwrap_err();
        assert!(err.to_string().contains("syntax-highlight"));
    }

    #[test]
    fn test_registered_note_defaults_to_info() {
        let site = default_site();
        let Some(Shortcode::Simple(f)) = site.shortcodes().get("note") else {
            panic!("note should be simple");
        };
        assert_eq!(f(&[json!("hi")]), note("hi", None));
        assert_eq!(f(&[json!("hi"), json!("alert")]), note("hi", Some("alert")));
        assert!(f(&[json!("hi")]).as_str().starts_with("<aside class=\"note info\">"));
    }

    #[test]
    fn test_registered_figure_caption() {
        let site = default_site();
        let Some(Shortcode::Paired(f)) = site.shortcodes().get("figure") else {
            panic!("figure should be paired");
        };
        assert_eq!(f("<img>", &[]).as_str(), "<figure><img></figure>");
        assert_eq!(
            f("<img>", &[json!("Cap")]).as_str(),
            "<figure><img><figcaption>Cap</figcaption></figure>"
        );
    }

    #[test]
    fn test_registered_date_filter() {
        let site = default_site();
        assert_eq!(
            site.filters().apply("readableDate", &json!("2024-06-15T23:30:00-05:00")),
            Some(json!("June 16, 2024"))
        );
    }
}
