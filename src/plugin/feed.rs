//! RSS 2.0 feed plugin.
//!
//! Registers the feed filters and an after-build hook that writes the
//! newest pages of one collection to `plugins.feed.path`.

use std::fs;

use anyhow::{Context, Result, anyhow};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use serde_json::Value;
use url::Url;

use crate::config::FeedConfig;
use crate::filter::INVALID_DATE;
use crate::filter::date::parse_date_value;
use crate::log;
use crate::site::{BuildContext, Plugin, RenderedPage, SiteBuilder};
use crate::utils::date::DateTimeUtc;

pub struct FeedPlugin {
    config: FeedConfig,
}

impl FeedPlugin {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }
}

impl Plugin for FeedPlugin {
    fn name(&self) -> &'static str {
        "feed"
    }

    fn register(&self, site: &mut SiteBuilder) -> Result<()> {
        let base = site
            .site_info()
            .url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .context("invalid site url")?;

        site.add_filter("absoluteUrl", move |v| absolute_url(base.as_ref(), v))
            .add_filter("dateToRfc2822", |v| date_with(v, DateTimeUtc::to_rfc2822))
            .add_filter("dateToRfc3339", |v| date_with(v, DateTimeUtc::to_rfc3339));

        let config = self.config.clone();
        site.add_after_build("feed", move |ctx| write_feed(ctx, &config));
        Ok(())
    }
}

/// `absoluteUrl`: resolve a path against the site url. Without a site url
/// (or for input that does not resolve) the value is returned unchanged.
fn absolute_url(base: Option<&Url>, value: &Value) -> Value {
    let Some(path) = value.as_str() else {
        return value.clone();
    };
    match base.map(|base| base.join(path)) {
        Some(Ok(url)) => Value::String(url.into()),
        _ => value.clone(),
    }
}

fn date_with(value: &Value, format: fn(DateTimeUtc) -> String) -> Value {
    let text = parse_date_value(value).map_or_else(|| INVALID_DATE.to_string(), format);
    Value::String(text)
}

/// Pages tagged with the collection, newest first, at most `limit`.
fn feed_pages<'a>(pages: &'a [RenderedPage], config: &FeedConfig) -> Vec<&'a RenderedPage> {
    let mut selected: Vec<_> = pages
        .iter()
        .filter(|p| p.page.route.is_some() && p.page.meta.has_tag(&config.collection))
        .collect();
    selected.sort_by(|a, b| {
        b.page
            .date
            .cmp(&a.page.date)
            .then_with(|| a.page.url().cmp(&b.page.url()))
    });
    selected.truncate(config.limit);
    selected
}

fn build_channel(ctx: &BuildContext<'_>, config: &FeedConfig) -> Result<rss::Channel> {
    let info = ctx.site.info();
    let base = Url::parse(info.url.as_deref().unwrap_or_default())
        .context("the feed needs an absolute site url")?;

    let pages = feed_pages(ctx.pages, config);
    let items = pages
        .iter()
        .map(|p| page_to_item(p, &base))
        .collect::<Result<Vec<_>>>()?;
    let last_build = pages.first().map(|p| p.page.date.to_rfc2822());

    let channel = ChannelBuilder::default()
        .title(&info.title)
        .link(base.as_str())
        .description(&info.description)
        .language(Some(info.language.clone()))
        .generator(Some(format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))))
        .last_build_date(last_build)
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
    Ok(channel)
}

fn page_to_item(rendered: &RenderedPage, base: &Url) -> Result<rss::Item> {
    let page = &rendered.page;
    let url = page.url().unwrap_or("/");
    let link = base
        .join(url)
        .with_context(|| format!("cannot build feed link for '{url}'"))?
        .to_string();

    Ok(ItemBuilder::default()
        .title(Some(page.title().to_string()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(rendered.content.clone()))
        .pub_date(Some(page.date.to_rfc2822()))
        .build())
}

fn write_feed(ctx: &BuildContext<'_>, config: &FeedConfig) -> Result<()> {
    let xml = build_channel(ctx, config)?.to_string();
    let path = ctx.site.dirs().output.join(&config.path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, xml).with_context(|| format!("failed to write {}", path.display()))?;

    log!("feed"; "{}", config.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DirsConfig, SiteInfoConfig};
    use crate::page::Page;
    use crate::site::Site;
    use serde_json::json;

    fn site(url: Option<&str>, output: &std::path::Path) -> Site {
        let mut builder = SiteBuilder::new();
        builder
            .set_site_info(SiteInfoConfig {
                title: "Inkpot".into(),
                description: "Notes".into(),
                url: url.map(str::to_string),
                ..SiteInfoConfig::default()
            })
            .set_dirs(DirsConfig {
                output: output.to_path_buf(),
                ..DirsConfig::default()
            });
        builder.add_plugin(&FeedPlugin::new(FeedConfig::default())).unwrap();
        builder.build()
    }

    fn rendered(dir: &std::path::Path, name: &str, front: &str) -> RenderedPage {
        let path = dir.join(name);
        fs::write(&path, format!("---\n{front}\n---\nBody of {name}")).unwrap();
        let page = Page::load(&path, dir, &Default::default()).unwrap();
        RenderedPage {
            content: format!("<p>{}</p>", page.title()),
            html: String::new(),
            page,
        }
    }

    #[test]
    fn test_filters() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(Some("https://example.com/blog/"), dir.path());
        let filters = site.filters();

        assert_eq!(
            filters.apply("absoluteUrl", &json!("/posts/a/")),
            Some(json!("https://example.com/posts/a/"))
        );
        assert_eq!(
            filters.apply("absoluteUrl", &json!("posts/a/")),
            Some(json!("https://example.com/blog/posts/a/"))
        );
        assert_eq!(
            filters.apply("dateToRfc2822", &json!("2024-06-15T14:30:45Z")),
            Some(json!("Sat, 15 Jun 2024 14:30:45 GMT"))
        );
        assert_eq!(
            filters.apply("dateToRfc3339", &json!("2024-06-15")),
            Some(json!("2024-06-15T00:00:00Z"))
        );
        assert_eq!(filters.apply("dateToRfc3339", &json!("nope")), Some(json!("Invalid Date")));
    }

    #[test]
    fn test_absolute_url_without_base() {
        assert_eq!(absolute_url(None, &json!("/a/")), json!("/a/"));
        assert_eq!(absolute_url(None, &json!(3)), json!(3));
    }

    #[test]
    fn test_feed_selection_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![
            rendered(dir.path(), "old.md", "title: Old\ndate: 2023-01-01\ntags: posts"),
            rendered(dir.path(), "about.md", "title: About\ndate: 2025-01-01"),
            rendered(dir.path(), "new.md", "title: New\ndate: 2024-06-15\ntags: [posts]"),
            rendered(dir.path(), "hidden.md", "title: Hidden\ndate: 2024-01-01\ntags: posts\npermalink: false"),
        ];

        let config = FeedConfig {
            limit: 1,
            ..FeedConfig::default()
        };
        let titles: Vec<_> = feed_pages(&pages, &config)
            .iter()
            .map(|p| p.page.title())
            .collect();
        assert_eq!(titles, ["New"]);

        let titles: Vec<_> = feed_pages(&pages, &FeedConfig::default())
            .iter()
            .map(|p| p.page.title())
            .collect();
        assert_eq!(titles, ["New", "Old"]);
    }

    #[test]
    fn test_write_feed() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("_site");
        let site = site(Some("https://example.com"), &output);
        let pages = vec![rendered(
            dir.path(),
            "hello.md",
            "title: Hello\ndate: 2024-06-15\ntags: posts",
        )];

        site.run_after_build(&pages).unwrap();

        let xml = fs::read_to_string(output.join("feed.xml")).unwrap();
        assert!(xml.contains("<title>Inkpot</title>"));
        assert!(xml.contains("<link>https://example.com/hello/</link>"));
        assert!(xml.contains("<pubDate>Sat, 15 Jun 2024 00:00:00 GMT</pubDate>"));
        assert!(xml.contains("https://example.com/hello/</guid>"));
    }

    #[test]
    fn test_feed_requires_site_url() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(None, dir.path());
        assert!(site.run_after_build(&[]).is_err());
    }
}
