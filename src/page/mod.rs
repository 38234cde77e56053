//! Page types: front matter, metadata, routing and discovery.

pub mod front_matter;
mod meta;
mod route;
mod scan;

pub use front_matter::{FrontMatter, FrontMatterError};
pub use meta::{PageMeta, Permalink};
pub use route::PageRoute;
pub use scan::{PageFormat, scan_pages};

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

use crate::config::FrontMatterConfig;
use crate::filter::date::parse_date_value;
use crate::log;
use crate::utils::date::DateTimeUtc;
use crate::utils::path::to_slash;

/// A JSON object map for storing arbitrary metadata fields.
pub type JsonMap = serde_json::Map<String, Value>;

/// One content file, parsed and routed but not yet rendered.
#[derive(Debug, Clone)]
pub struct Page {
    /// Absolute source path.
    pub input_path: PathBuf,
    /// Source path relative to the input directory.
    pub source: PathBuf,
    pub format: PageFormat,
    /// `None` when `permalink: false`.
    pub route: Option<PageRoute>,
    /// File name without extension; the directory name for `index` files.
    pub file_slug: String,
    /// From front matter, else the file's modification time.
    pub date: DateTimeUtc,
    pub meta: PageMeta,
    /// Complete front matter, including keys not in `meta`.
    pub data: JsonMap,
    pub excerpt: Option<String>,
    pub body: String,
}

impl Page {
    /// Read and parse `path`, which lives under `input_dir`.
    pub fn load(path: &Path, input_dir: &Path, options: &FrontMatterConfig) -> Result<Self> {
        let format = PageFormat::from_path(path)
            .with_context(|| format!("not a page: {}", path.display()))?;
        let source_text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let parsed = front_matter::parse(&source_text, options)?;
        let meta = PageMeta::from_data(&parsed.data).context("invalid front matter")?;

        let source = path.strip_prefix(input_dir).unwrap_or(path).to_path_buf();
        let route = match &meta.permalink {
            Some(Permalink::Enabled(false)) => None,
            Some(Permalink::Path(permalink)) => match PageRoute::from_permalink(permalink) {
                Some(route) => Some(route),
                None => bail!("permalink '{permalink}' points outside the output directory"),
            },
            Some(Permalink::Enabled(true)) | None => Some(PageRoute::from_source(&source)),
        };

        // An unreadable date keeps its raw value in `data`, where the date
        // filters render it as `Invalid Date`.
        let date = match meta.date.as_ref().map(|value| (value, parse_date_value(value))) {
            Some((_, Some(date))) => date,
            Some((value, None)) => {
                log!("warning"; "{}: invalid date {}, using modification time", to_slash(&source), value);
                modified_date(path)?
            }
            None => modified_date(path)?,
        };

        Ok(Self {
            input_path: path.to_path_buf(),
            file_slug: file_slug(&source),
            source,
            format,
            route,
            date,
            meta,
            data: parsed.data,
            excerpt: parsed.excerpt,
            body: parsed.body,
        })
    }

    pub fn url(&self) -> Option<&str> {
        self.route.as_ref().map(|r| r.url.as_str())
    }

    pub fn is_draft(&self) -> bool {
        self.meta.draft
    }

    pub fn title(&self) -> &str {
        self.meta.title.as_deref().unwrap_or_default()
    }

    /// Template data: front matter over `globals`, plus a `page` object.
    pub fn template_data(&self, globals: &JsonMap) -> Value {
        let mut data = globals.clone();
        for (key, value) in &self.data {
            data.insert(key.clone(), value.clone());
        }
        data.insert(
            "page".into(),
            json!({
                "url": self.url(),
                "fileSlug": self.file_slug,
                "filePathStem": format!("/{}", to_slash(&self.source.with_extension(""))),
                "inputPath": to_slash(&self.source),
                "outputPath": self.route.as_ref().map(|r| to_slash(&r.output_file)),
                "date": self.date.to_rfc3339(),
                "excerpt": self.excerpt,
            }),
        );
        Value::Object(data)
    }
}

fn file_slug(source: &Path) -> String {
    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if stem != "index" {
        return stem.to_string();
    }
    source
        .parent()
        .and_then(Path::file_name)
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn modified_date(path: &Path) -> Result<DateTimeUtc> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("failed to read modification time of {}", path.display()))?;
    let secs = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default();
    DateTimeUtc::from_unix_seconds(secs).context("modification time out of range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load(rel: &str, content: &str) -> Result<Page> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        Page::load(&path, dir.path(), &FrontMatterConfig::default())
    }

    #[test]
    fn test_load_markdown_post() {
        let page = load(
            "posts/hello.md",
            "---\ntitle: Hello\ndate: 2024-06-15\ntags: posts\n---\nIntro\n<!-- excerpt -->\nRest\n",
        )
        .unwrap();

        assert_eq!(page.format, PageFormat::Markdown);
        assert_eq!(page.url(), Some("/posts/hello/"));
        assert_eq!(page.file_slug, "hello");
        assert_eq!(page.date, DateTimeUtc::from_ymd(2024, 6, 15));
        assert_eq!(page.title(), "Hello");
        assert!(page.meta.has_tag("posts"));
        assert_eq!(page.excerpt.as_deref(), Some("Intro"));
        assert_eq!(page.body, "Intro\nRest\n");
    }

    #[test]
    fn test_index_file_slug() {
        let page = load("blog/index.html", "<h1>Blog</h1>").unwrap();
        assert_eq!(page.format, PageFormat::Html);
        assert_eq!(page.file_slug, "blog");
        assert_eq!(page.url(), Some("/blog/"));
    }

    #[test]
    fn test_permalink_false_has_no_route() {
        let page = load("secret.md", "---\npermalink: false\n---\n").unwrap();
        assert!(page.route.is_none());
        assert!(page.url().is_none());
    }

    #[test]
    fn test_bad_permalink_rejected() {
        assert!(load("a.md", "---\npermalink: ../../x/\n---\n").is_err());
    }

    #[test]
    fn test_bad_date_falls_back_to_mtime() {
        let page = load("a.md", "---\ndate: someday\n---\n").unwrap();
        assert!(page.date.year >= 2020);
        assert_eq!(page.data["date"], "someday");
    }

    #[test]
    fn test_missing_date_uses_mtime() {
        let page = load("a.md", "no front matter").unwrap();
        assert!(page.date.year >= 2020);
    }

    #[test]
    fn test_template_data() {
        let page = load("about.md", "---\ntitle: About\nsite: override\n---\n").unwrap();
        let mut globals = JsonMap::new();
        globals.insert("site".into(), json!({"title": "Inkpot"}));
        globals.insert("other".into(), json!(1));

        let data = page.template_data(&globals);
        assert_eq!(data["title"], "About");
        assert_eq!(data["site"], "override");
        assert_eq!(data["other"], 1);
        assert_eq!(data["page"]["url"], "/about/");
        assert_eq!(data["page"]["fileSlug"], "about");
        assert_eq!(data["page"]["filePathStem"], "/about");
        assert_eq!(data["page"]["outputPath"], "about/index.html");
    }
}
