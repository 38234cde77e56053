//! The explicit site: every registry the renderer uses, built once.
//!
//! ```text
//! SiteConfig ──configure()──► SiteBuilder ──build()──► Site (immutable)
//!                                 ▲                      │
//!                     plugins register here      shared by the page workers
//! ```
//!
//! Nothing here is global: the build pipeline receives `&Site` and every
//! filter, shortcode and hook is `Send + Sync`, so pages render in parallel.

mod builder;
mod configure;

pub use builder::{AfterBuildHook, Plugin, SiteBuilder};
pub use configure::{configure, register_filters, register_shortcodes};

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::config::{DirsConfig, FrontMatterConfig, PassthroughEntry, SiteInfoConfig};
use crate::filter::FilterRegistry;
use crate::markdown::MarkdownRenderer;
use crate::page::{JsonMap, Page, PageFormat};
use crate::shortcode::ShortcodeRegistry;
use crate::template::TemplateEnv;

/// A page after template expansion, Markdown and layouts.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: Page,
    /// Body alone, before layouts are applied.
    pub content: String,
    /// Full document.
    pub html: String,
}

/// What after-build hooks get to see.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub site: &'a Site,
    /// Every rendered page, in source order.
    pub pages: &'a [RenderedPage],
}

pub struct Site {
    info: SiteInfoConfig,
    dirs: DirsConfig,
    front_matter: FrontMatterConfig,
    filters: FilterRegistry,
    shortcodes: ShortcodeRegistry,
    markdown: MarkdownRenderer,
    passthrough: Vec<PassthroughEntry>,
    hooks: Vec<(String, Box<AfterBuildHook>)>,
    plugins: Vec<&'static str>,
    globals: JsonMap,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("info", &self.info)
            .field("dirs", &self.dirs)
            .field("filters", &self.filters)
            .field("shortcodes", &self.shortcodes.names())
            .field("markdown", &self.markdown)
            .field("passthrough", &self.passthrough)
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}

impl Site {
    pub fn builder() -> SiteBuilder {
        SiteBuilder::new()
    }

    pub const fn info(&self) -> &SiteInfoConfig {
        &self.info
    }

    /// Directory mapping, including the `includes` and `layouts` roles.
    pub const fn dirs(&self) -> &DirsConfig {
        &self.dirs
    }

    pub const fn front_matter(&self) -> &FrontMatterConfig {
        &self.front_matter
    }

    pub const fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    pub const fn shortcodes(&self) -> &ShortcodeRegistry {
        &self.shortcodes
    }

    pub const fn markdown(&self) -> &MarkdownRenderer {
        &self.markdown
    }

    pub fn passthrough(&self) -> &[PassthroughEntry] {
        &self.passthrough
    }

    /// Names of the registered plugins, in registration order.
    pub fn plugins(&self) -> &[&'static str] {
        &self.plugins
    }

    /// Data visible to every template (`site.*`).
    pub const fn globals(&self) -> &JsonMap {
        &self.globals
    }

    pub fn template_env(&self) -> TemplateEnv<'_> {
        TemplateEnv {
            filters: &self.filters,
            shortcodes: &self.shortcodes,
            includes: &self.dirs.includes,
            layouts: &self.dirs.layouts,
        }
    }

    /// Read and parse a content file under the input directory.
    pub fn load_page(&self, path: &Path) -> Result<Page> {
        Page::load(path, &self.dirs.input, &self.front_matter)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    /// Expand templates, render Markdown, then apply layouts.
    pub fn render_page(&self, page: Page) -> Result<RenderedPage> {
        let env = self.template_env();
        let data = page.template_data(&self.globals);
        let context = || format!("failed to render {}", page.input_path.display());

        let expanded = env.render(&page.body, &data).with_context(context)?;
        let content = match page.format {
            PageFormat::Markdown => self.markdown.render(&expanded),
            PageFormat::Html => expanded,
        };
        let html = env
            .apply_layouts(page.meta.layout.as_deref(), content.clone(), &data)
            .with_context(context)?;

        Ok(RenderedPage {
            page,
            content,
            html,
        })
    }

    /// Run after-build hooks in registration order.
    pub fn run_after_build(&self, pages: &[RenderedPage]) -> Result<()> {
        let ctx = BuildContext { site: self, pages };
        for (name, hook) in &self.hooks {
            crate::debug!("hook"; "running {}", name);
            hook(&ctx).with_context(|| format!("after-build hook '{name}' failed"))?;
        }
        Ok(())
    }
}

/// `site.*` template globals.
fn site_globals(info: &SiteInfoConfig) -> JsonMap {
    let mut globals = JsonMap::new();
    globals.insert(
        "site".into(),
        json!({
            "title": info.title,
            "description": info.description,
            "url": info.url.as_deref().map(|_| info.base_url()),
            "language": info.language,
            "author": info.author,
        }),
    );
    globals.insert("generator".into(), Value::String(generator()));
    globals
}

fn generator() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
