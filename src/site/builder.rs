//! `SiteBuilder`: the registration surface plugins and `configure` use.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use super::{BuildContext, Site, site_globals};
use crate::config::{DirsConfig, FrontMatterConfig, PassthroughEntry, SiteInfoConfig};
use crate::filter::FilterRegistry;
use crate::markdown::{CodeHighlighter, MarkdownRenderer};
use crate::shortcode::{Markup, ShortcodeRegistry};

/// Runs once after every page has been written.
pub type AfterBuildHook = dyn Fn(&BuildContext<'_>) -> Result<()> + Send + Sync;

/// A bundle of registrations applied to a [`SiteBuilder`].
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn register(&self, site: &mut SiteBuilder) -> Result<()>;
}

/// Collects registrations, then freezes them into a [`Site`].
///
/// Later registrations under the same name replace earlier ones.
#[derive(Default)]
pub struct SiteBuilder {
    info: SiteInfoConfig,
    dirs: DirsConfig,
    front_matter: FrontMatterConfig,
    filters: FilterRegistry,
    shortcodes: ShortcodeRegistry,
    markdown: MarkdownRenderer,
    highlighter: Option<Arc<dyn CodeHighlighter>>,
    passthrough: Vec<PassthroughEntry>,
    hooks: Vec<(String, Box<AfterBuildHook>)>,
    plugins: Vec<&'static str>,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_site_info(&mut self, info: SiteInfoConfig) -> &mut Self {
        self.info = info;
        self
    }

    pub const fn site_info(&self) -> &SiteInfoConfig {
        &self.info
    }

    pub fn set_front_matter_options(&mut self, options: FrontMatterConfig) -> &mut Self {
        self.front_matter = options;
        self
    }

    pub fn add_plugin(&mut self, plugin: &dyn Plugin) -> Result<&mut Self> {
        crate::debug!("site"; "plugin {}", plugin.name());
        plugin
            .register(self)
            .with_context(|| format!("failed to register plugin '{}'", plugin.name()))?;
        self.plugins.push(plugin.name());
        Ok(self)
    }

    pub fn add_filter<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.filters.add(name, f);
        self
    }

    pub fn add_passthrough_copy(&mut self, entry: PassthroughEntry) -> &mut Self {
        self.passthrough.push(entry);
        self
    }

    /// Replace the Markdown renderer.
    pub fn set_library(&mut self, renderer: MarkdownRenderer) -> &mut Self {
        self.markdown = renderer;
        self
    }

    /// Highlighter attached to whichever renderer is set when building.
    pub fn set_highlighter(&mut self, highlighter: Arc<dyn CodeHighlighter>) -> &mut Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn add_shortcode<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Markup + Send + Sync + 'static,
    {
        self.shortcodes.add_simple(name, f);
        self
    }

    pub fn add_paired_shortcode<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&str, &[Value]) -> Markup + Send + Sync + 'static,
    {
        self.shortcodes.add_paired(name, f);
        self
    }

    pub fn set_dirs(&mut self, dirs: DirsConfig) -> &mut Self {
        self.dirs = dirs;
        self
    }

    pub fn add_after_build<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: Fn(&BuildContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.push((name.into(), Box::new(hook)));
        self
    }

    pub fn build(self) -> Site {
        let mut markdown = self.markdown;
        if let Some(highlighter) = self.highlighter {
            markdown.set_highlighter(highlighter);
        }
        let globals = site_globals(&self.info);

        Site {
            info: self.info,
            dirs: self.dirs,
            front_matter: self.front_matter,
            filters: self.filters,
            shortcodes: self.shortcodes,
            markdown,
            passthrough: self.passthrough,
            hooks: self.hooks,
            plugins: self.plugins,
            globals,
        }
    }
}
