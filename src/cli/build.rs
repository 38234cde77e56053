//! Site building orchestration.
//!
//! Build pipeline phases:
//! - **Prepare** - create (or with `--clean`, empty) the output directory
//! - **Collect** - find page sources, skipping output/includes/layouts/passthrough
//! - **Load** - parse front matter in parallel, drop drafts
//! - **Render** - templates, Markdown and layouts in parallel, write each page
//! - **Passthrough** - copy static files and directories
//! - **Hooks** - after-build hooks registered by plugins (feed)

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::{
    config::{BuildFlags, SiteConfig},
    debug, log,
    page::{Page, scan_pages},
    passthrough,
    site::{RenderedPage, Site, configure},
    utils::{path::to_slash, plural_count},
};

/// Counts reported at the end of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages written to the output.
    pub written: usize,
    /// Pages rendered but not written (`permalink: false`).
    pub unwritten: usize,
    pub drafts_skipped: usize,
    /// Files copied by passthrough rules.
    pub copied: usize,
}

/// `inkpot build`
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let started = Instant::now();
    let site = configure(config)?;
    let report = build_with(&site, config.build)?;

    if report.drafts_skipped > 0 {
        log!("build"; "{} skipped", plural_count(report.drafts_skipped, "draft"));
    }
    log!(
        "done";
        "{}, {} copied in {:.2?}",
        plural_count(report.written, "page"),
        plural_count(report.copied, "file"),
        started.elapsed()
    );
    Ok(report)
}

/// Run the pipeline for an already configured site.
pub fn build_with(site: &Site, flags: BuildFlags) -> Result<BuildReport> {
    let output = &site.dirs().output;
    prepare_output(output, flags.clean)?;

    let sources = collect_sources(site);
    debug!("build"; "{} found", plural_count(sources.len(), "source"));

    let loaded = sources
        .par_iter()
        .map(|path| site.load_page(path))
        .collect::<Result<Vec<_>>>()?;
    let total = loaded.len();
    let pages: Vec<Page> = loaded
        .into_iter()
        .filter(|page| flags.drafts || !page.is_draft())
        .collect();
    let drafts_skipped = total - pages.len();

    check_output_conflicts(&pages)?;

    let rendered = pages
        .into_par_iter()
        .map(|page| {
            let rendered = site.render_page(page)?;
            write_page(output, &rendered)?;
            Ok(rendered)
        })
        .collect::<Result<Vec<_>>>()?;

    let copied = passthrough::copy_all(site.passthrough(), output)?;
    site.run_after_build(&rendered)?;

    let written = rendered.iter().filter(|r| r.page.route.is_some()).count();
    Ok(BuildReport {
        written,
        unwritten: rendered.len() - written,
        drafts_skipped,
        copied,
    })
}

fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        debug!("build"; "cleaning {}", output.display());
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clean {}", output.display()))?;
    }
    fs::create_dir_all(output).with_context(|| format!("failed to create {}", output.display()))
}

/// Page sources under the input dir, minus every directory with another role.
fn collect_sources(site: &Site) -> Vec<PathBuf> {
    let dirs = site.dirs();
    let mut excluded: Vec<&Path> = vec![&dirs.output, &dirs.includes, &dirs.layouts];
    excluded.extend(site.passthrough().iter().map(|entry| entry.source()));
    scan_pages(&dirs.input, &excluded)
}

/// Two pages may not write the same file.
fn check_output_conflicts(pages: &[Page]) -> Result<()> {
    let mut seen: FxHashMap<&Path, &Path> = FxHashMap::default();
    for page in pages {
        let Some(route) = &page.route else { continue };
        if let Some(previous) = seen.insert(&route.output_file, &page.source) {
            bail!(
                "output conflict: '{}' and '{}' both write '{}'",
                to_slash(previous),
                to_slash(&page.source),
                to_slash(&route.output_file)
            );
        }
    }
    Ok(())
}

fn write_page(output: &Path, rendered: &RenderedPage) -> Result<()> {
    let Some(route) = &rendered.page.route else {
        debug!("build"; "{} has no permalink, not written", rendered.page.source.display());
        return Ok(());
    };

    let path = output.join(&route.output_file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &rendered.html).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("build"; "{} -> {}", to_slash(&rendered.page.source), route.url);
    Ok(())
}
