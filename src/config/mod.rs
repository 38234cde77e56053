//! Site configuration management for `inkpot.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config discovery, path checks
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section               | Purpose                                       |
//! |-----------------------|-----------------------------------------------|
//! | `[site]`              | Site metadata (title, url, author, language)  |
//! | `[dirs]`              | Input, output, includes and layouts dirs      |
//! | `[front_matter]`      | Excerpt extraction                            |
//! | `[markdown]`          | html / breaks / linkify / heading anchors     |
//! | `[passthrough]`       | Files and directories copied verbatim         |
//! | `[plugins.feed]`      | RSS feed                                      |
//! | `[plugins.highlight]` | Build-time code highlighting                  |
//!
//! Every field has a default, so an empty file configures a working site.

pub mod section;
pub mod types;
pub(crate) mod util;

use util::find_config_file;

pub use section::{
    AnchorConfig, AnchorLevel, DirsConfig, FeedConfig, FrontMatterConfig, HighlightConfig,
    MarkdownConfig, PassthroughConfig, PassthroughEntry, PluginsConfig, SiteInfoConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{BuildArgs, Cli, Commands};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "inkpot.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing inkpot.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Per-run options from the command line (internal use only)
    #[serde(skip)]
    pub build: BuildFlags,

    pub site: SiteInfoConfig,
    pub dirs: DirsConfig,
    pub front_matter: FrontMatterConfig,
    pub markdown: MarkdownConfig,
    pub passthrough: PassthroughConfig,
    pub plugins: PluginsConfig,
}

/// Options that only exist for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildFlags {
    /// Remove the output directory before building.
    pub clean: bool,
    /// Render pages marked `draft: true`.
    pub drafts: bool,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For `build`, searches upward from cwd to find the config file; the
    /// project root is the config file's parent directory. For `init`, the
    /// defaults are used.
    pub fn load(cli: &Cli) -> Result<Self> {
        match &cli.command {
            Commands::Init { .. } => Ok(Self::default()),
            Commands::Build { build_args } => {
                let Some(config_path) = find_config_file(&cli.config) else {
                    return Err(ConfigError::Validation(format!(
                        "config file '{}' not found, run 'inkpot init' to create a new project",
                        cli.config.display()
                    ))
                    .into());
                };

                let mut config = Self::from_path(&config_path)?;
                config.validate_paths()?;

                let root = config_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                config.config_path = config_path;
                config.apply_build_args(build_args);
                config.normalize_paths(&root);
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        // Set verbose mode globally
        crate::logger::set_verbose(args.verbose);

        self.build.clean = args.clean;
        self.build.drafts = args.drafts;

        if let Some(output) = &args.output {
            self.dirs.output = output.clone();
        }
        if let Some(url) = &args.site_url {
            self.site.url = Some(url.clone());
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    pub fn normalize_paths(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);
        self.dirs.normalize(&root);
        self.passthrough.normalize(&root);
        self.root = root;
        // Note: plugins.feed.path stays relative; it is joined to the output dir at write time.
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before normalization.
    ///
    /// This must be called before `normalize_paths()` because normalization
    /// converts relative paths to absolute paths, making it impossible to
    /// detect if the user specified an absolute path in the config.
    pub fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.dirs.validate_paths(&mut diag);
        self.passthrough.validate_paths(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(self.plugins.feed.enable, &mut diag);
        self.front_matter.validate(&mut diag);
        self.markdown.validate(&mut diag);
        self.passthrough.validate(&mut diag);
        self.plugins.validate(&mut diag);

        if self.dirs.output == self.dirs.input {
            diag.error(
                DirsConfig::OUTPUT,
                "output directory cannot be the input directory",
            );
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!(
        "[site]\ntitle = \"Test\"\ndescription = \"Test\"\nurl = \"https://example.com\"\n{extra}"
    );
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
