//! `[passthrough]` section: files and directories copied verbatim.
//!
//! ```toml
//! [passthrough]
//! copy = [
//!     "assets",                            # assets/ → _site/assets/
//!     { dir = "static/img", as = "img" },  # static/img/ → _site/img/
//!     "robots.txt",                        # → _site/robots.txt
//! ]
//! ```

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::util::unsafe_path_reason;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PassthroughConfig {
    pub copy: Vec<PassthroughEntry>,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            copy: vec![PassthroughEntry::Simple("assets".into())],
        }
    }
}

impl PassthroughConfig {
    pub const COPY: FieldPath = FieldPath::new("passthrough.copy");

    /// Validate path safety before normalization.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        let total = self.copy.len();
        for (idx, entry) in self.copy.iter().enumerate() {
            // Only show index if there are multiple entries
            let prefix = if total > 1 {
                format!("[{idx}] ")
            } else {
                String::new()
            };

            if let Some(reason) = unsafe_path_reason(entry.source()) {
                diag.error(
                    Self::COPY,
                    format!("{prefix}path '{}': {reason}", entry.source().display()),
                );
            }
            if let Some(reason) = unsafe_path_reason(&entry.target()) {
                diag.error(
                    Self::COPY,
                    format!("{prefix}target '{}': {reason}", entry.target().display()),
                );
            }
        }
    }

    /// Report entries that would write to the same output location.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let mut seen: FxHashMap<PathBuf, usize> = FxHashMap::default();
        for (idx, entry) in self.copy.iter().enumerate() {
            let target = entry.target();
            if let Some(prev) = seen.get(&target) {
                diag.error(
                    Self::COPY,
                    format!(
                        "[{idx}] output conflict: entries {prev} and {idx} both copy to '/{}'",
                        target.display()
                    ),
                );
            } else {
                seen.insert(target, idx);
            }
        }
    }

    /// Normalize source paths relative to the project root.
    pub fn normalize(&mut self, root: &Path) {
        for entry in &mut self.copy {
            entry.normalize(root);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PassthroughEntry {
    /// Copied to the same relative path in the output.
    Simple(PathBuf),
    /// Copied to `as` inside the output.
    Full {
        dir: PathBuf,
        #[serde(rename = "as")]
        output_as: Option<PathBuf>,
    },
}

impl PassthroughEntry {
    pub fn source(&self) -> &Path {
        match self {
            Self::Simple(p) => p,
            Self::Full { dir, .. } => dir,
        }
    }

    /// Output location relative to the output directory.
    ///
    /// Before normalization this is the source path itself; afterwards the
    /// `as` rename or the source's file name.
    pub fn target(&self) -> PathBuf {
        match self {
            Self::Full {
                output_as: Some(target),
                ..
            } => target.clone(),
            Self::Simple(p) | Self::Full { dir: p, .. } if p.is_absolute() => p
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_default(),
            Self::Simple(p) | Self::Full { dir: p, .. } => p.clone(),
        }
    }

    #[cfg(test)]
    pub fn simple(path: impl Into<PathBuf>) -> Self {
        Self::Simple(path.into())
    }

    #[cfg(test)]
    pub fn with_as(dir: impl Into<PathBuf>, output_as: impl Into<PathBuf>) -> Self {
        Self::Full {
            dir: dir.into(),
            output_as: Some(output_as.into()),
        }
    }

    fn normalize(&mut self, root: &Path) {
        match self {
            Self::Simple(p) => {
                *self = Self::Full {
                    dir: normalize_path(&root.join(&*p)),
                    output_as: Some(p.clone()),
                };
            }
            Self::Full { dir, output_as } => {
                if output_as.is_none() {
                    *output_as = Some(dir.clone());
                }
                *dir = normalize_path(&root.join(&*dir));
            }
        }
    }
}
