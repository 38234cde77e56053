//! `[dirs]` section: where content is read from and written to.
//!
//! ```toml
//! [dirs]
//! input = "."
//! output = "_site"
//! includes = "_includes"   # relative to input
//! layouts = "_includes"    # relative to input
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::util::unsafe_path_reason;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DirsConfig {
    /// Content root, relative to the project root.
    pub input: PathBuf,
    /// Build output, relative to the project root.
    pub output: PathBuf,
    /// Partials for `{% include %}`, relative to `input`.
    pub includes: PathBuf,
    /// Layout templates, relative to `input`.
    pub layouts: PathBuf,
}

impl Default for DirsConfig {
    fn default() -> Self {
        Self {
            input: ".".into(),
            output: "_site".into(),
            includes: "_includes".into(),
            layouts: "_includes".into(),
        }
    }
}

impl DirsConfig {
    pub const INPUT: FieldPath = FieldPath::new("dirs.input");
    pub const OUTPUT: FieldPath = FieldPath::new("dirs.output");
    pub const INCLUDES: FieldPath = FieldPath::new("dirs.includes");
    pub const LAYOUTS: FieldPath = FieldPath::new("dirs.layouts");

    /// Validate path safety before normalization.
    ///
    /// MUST be called before `normalize()`; afterwards every path is absolute.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        for (field, path) in [
            (Self::INPUT, &self.input),
            (Self::OUTPUT, &self.output),
            (Self::INCLUDES, &self.includes),
            (Self::LAYOUTS, &self.layouts),
        ] {
            if let Some(reason) = unsafe_path_reason(path) {
                diag.error(field, format!("path '{}': {reason}", path.display()));
            }
        }

        if self.output.as_os_str().is_empty() || self.output == Path::new(".") {
            diag.error_with_hint(
                Self::OUTPUT,
                "output directory cannot be the project root",
                "use a subdirectory such as `_site`",
            );
        }
    }

    /// Resolve every directory to an absolute path.
    pub fn normalize(&mut self, root: &Path) {
        self.input = normalize_path(&root.join(&self.input));
        self.output = normalize_path(&root.join(&self.output));
        self.includes = normalize_path(&self.input.join(&self.includes));
        self.layouts = normalize_path(&self.input.join(&self.layouts));
    }
}
