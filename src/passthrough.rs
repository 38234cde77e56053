//! Passthrough copy: files and directories written to the output untouched.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::PassthroughEntry;
use crate::log;

/// Copy every entry into `output`, returning the number of files copied.
///
/// Missing sources are reported and skipped.
pub fn copy_all(entries: &[PassthroughEntry], output: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in entries {
        let source = entry.source();
        let target = output.join(entry.target());

        let copied = if source.is_dir() {
            copy_dir_recursive(source, &target, &mut count)
        } else if source.is_file() {
            copy_file(source, &target, &mut count)
        } else {
            log!("warning"; "passthrough source {} does not exist", source.display());
            continue;
        };
        copied.with_context(|| format!("failed to copy {}", source.display()))?;
    }
    Ok(count)
}

fn copy_dir_recursive(src_dir: &Path, dest_dir: &Path, count: &mut usize) -> Result<()> {
    for entry in fs::read_dir(src_dir)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest_dir.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path, count)?;
        } else {
            copy_file(&src_path, &dest_path, count)?;
        }
    }
    Ok(())
}

fn copy_file(src: &Path, dest: &Path, count: &mut usize) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    *count += 1;
    Ok(())
}
