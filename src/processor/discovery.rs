//! File discovery for aggregation inputs
//!
//! Expands the paths given on the command line into a flat list of files:
//! directories are walked recursively, anything that is not a directory is
//! collected as is.

use crate::error::Result;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

/// Walk every root depth-first and collect all non-directory entries.
///
/// Roots are visited in the order given and entries in the order the
/// filesystem lists them. Symbolic links are not followed. The first
/// traversal error aborts the walk and no partial list is returned.
pub fn discover_files(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        let before = files.len();

        for entry in WalkDir::new(root) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                files.push(entry.into_path());
            }
        }

        debug!(
            "Found {} files under {}",
            files.len() - before,
            root.display()
        );
    }

    Ok(files)
}
