//! Integration tests for the processor module
//!
//! Exercises the worker pool end to end against temporary CSV trees.


use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write `(name, contents)` pairs under `temp_dir` and return their paths
pub fn write_csv_files(temp_dir: &TempDir, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, contents)| {
            let path = temp_dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, contents).unwrap();
            path
        })
        .collect()
}
