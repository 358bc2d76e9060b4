//! Input file discovery for the check command
//!
//! Expands the paths given on the command line into a sorted, de-duplicated
//! list of flat files. Files are taken as given; directories are walked and
//! filtered by a glob pattern on the file name.

use crate::Error;
use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Expand files and directories into the flat files to check
pub fn discover_flat_files(paths: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern)
        .with_context(|| format!("Invalid file pattern '{}'", pattern))?;

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = walk_directory(path, &pattern)?;
            debug!(
                "Discovered {} files matching '{}' in {}",
                found.len(),
                pattern,
                path.display()
            );
            files.extend(found);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("Input path does not exist: {}", path.display());
        }
    }

    // Sort files for consistent processing order
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_directory(directory: &Path, pattern: &Pattern) -> crate::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory).follow_links(false) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(
                format!("Failed to walk directory {}", directory.display()),
                e,
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if matches {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_walk_applies_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("2024");
        fs::create_dir(&nested).unwrap();
        fs::write(temp_dir.path().join("january.txt"), "").unwrap();
        fs::write(nested.join("february.txt"), "").unwrap();
        fs::write(nested.join("notes.md"), "").unwrap();

        let files = discover_flat_files(&[temp_dir.path().to_path_buf()], "*.txt").unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "txt"));
    }

    #[test]
    fn test_explicit_files_bypass_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("submission.dat");
        fs::write(&file, "").unwrap();

        let files = discover_flat_files(&[file.clone(), file.clone()], "*.txt").unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_path_and_bad_pattern() {
        assert!(discover_flat_files(&[PathBuf::from("/nonexistent/nibrs")], "*.txt").is_err());

        let temp_dir = TempDir::new().unwrap();
        assert!(discover_flat_files(&[temp_dir.path().to_path_buf()], "[").is_err());
    }

    #[test]
    fn test_walk_failure_is_a_traversal_error() {
        let pattern = Pattern::new("*.txt").unwrap();
        let result = walk_directory(Path::new("/nonexistent/nibrs"), &pattern);
        assert!(matches!(result, Err(Error::DirectoryTraversal { .. })));
    }
}
