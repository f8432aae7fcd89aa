//! Utilities for managing temporary work directories.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a fresh, uniquely named directory under `parent_dir`.
///
/// The name is `<prefix><random>`. The directory is persisted: it is NOT
/// removed when this function returns or when the build later fails.
///
/// # Example
/// ```ignore
/// let root = create_unique_dir(&staging_base, "kbpack-")?;
/// // root = ~/.kbpack/staging/kbpack-a1B2c3
/// ```
pub fn create_unique_dir(parent_dir: &Path, prefix: &str) -> Result<PathBuf> {
    fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory {}", parent_dir.display()))?;

    let dir = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(parent_dir)
        .with_context(|| format!("Failed to create work directory in {}", parent_dir.display()))?;

    Ok(dir.keep())
}

/// List work directories under `parent_dir` whose name starts with `prefix`.
///
/// A missing `parent_dir` yields an empty list.
pub fn list_work_dirs(parent_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    if !parent_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(parent_dir)
        .with_context(|| format!("Failed to read {}", parent_dir.display()))?
    {
        let entry = entry?;
        let is_match = entry.file_name().to_string_lossy().starts_with(prefix);
        if is_match && entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Clean up a work directory after use.
///
/// Errors (including the directory already being gone) are ignored.
pub fn cleanup_work_dir(path: &Path) {
    let _ = fs::remove_dir_all(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_unique_dir_is_unique_and_persisted() {
        let temp = TempDir::new().unwrap();
        let a = create_unique_dir(temp.path(), "kbpack-").unwrap();
        let b = create_unique_dir(temp.path(), "kbpack-").unwrap();

        assert_ne!(a, b);
        assert!(a.is_dir());
        assert!(b.is_dir());
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("kbpack-"));
    }

    #[test]
    fn test_create_unique_dir_creates_parent() {
        let temp = TempDir::new().unwrap();
        let parent = temp.path().join("nested/base");
        let dir = create_unique_dir(&parent, "kbpack-").unwrap();
        assert!(dir.starts_with(&parent));
    }

    #[test]
    fn test_list_work_dirs_filters_by_prefix() {
        let temp = TempDir::new().unwrap();
        let a = create_unique_dir(temp.path(), "kbpack-").unwrap();
        fs::create_dir(temp.path().join("other")).unwrap();
        fs::write(temp.path().join("kbpack-file"), "x").unwrap();

        let found = list_work_dirs(temp.path(), "kbpack-").unwrap();
        assert_eq!(found, vec![a]);
    }

    #[test]
    fn test_list_work_dirs_missing_parent() {
        let temp = TempDir::new().unwrap();
        let found = list_work_dirs(&temp.path().join("missing"), "kbpack-").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_cleanup_work_dir_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = create_unique_dir(temp.path(), "kbpack-").unwrap();
        cleanup_work_dir(&dir);
        cleanup_work_dir(&dir);
        assert!(!dir.exists());
    }
}
