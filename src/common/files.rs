//! File and directory copy helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Copy the contents of `src` into `dst` recursively.
///
/// `dst` is created if missing; existing files in it are overwritten.
/// Symlinks are followed, so the source must be acyclic.
///
/// Returns the number of files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        anyhow::bail!("Source directory not found: {}", src.display());
    }
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory {}", dst.display()))?;

    let mut copied = 0;
    for entry in fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dst.join(entry.file_name());

        if path.is_dir() {
            copied += copy_dir_recursive(&path, &dest_path)?;
        } else {
            fs::copy(&path, &dest_path).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    path.display(),
                    dest_path.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_dir_recursive_nested() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(src.join("sub/deeper")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("sub/deeper/b.txt"), "b").unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();

        let copied = copy_dir_recursive(&src, &dst).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dst.join("sub/deeper/b.txt")).unwrap(), "b");
        assert!(dst.join("empty").is_dir());
    }

    #[test]
    fn test_copy_dir_recursive_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = copy_dir_recursive(&temp.path().join("nope"), &temp.path().join("dst"))
            .unwrap_err();
        assert!(err.to_string().contains("Source directory not found"));
    }
}
