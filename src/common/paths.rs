//! Utilities for path resolution and directory management.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the current user's home directory.
///
/// The external packager receives paths verbatim and does not understand
/// the shorthand, so every configured path goes through here first.
/// `~user` forms are not expanded. If the home directory cannot be
/// determined the path is returned unchanged.
///
/// # Example
/// ```ignore
/// let staging = expand_tilde(Path::new("~/.kbpack/staging"));
/// // => /home/alice/.kbpack/staging
/// ```
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Expand `~` and anchor relative paths at `base_dir`.
pub fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}
