//! Line ending normalization for staged package content.
//!
//! The packager expects LF line endings. Content authored on Windows
//! carries CRLF, so every file copied into the staging tree is rewritten.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Replace every CRLF pair with LF.
///
/// Returns the input unchanged (borrowed) when it has no CRLF. A lone `\r`
/// is kept as is.
pub fn normalize_eol(content: &[u8]) -> Cow<'_, [u8]> {
    if !content.windows(2).any(|w| w == b"\r\n") {
        return Cow::Borrowed(content);
    }

    let mut out = Vec::with_capacity(content.len());
    let mut iter = content.iter().peekable();
    while let Some(&byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(byte);
    }
    Cow::Owned(out)
}

/// Normalize every file under `dir` in place.
///
/// Files that are already LF-only are left untouched. Returns the number of
/// files rewritten.
pub fn normalize_tree(dir: &Path) -> Result<usize> {
    let mut rewritten = 0;

    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let content =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        if let Cow::Owned(normalized) = normalize_eol(&content) {
            fs::write(path, normalized)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "normalized line endings");
            rewritten += 1;
        }
    }

    Ok(rewritten)
}
