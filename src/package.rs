//! Content package discovery.
//!
//! A package is a directory in the content repository, normally at
//! `<repo>/packages/<name>`, carrying its own `metainfo.yaml`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::metainfo::{self, MetaInfoError};
use crate::prefix;

/// A content package to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Object identifier, e.g. `LOC-PKG-12`. Empty if unknown.
    pub object_id: String,
    /// Package source directory.
    pub dir: PathBuf,
    /// Final component of `dir`.
    pub name: String,
}

impl Package {
    /// Open the package at `dir`.
    ///
    /// The identifier comes from `object_id` if given, otherwise from the
    /// package's `metainfo.yaml`. A package without any identifier is still
    /// buildable; the prefix check reports it.
    pub fn open(dir: &Path, object_id: Option<&str>) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("Package directory not found: {}", dir.display());
        }

        let dir = dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", dir.display()))?;
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Package directory has no name: {}", dir.display()))?;

        let object_id = match object_id {
            Some(id) => id.to_string(),
            None => match metainfo::read_record(&dir, metainfo::METAINFO_FILE) {
                Ok(record) => record.object_id().unwrap_or_default(),
                Err(MetaInfoError::NotFound(_)) => String::new(),
                Err(e) => {
                    tracing::warn!(error = %e, "could not read package metadata");
                    String::new()
                }
            },
        };

        Ok(Self {
            object_id,
            dir,
            name,
        })
    }

    /// Vendor prefix of the identifier, if it has one.
    pub fn vendor_prefix(&self) -> Option<&str> {
        prefix::extract_prefix(&self.object_id)
    }

    /// Shared rules filters of the repository holding this package:
    /// `<package>/../../common/rules_filters`, never climbing above `/`.
    pub fn default_rules_filters_dir(&self) -> PathBuf {
        let repo_root = self
            .dir
            .ancestors()
            .nth(2)
            .or_else(|| self.dir.ancestors().last())
            .unwrap_or(self.dir.as_path());
        repo_root.join("common").join("rules_filters")
    }
}
