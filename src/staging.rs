//! Staging tree assembly.
//!
//! The packager consumes a directory with a fixed layout:
//!
//! ```text
//! <staging root>/
//! ├── objects/<package name>/       # package content, LF line endings
//! ├── contracts/
//! │   ├── taxonomy/                 # taxonomy reference data
//! │   └── origins/origins.json      # who built the package
//! └── common/rules_filters/         # shared filters, vendor-internal ones pruned
//! ```
//!
//! Every run gets its own uniquely named root under the staging base. The
//! root is left on disk afterwards, also when a step fails, so a broken
//! build can be inspected. `kbpack clean` removes old roots.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{copy_dir_recursive, create_unique_dir, ensure_dir_exists, expand_tilde};
use crate::eol;
use crate::origin::OriginProvider;
use crate::package::Package;
use crate::prune::{self, PruneReport, PruneRules};

/// Names of the fixed parts of a staging tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    /// Prefix of staging root directory names.
    pub root_prefix: String,
    /// Parent of the package copy.
    pub objects_dir: String,
    pub taxonomy_dir: String,
    pub origins_dir: String,
    pub origins_file: String,
    pub rules_filters_dir: String,
}

impl Default for StagingLayout {
    fn default() -> Self {
        Self {
            root_prefix: "kbpack-".to_string(),
            objects_dir: "objects".to_string(),
            taxonomy_dir: "contracts/taxonomy".to_string(),
            origins_dir: "contracts/origins".to_string(),
            origins_file: "origins.json".to_string(),
            rules_filters_dir: "common/rules_filters".to_string(),
        }
    }
}

/// Inputs of one assembly.
#[derive(Debug, Clone)]
pub struct StagingRequest<'a> {
    pub package: &'a Package,
    /// Taxonomy reference data to copy.
    pub taxonomy_dir: &'a Path,
    /// Shared rules filters to copy and prune.
    pub rules_filters_dir: &'a Path,
    /// Where staging roots are created. May start with `~`.
    pub staging_base: &'a Path,
    /// Archive the packager will write; removed if it already exists.
    pub output: &'a Path,
}

/// A fully populated staging tree.
#[derive(Debug, Clone)]
pub struct StagingTree {
    pub root: PathBuf,
    /// Copy of the package content.
    pub package_dir: PathBuf,
    pub origins_file: PathBuf,
    pub rules_filters_dir: PathBuf,
    /// Package files rewritten to LF line endings.
    pub normalized_files: usize,
    pub prune: PruneReport,
}

/// Builds staging trees.
#[derive(Debug, Clone, Default)]
pub struct StagingAssembler {
    pub layout: StagingLayout,
    pub rules: PruneRules,
}

impl StagingAssembler {
    pub fn new(layout: StagingLayout, rules: PruneRules) -> Self {
        Self { layout, rules }
    }

    /// Assemble the staging tree for `request`.
    ///
    /// Steps run in order and the first failure aborts; whatever was built
    /// so far stays on disk.
    pub fn assemble(
        &self,
        request: &StagingRequest<'_>,
        origins: &dyn OriginProvider,
    ) -> Result<StagingTree> {
        let package = request.package;

        // 1. Replace any previous archive
        remove_existing_output(request.output)?;

        // 2. Fresh root; the packager does not understand `~`
        let staging_base = expand_tilde(request.staging_base);
        let root = create_unique_dir(&staging_base, &self.layout.root_prefix)?;
        tracing::info!(root = %root.display(), "created staging root");
        println!("  Staging root: {}", root.display());

        // 3-4. Package content with LF line endings
        let package_dir = root.join(&self.layout.objects_dir).join(&package.name);
        println!("  Copying package '{}'...", package.name);
        copy_dir_recursive(&package.dir, &package_dir).with_context(|| {
            format!("Failed to copy package {}", package.dir.display())
        })?;
        let normalized_files = eol::normalize_tree(&package_dir)?;
        println!("  Normalized line endings in {} file(s)", normalized_files);

        // 5. Taxonomy
        let taxonomy_dir = root.join(&self.layout.taxonomy_dir);
        println!("  Copying taxonomy...");
        ensure_dir_exists(&taxonomy_dir)?;
        copy_dir_recursive(request.taxonomy_dir, &taxonomy_dir).with_context(|| {
            format!("Failed to copy taxonomy {}", request.taxonomy_dir.display())
        })?;

        // 6. Origin
        let origins_dir = root.join(&self.layout.origins_dir);
        ensure_dir_exists(&origins_dir)?;
        let origin = origins.current_origin()?;
        let origins_file = origins_dir.join(&self.layout.origins_file);
        fs::write(&origins_file, origin.to_json_pretty()?)
            .with_context(|| format!("Failed to write {}", origins_file.display()))?;
        println!("  Wrote origin '{}'", origin.id);

        // 7. Shared rules filters without vendor-internal content
        let rules_filters_dir = root.join(&self.layout.rules_filters_dir);
        println!("  Copying shared rules filters...");
        ensure_dir_exists(&rules_filters_dir)?;
        copy_dir_recursive(request.rules_filters_dir, &rules_filters_dir).with_context(|| {
            format!(
                "Failed to copy rules filters {}",
                request.rules_filters_dir.display()
            )
        })?;
        let prune = prune::prune_excluded(&rules_filters_dir, &self.rules);
        println!(
            "  Removed {} vendor-internal rules filter folder(s)",
            prune.removed.len()
        );
        if prune.errors > 0 {
            eprintln!(
                "  [WARN] {} problem(s) while pruning rules filters (see log)",
                prune.errors
            );
        }

        Ok(StagingTree {
            root,
            package_dir,
            origins_file,
            rules_filters_dir,
            normalized_files,
            prune,
        })
    }
}

fn remove_existing_output(output: &Path) -> Result<()> {
    if output.is_file() {
        tracing::info!(output = %output.display(), "removing existing archive");
        fs::remove_file(output)
            .with_context(|| format!("Failed to remove existing {}", output.display()))?;
    }
    Ok(())
}
