//! End-to-end package build.
//!
//! prefix check (advisory) → staging → packager → result classification.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::common::expand_tilde;
use crate::config::Config;
use crate::package::Package;
use crate::packager::{Packager, PackagingOutcome};
use crate::prefix::{self, PrefixWarning};
use crate::staging::{StagingAssembler, StagingRequest, StagingTree};
use crate::timing::Timer;

/// What to build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub package_dir: PathBuf,
    /// Overrides the identifier from the package's metadata.
    pub object_id: Option<String>,
    /// Archive to produce.
    pub output: PathBuf,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub package: Package,
    pub warnings: Vec<PrefixWarning>,
    pub staging: StagingTree,
    pub output: PathBuf,
    pub outcome: PackagingOutcome,
}

impl BuildReport {
    pub fn success(&self) -> bool {
        self.outcome.success
    }
}

/// Resolve the packager from configuration, failing if it is unusable.
pub fn packager_from_config(config: &Config) -> Result<Packager> {
    let tool = config
        .packager
        .clone()
        .context("Packaging tool is not configured. Set KBPACK_PACKAGER.")?;
    let packager = Packager::new(tool, config.runtime.clone());
    packager.ensure_available()?;
    Ok(packager)
}

/// Build one package.
///
/// Returns `Ok` whenever the packager ran, successful or not; check
/// [`BuildReport::success`]. Errors mean the run never got that far.
pub fn build(
    config: &Config,
    assembler: &StagingAssembler,
    request: &BuildRequest,
) -> Result<BuildReport> {
    // Preconditions: nothing is staged if these fail
    let packager = packager_from_config(config)?;
    let taxonomy_dir = config
        .taxonomy_dir
        .as_deref()
        .context("Taxonomy directory is not configured. Set KBPACK_TAXONOMY_DIR.")?;

    let package = Package::open(&request.package_dir, request.object_id.as_deref())?;
    println!("=== Packing '{}' ===\n", package.name);

    let warnings: Vec<_> = prefix::check_prefix(&package.object_id, &config.content_prefix)
        .into_iter()
        .collect();
    for warning in &warnings {
        eprintln!("[WARN] {}", warning);
    }

    let rules_filters_dir = config
        .rules_filters_dir
        .clone()
        .unwrap_or_else(|| package.default_rules_filters_dir());
    let output = expand_tilde(&request.output);

    if let Some(user) = &config.user_name {
        tracing::info!(user = %user, "current user");
    }

    let t = Timer::start("Staging");
    let staging = assembler.assemble(
        &StagingRequest {
            package: &package,
            taxonomy_dir,
            rules_filters_dir: &rules_filters_dir,
            staging_base: &config.staging_dir,
            output: &output,
        },
        config,
    )?;
    t.finish();

    println!("\nRunning packager...");
    let t = Timer::start("Packager");
    let outcome = packager.pack(&staging.root, &output)?;
    t.finish();

    Ok(BuildReport {
        package,
        warnings,
        staging,
        output,
        outcome,
    })
}

/// Print the outcome the way the operator needs to see it.
pub fn print_report(report: &BuildReport) {
    if report.success() {
        println!(
            "\n=== Package '{}' built successfully ===",
            report.package.name
        );
        println!("  Output: {}", report.output.display());
        return;
    }

    eprintln!("\n[ERROR] Failed to build package '{}'", report.package.name);
    eprintln!("  Packager exit code: {}", report.outcome.exit_code);
    eprintln!("  Staging tree kept at: {}", report.staging.root.display());
    eprintln!("  Packager output:");
    for line in report.outcome.output.lines() {
        eprintln!("    | {}", line);
    }
}

/// Default archive path for a package: `<name>.kb` in `dir`.
pub fn default_output(dir: &Path, package_dir: &Path) -> PathBuf {
    let name = package_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "package".to_string());
    dir.join(format!("{}.kb", name))
}
