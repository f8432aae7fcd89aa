//! Build command - stages a package and produces the archive.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::pipeline::{self, BuildRequest};
use crate::staging::StagingAssembler;

/// Execute the build command.
///
/// `output` defaults to `<package name>.kb` in `base_dir`.
pub fn cmd_build(
    base_dir: &Path,
    package_dir: PathBuf,
    output: Option<PathBuf>,
    object_id: Option<String>,
    config: &Config,
) -> Result<()> {
    let build_start = Instant::now();
    let output = output.unwrap_or_else(|| pipeline::default_output(base_dir, &package_dir));

    let request = BuildRequest {
        package_dir,
        object_id,
        output,
    };
    let report = pipeline::build(config, &StagingAssembler::default(), &request)?;
    pipeline::print_report(&report);

    if !report.success() {
        anyhow::bail!(
            "Packager did not report success for '{}'",
            report.package.name
        );
    }

    println!(
        "  Total time: {:.1}s",
        build_start.elapsed().as_secs_f64()
    );
    Ok(())
}
