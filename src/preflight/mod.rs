//! Preflight checks for packing.
//!
//! Validates the packaging tool and input/staging directories before a
//! build. Run with `kbpack preflight` to check everything is ready.

mod environment;
mod tools;
mod types;

use anyhow::{bail, Result};

use crate::config::Config;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks.
pub fn run_preflight(config: &Config) -> PreflightReport {
    let mut checks = tools::check_tools(config);
    checks.extend(environment::check_environment(config));
    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(config: &Config) -> Result<()> {
    let report = run_preflight(config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before packing.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}
