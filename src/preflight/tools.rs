//! Packaging tool availability checks.

use crate::config::Config;
use crate::process;

use super::types::CheckResult;

/// Check the packaging tool and its launcher.
pub fn check_tools(config: &Config) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match &config.packager {
        None => results.push(CheckResult::fail(
            "packaging tool",
            "KBPACK_PACKAGER is not set. Point it at the packager (e.g. kbpack.dll).",
        )),
        Some(path) if path.is_file() => {
            results.push(CheckResult::pass_with(
                "packaging tool",
                &path.display().to_string(),
            ));
        }
        Some(path) => results.push(CheckResult::fail(
            "packaging tool",
            &format!("Not found at {}", path.display()),
        )),
    }

    if let Some(runtime) = &config.runtime {
        match process::which(runtime) {
            Some(path) => results.push(CheckResult::pass_with(
                runtime,
                &path.display().to_string(),
            )),
            None => results.push(CheckResult::fail(
                runtime,
                "Not found in PATH. Install it or set KBPACK_RUNTIME.",
            )),
        }
    }

    results
}
