//! Staging environment checks (input directories, writable staging base).

use std::fs;

use crate::config::Config;

use super::types::CheckResult;

/// Check directories the build reads from and writes to.
pub fn check_environment(config: &Config) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match &config.taxonomy_dir {
        None => results.push(CheckResult::fail(
            "taxonomy",
            "KBPACK_TAXONOMY_DIR is not set.",
        )),
        Some(dir) if dir.is_dir() => {
            results.push(CheckResult::pass_with("taxonomy", &dir.display().to_string()));
        }
        Some(dir) => results.push(CheckResult::fail(
            "taxonomy",
            &format!("Directory not found: {}", dir.display()),
        )),
    }

    match &config.rules_filters_dir {
        None => results.push(CheckResult::pass_with(
            "rules filters",
            "derived from package location",
        )),
        Some(dir) if dir.is_dir() => {
            results.push(CheckResult::pass_with(
                "rules filters",
                &dir.display().to_string(),
            ));
        }
        Some(dir) => results.push(CheckResult::fail(
            "rules filters",
            &format!("Directory not found: {}", dir.display()),
        )),
    }

    // Staging base must be creatable and writable
    let staging = &config.staging_dir;
    let probe = staging.join(".preflight-test");
    let writable = fs::create_dir_all(staging).and_then(|_| fs::write(&probe, "test"));
    match writable {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            results.push(CheckResult::pass_with(
                "staging directory writable",
                &staging.display().to_string(),
            ));
        }
        Err(e) => results.push(CheckResult::fail(
            "staging directory writable",
            &format!("Cannot write to {}: {}", staging.display(), e),
        )),
    }

    if config.content_prefix.contains(char::is_whitespace) || config.content_prefix.contains('-')
    {
        results.push(CheckResult::warn(
            "content prefix",
            &format!(
                "'{}' can never match an ObjectId prefix (no spaces or hyphens allowed)",
                config.content_prefix
            ),
        ));
    } else {
        results.push(CheckResult::pass_with("content prefix", &config.content_prefix));
    }

    results
}
