//! Clean command - removes staging trees left behind by earlier builds.
//!
//! Builds never delete their staging tree, so a failed package can be
//! inspected. This is the explicit way to get rid of them.

use anyhow::Result;

use crate::common::{cleanup_work_dir, list_work_dirs};
use crate::config::Config;
use crate::staging::StagingLayout;

/// Execute the clean command. Returns the number of trees removed.
pub fn cmd_clean(config: &Config) -> Result<usize> {
    let layout = StagingLayout::default();
    let roots = list_work_dirs(&config.staging_dir, &layout.root_prefix)?;

    if roots.is_empty() {
        println!("Nothing to clean in {}", config.staging_dir.display());
        return Ok(0);
    }

    println!("Removing {} staging tree(s)...", roots.len());
    let mut removed = 0;
    for root in &roots {
        cleanup_work_dir(root);
        if root.exists() {
            eprintln!("  [WARN] Could not remove {}", root.display());
        } else {
            println!("  Removed {}", root.display());
            removed += 1;
        }
    }
    Ok(removed)
}
