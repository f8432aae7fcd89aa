//! Show command - displays information.

use anyhow::Result;

use crate::common::list_work_dirs;
use crate::config::Config;
use crate::staging::StagingLayout;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// List staging trees left on disk
    Staging,
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Staging => {
            let layout = StagingLayout::default();
            let roots = list_work_dirs(&config.staging_dir, &layout.root_prefix)?;
            if roots.is_empty() {
                println!("No staging trees in {}", config.staging_dir.display());
            } else {
                println!("Staging trees in {}:", config.staging_dir.display());
                for root in roots {
                    println!("  {}", root.display());
                }
            }
        }
    }
    Ok(())
}
