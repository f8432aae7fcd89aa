//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Stage a package and run the packager
//! - `preflight` - Run preflight checks
//! - `show` - Display information
//! - `clean` - Remove leftover staging trees

pub mod build;
pub mod clean;
mod preflight;
pub mod show;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
