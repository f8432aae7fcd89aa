//! Shared utilities across kbpack modules.

pub mod files;
pub mod paths;
pub mod temp;

pub use files::copy_dir_recursive;
pub use paths::{ensure_dir_exists, expand_tilde, resolve_path};
pub use temp::{cleanup_work_dir, create_unique_dir, list_work_dirs};
