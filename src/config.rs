//! Configuration management for kbpack.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::common::paths::resolve_path;
use crate::origin::{Origin, OriginProvider};

/// Content prefix used when none is configured.
pub const DEFAULT_CONTENT_PREFIX: &str = "LOC";

/// Base directory for staging roots when none is configured.
pub const DEFAULT_STAGING_DIR: &str = "~/.kbpack/staging";

/// Origin fields set by the user. Missing values are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginSettings {
    pub id: Option<String>,
    pub nickname: Option<String>,
    pub display_name: Option<String>,
    pub contact_email: Option<String>,
}

/// kbpack configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the packaging tool (e.g. `kbpack.dll`).
    pub packager: Option<PathBuf>,
    /// Launcher the packaging tool runs under (e.g. `dotnet`).
    pub runtime: Option<String>,
    /// Vendor prefix expected in package object identifiers.
    pub content_prefix: String,
    /// Taxonomy reference data copied into `contracts/taxonomy`.
    pub taxonomy_dir: Option<PathBuf>,
    /// Shared rules filters; derived from the package location when unset.
    pub rules_filters_dir: Option<PathBuf>,
    /// Directory under which per-run staging roots are created.
    pub staging_dir: PathBuf,
    pub origin: OriginSettings,
    /// Login name of the current user, if known.
    pub user_name: Option<String>,
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let mut vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            let iter = dotenvy::from_path_iter(&env_path)
                .with_context(|| format!("Failed to read {}", env_path.display()))?;
            for item in iter {
                let (key, value) =
                    item.with_context(|| format!("Invalid line in {}", env_path.display()))?;
                vars.insert(key, value);
            }
        }

        // Environment variables override .env file
        vars.extend(std::env::vars());

        Ok(Self::from_vars(&vars, base_dir))
    }

    /// Build configuration from an explicit variable map.
    ///
    /// Relative paths are anchored at `base_dir`; `~` is expanded.
    pub fn from_vars(vars: &HashMap<String, String>, base_dir: &Path) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let path = |key: &str| get(key).map(|v| resolve_path(base_dir, Path::new(&v)));

        let packager = path("KBPACK_PACKAGER");

        let runtime = match vars.get("KBPACK_RUNTIME") {
            // Explicitly empty: run the packager directly
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => packager
                .as_deref()
                .filter(|p| p.extension().is_some_and(|ext| ext == "dll"))
                .map(|_| "dotnet".to_string()),
        };

        let staging_dir = path("KBPACK_STAGING_DIR")
            .unwrap_or_else(|| resolve_path(base_dir, Path::new(DEFAULT_STAGING_DIR)));

        Self {
            packager,
            runtime,
            content_prefix: get("KBPACK_CONTENT_PREFIX")
                .unwrap_or_else(|| DEFAULT_CONTENT_PREFIX.to_string()),
            taxonomy_dir: path("KBPACK_TAXONOMY_DIR"),
            rules_filters_dir: path("KBPACK_RULES_FILTERS_DIR"),
            staging_dir,
            origin: OriginSettings {
                id: get("KBPACK_ORIGIN_ID"),
                nickname: get("KBPACK_ORIGIN_NICKNAME"),
                display_name: get("KBPACK_ORIGIN_DISPLAY_NAME"),
                contact_email: get("KBPACK_ORIGIN_CONTACT_EMAIL"),
            },
            user_name: get("USER").or_else(|| get("USERNAME")),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        };

        println!("Configuration:");
        println!("  KBPACK_PACKAGER: {}", show(&self.packager));
        println!(
            "  KBPACK_RUNTIME: {}",
            self.runtime.as_deref().unwrap_or("(none)")
        );
        println!("  KBPACK_CONTENT_PREFIX: {}", self.content_prefix);
        println!("  KBPACK_TAXONOMY_DIR: {}", show(&self.taxonomy_dir));
        println!(
            "  KBPACK_RULES_FILTERS_DIR: {}",
            self.rules_filters_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(derived from package location)".to_string())
        );
        println!("  KBPACK_STAGING_DIR: {}", self.staging_dir.display());
        match self.current_origin() {
            Ok(origin) => {
                println!("  Origin: {} ({})", origin.id, origin.display_name);
            }
            Err(e) => println!("  Origin: unavailable ({:#})", e),
        }
    }
}

impl OriginProvider for Config {
    fn current_origin(&self) -> Result<Origin> {
        let nickname = self
            .origin
            .nickname
            .clone()
            .or_else(|| self.user_name.clone())
            .context("Origin nickname is not set and the current user name is unknown")?;

        Ok(Origin {
            id: self
                .origin
                .id
                .clone()
                .unwrap_or_else(|| format!("{}-{}", self.content_prefix, nickname)),
            system_name: self.content_prefix.clone(),
            display_name: self
                .origin
                .display_name
                .clone()
                .unwrap_or_else(|| nickname.clone()),
            nickname,
            contact_email: self.origin.contact_email.clone(),
        })
    }
}
