//! Origin descriptor embedded in every package.
//!
//! The origin tells the product who built a package. It is rebuilt from the
//! current settings on every run and written to
//! `contracts/origins/origins.json` in the staging tree.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Build/user context of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    pub id: String,
    /// Content prefix of the vendor building the package.
    pub system_name: String,
    pub nickname: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl Origin {
    /// Serialize as indented JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).context("Failed to serialize origin")?;
        json.push('\n');
        Ok(json)
    }
}

/// Source of the current origin.
pub trait OriginProvider {
    fn current_origin(&self) -> Result<Origin>;
}

impl OriginProvider for Origin {
    fn current_origin(&self) -> Result<Origin> {
        Ok(self.clone())
    }
}
