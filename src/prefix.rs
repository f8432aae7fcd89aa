//! Content prefix validation.
//!
//! Object identifiers look like `LOC-1234`: the token before the first
//! hyphen names the vendor that owns the content. A package whose prefix
//! differs from the configured content prefix may fail to install into the
//! product, so the mismatch is reported. It never stops the build.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+?)-").expect("prefix pattern is valid"));

/// Advisory problem found while checking a package identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixWarning {
    /// The identifier has no `<prefix>-` head.
    Unparsable { object_id: String },
    /// The identifier's prefix is not the configured one.
    Mismatch {
        object_id: String,
        expected: String,
        found: String,
    },
}

impl fmt::Display for PrefixWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixWarning::Unparsable { object_id } => write!(
                f,
                "Could not extract content prefix from package ObjectId '{}'",
                object_id
            ),
            PrefixWarning::Mismatch {
                object_id,
                expected,
                found,
            } => write!(
                f,
                "Content prefix '{}' does not match package ObjectId '{}' (prefix '{}'). \
                 Installing the package into the product may fail; change the content \
                 prefix or the package ObjectId",
                expected, object_id, found
            ),
        }
    }
}

/// Extract the vendor prefix: everything before the first `-`.
///
/// Returns `None` when the identifier has no hyphen, starts with one, or
/// contains whitespace before it.
pub fn extract_prefix(object_id: &str) -> Option<&str> {
    PREFIX_RE
        .captures(object_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Check an identifier against the configured content prefix.
pub fn check_prefix(object_id: &str, content_prefix: &str) -> Option<PrefixWarning> {
    match extract_prefix(object_id) {
        None => Some(PrefixWarning::Unparsable {
            object_id: object_id.to_string(),
        }),
        Some(found) if found != content_prefix => Some(PrefixWarning::Mismatch {
            object_id: object_id.to_string(),
            expected: content_prefix.to_string(),
            found: found.to_string(),
        }),
        Some(_) => None,
    }
}
