//! Per-directory metadata records (`metainfo.yaml`).
//!
//! Content directories may carry a small YAML record describing the object
//! they hold. Only the object identifier matters here; every other key is
//! kept verbatim in [`MetaInfo::fields`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default file name of a metadata record.
pub const METAINFO_FILE: &str = "metainfo.yaml";

/// Default key holding the object identifier.
pub const OBJECT_ID_KEY: &str = "ObjectId";

/// Why a metadata record could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum MetaInfoError {
    /// The directory has no record. Expected for most directories.
    #[error("metadata record not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl MetaInfoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MetaInfoError::NotFound(_))
    }
}

/// A parsed metadata record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaInfo {
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_yaml::Value>,
}

impl MetaInfo {
    /// Parse a record from YAML text. An empty document is an empty record.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let record: Option<MetaInfo> = serde_yaml::from_str(content)?;
        Ok(record.unwrap_or_default())
    }

    /// String value of `key`, if present and scalar.
    ///
    /// Numbers and booleans are rendered to text; YAML sometimes types an
    /// unquoted identifier that way.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The `ObjectId` value.
    pub fn object_id(&self) -> Option<String> {
        self.get_str(OBJECT_ID_KEY)
    }
}

/// Raw text of the record named `file_name` inside `dir`.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_text(dir: &Path, file_name: &str) -> Result<String, MetaInfoError> {
    let path = dir.join(file_name);
    match fs::read(&path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MetaInfoError::NotFound(path)),
        Err(source) => Err(MetaInfoError::Io { path, source }),
    }
}

/// Read and parse the record named `file_name` inside `dir`.
pub fn read_record(dir: &Path, file_name: &str) -> Result<MetaInfo, MetaInfoError> {
    let content = read_text(dir, file_name)?;
    MetaInfo::parse(&content).map_err(|source| MetaInfoError::Parse {
        path: dir.join(file_name),
        source,
    })
}
