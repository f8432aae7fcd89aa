//! Removal of vendor-internal subtrees from the shared rules filters.
//!
//! The repository's `common/rules_filters` folder mixes filters that may be
//! redistributed with filters owned by the platform vendor. Vendor filters
//! are marked by their `metainfo.yaml` (`ObjectId: PT-...`) and must not end
//! up in a third-party package, so after copying the folder into staging
//! every matching directory is deleted together with everything beneath it.
//!
//! The walk never fails: unreadable records and directories are logged,
//! counted in [`PruneReport::errors`], and skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::metainfo::{self, MetaInfo, MetaInfoError};

/// Names and marker the pruner matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneRules {
    /// Record file looked up in every directory.
    pub metainfo_file: String,
    /// Key holding the object identifier.
    pub object_id_key: String,
    /// Identifier prefix of non-distributable content.
    pub excluded_prefix: String,
}

impl Default for PruneRules {
    fn default() -> Self {
        Self {
            metainfo_file: metainfo::METAINFO_FILE.to_string(),
            object_id_key: metainfo::OBJECT_ID_KEY.to_string(),
            excluded_prefix: "PT".to_string(),
        }
    }
}

impl PruneRules {
    /// The literal marker, e.g. `ObjectId: PT`.
    pub fn marker(&self) -> String {
        format!("{}: {}", self.object_id_key, self.excluded_prefix)
    }

    /// Does the raw record text contain the marker?
    ///
    /// Works on records that are not valid YAML (tab indentation, several
    /// documents, stray bytes).
    pub fn matches_text(&self, text: &str) -> bool {
        text.contains(&self.marker())
    }

    /// Does the parsed record's identifier start with the excluded prefix?
    ///
    /// Catches spellings the literal marker misses, such as quoted values.
    pub fn matches_record(&self, record: &MetaInfo) -> bool {
        record
            .get_str(&self.object_id_key)
            .is_some_and(|id| id.starts_with(&self.excluded_prefix))
    }
}

/// Outcome of a pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Directories deleted, in visit order.
    pub removed: Vec<PathBuf>,
    /// Directories whose record was evaluated.
    pub visited: usize,
    /// Non-fatal problems encountered (already logged).
    pub errors: usize,
}

/// Delete every directory under `root` whose record matches `rules`.
///
/// `root` itself is never evaluated, only its descendants. Directories are
/// checked before their children; a deleted directory is never descended
/// into. Symlinked directories are not followed.
pub fn prune_excluded(root: &Path, rules: &PruneRules) -> PruneReport {
    let mut report = PruneReport::default();

    let mut stack = match child_dirs(root) {
        Ok(children) => children,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return report,
        Err(e) => {
            tracing::warn!(dir = %root.display(), error = %e, "failed to list directory");
            report.errors += 1;
            return report;
        }
    };
    stack.reverse();

    while let Some(dir) = stack.pop() {
        report.visited += 1;

        if is_excluded(&dir, rules, &mut report) {
            tracing::info!(dir = %dir.display(), "removing vendor-internal directory");
            match fs::remove_dir_all(&dir) {
                Ok(()) => report.removed.push(dir),
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "failed to remove directory");
                    report.errors += 1;
                }
            }
            continue;
        }

        match child_dirs(&dir) {
            Ok(children) => stack.extend(children.into_iter().rev()),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to list directory");
                report.errors += 1;
            }
        }
    }

    report
}

fn is_excluded(dir: &Path, rules: &PruneRules, report: &mut PruneReport) -> bool {
    let text = match metainfo::read_text(dir, &rules.metainfo_file) {
        Ok(text) => text,
        Err(MetaInfoError::NotFound(_)) => return false,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable metadata record, keeping directory");
            report.errors += 1;
            return false;
        }
    };

    if rules.matches_text(&text) {
        return true;
    }

    match MetaInfo::parse(&text) {
        Ok(record) => rules.matches_record(&record),
        Err(e) => {
            tracing::warn!(
                record = %dir.join(&rules.metainfo_file).display(),
                error = %e,
                "unparsable metadata record, keeping directory"
            );
            report.errors += 1;
            false
        }
    }
}

/// Immediate subdirectories of `dir`, sorted by name. Symlinks are skipped.
fn child_dirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
