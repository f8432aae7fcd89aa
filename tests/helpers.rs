//! Shared test utilities for kbpack tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use kbpack::config::Config;

/// Packager stand-in that checks the staging layout and reports success.
pub const PACKAGER_OK: &str = r#"#!/bin/sh
# invoked as: <script> pack -s <staging> -o <output>
[ "$1" = "pack" ] || { echo "unexpected command $1"; exit 2; }
echo "Reading $3"
[ -d "$3/objects" ] || { echo "objects missing"; exit 2; }
[ -f "$3/contracts/origins/origins.json" ] || { echo "origins missing"; exit 2; }
echo "archive" > "$5"
echo "Knowledge base package creation completed successfully"
"#;

/// Packager stand-in that exits cleanly without the success marker.
pub const PACKAGER_NO_MARKER: &str = "#!/bin/sh\necho \"Done.\"\nexit 0\n";

/// Packager stand-in that prints the marker on stderr and exits non-zero.
pub const PACKAGER_MARKER_ON_STDERR: &str = "#!/bin/sh\n\
echo \"warning: slow disk\"\n\
echo \"Knowledge base package creation completed successfully\" >&2\n\
exit 3\n";

/// A content repository plus taxonomy and staging directories in a temp dir.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    pub base: PathBuf,
    /// `repo/packages/esc`
    pub package: PathBuf,
    /// `repo/common/rules_filters`
    pub rules_filters: PathBuf,
    pub taxonomy: PathBuf,
    pub staging: PathBuf,
    pub output: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path().to_path_buf();

        let package = base.join("repo/packages/esc");
        let rules_filters = base.join("repo/common/rules_filters");
        let taxonomy = base.join("taxonomy");

        write(&package.join("metainfo.yaml"), "ObjectId: LOC-PKG-1\r\n");
        write(
            &package.join("correlation_rules/esc_login/rule.co"),
            "line1\r\nline2\r\n",
        );
        write(&taxonomy.join("fields.yaml"), "subject: string\n");
        fs::create_dir_all(&rules_filters).expect("Failed to create rules_filters");
        fs::create_dir_all(base.join("out")).expect("Failed to create out dir");

        Self {
            package,
            rules_filters,
            taxonomy,
            staging: base.join("staging"),
            output: base.join("out/esc.kb"),
            base,
            _temp_dir: temp_dir,
        }
    }

    /// Install a packager script and return its path.
    pub fn packager(&self, script: &str) -> PathBuf {
        let path = self.base.join("tools/kbpack.sh");
        write(&path, script);
        path
    }

    /// Variables pointing kbpack at this environment.
    pub fn vars(&self, packager: &Path) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("KBPACK_PACKAGER".into(), packager.display().to_string());
        // Run scripts through sh: no exec bit needed
        vars.insert("KBPACK_RUNTIME".into(), "sh".into());
        vars.insert("KBPACK_TAXONOMY_DIR".into(), self.taxonomy.display().to_string());
        vars.insert("KBPACK_STAGING_DIR".into(), self.staging.display().to_string());
        vars.insert("KBPACK_ORIGIN_NICKNAME".into(), "tester".into());
        vars
    }

    pub fn config(&self, packager: &Path) -> Config {
        Config::from_vars(&self.vars(packager), &self.base)
    }

    /// Staging roots currently on disk.
    pub fn staging_roots(&self) -> Vec<PathBuf> {
        kbpack::common::list_work_dirs(&self.staging, "kbpack-").expect("list staging")
    }
}

/// Write a file, creating parents.
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Write a `metainfo.yaml` with the given ObjectId into `dir`.
pub fn write_metainfo(dir: &Path, object_id: &str) {
    write(&dir.join("metainfo.yaml"), &format!("ObjectId: {}\n", object_id));
}

pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "{} does not contain {:?}:\n{}",
        path.display(),
        expected,
        content
    );
}

pub fn assert_dir_exists(path: &Path) {
    assert!(path.is_dir(), "Expected directory at {}", path.display());
}

pub fn assert_not_exists(path: &Path) {
    assert!(!path.exists(), "Expected nothing at {}", path.display());
}
