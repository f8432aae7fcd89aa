//! Rules filter pruning over realistic repository trees.

mod helpers;

use helpers::{assert_dir_exists, assert_not_exists, write, write_metainfo};
use kbpack::prune::{prune_excluded, PruneRules};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_vendor_subtree_removed_others_untouched() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_metainfo(&root.join("A"), "PT-1");
    write(&root.join("A/B/file.txt"), "a");
    write_metainfo(&root.join("C"), "VendorX-1");
    write(&root.join("C/D/file.txt"), "c");

    let report = prune_excluded(root, &PruneRules::default());

    assert_not_exists(&root.join("A"));
    assert_dir_exists(&root.join("C"));
    assert_eq!(fs::read_to_string(root.join("C/D/file.txt")).unwrap(), "c");
    assert_eq!(report.removed, vec![root.join("A")]);
}

#[test]
fn test_nested_vendor_filters_under_plain_groups() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    // Group folders carry no metadata; filters sit a few levels down
    write_metainfo(&root.join("network/firewall/pt_internal"), "PT-RF-1");
    write(&root.join("network/firewall/pt_internal/filter.flt"), "x");
    write_metainfo(&root.join("network/firewall/ours"), "LOC-RF-1");
    write_metainfo(&root.join("network/vpn/also_pt"), "PT-RF-2");
    write(&root.join("network/readme.txt"), "keep");

    let report = prune_excluded(root, &PruneRules::default());

    assert_not_exists(&root.join("network/firewall/pt_internal"));
    assert_not_exists(&root.join("network/vpn/also_pt"));
    assert_dir_exists(&root.join("network/firewall/ours"));
    assert_dir_exists(&root.join("network/vpn"));
    assert!(root.join("network/readme.txt").is_file());
    assert_eq!(report.removed.len(), 2);
    assert_eq!(report.errors, 0);
}

#[test]
fn test_vendor_parent_wins_over_children() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_metainfo(&root.join("outer"), "PT-1");
    write_metainfo(&root.join("outer/inner"), "LOC-1");
    write_metainfo(&root.join("outer/inner/deeper"), "PT-2");

    let report = prune_excluded(root, &PruneRules::default());

    assert_not_exists(&root.join("outer"));
    // Only the top match is reported; its children were never visited
    assert_eq!(report.removed, vec![root.join("outer")]);
    assert_eq!(report.visited, 1);
}

#[test]
fn test_marker_only_matches_object_id_value() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        &root.join("described/metainfo.yaml"),
        "ObjectId: LOC-1\nDescription: PT rules\nContentLabels:\n  - PT\n",
    );

    let report = prune_excluded(root, &PruneRules::default());

    assert_dir_exists(&root.join("described"));
    assert!(report.removed.is_empty());
}

#[cfg(unix)]
#[test]
fn test_unreadable_metainfo_is_logged_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_metainfo(&root.join("locked"), "PT-1");
    write_metainfo(&root.join("locked/child"), "PT-2");
    let record = root.join("locked/metainfo.yaml");
    fs::set_permissions(&record, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits
    if fs::read(&record).is_ok() {
        return;
    }

    let report = prune_excluded(root, &PruneRules::default());

    assert_dir_exists(&root.join("locked"));
    assert_not_exists(&root.join("locked/child"));
    assert_eq!(report.errors, 1);
}

#[test]
fn test_tab_indented_vendor_record_removed() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(&root.join("tabbed/metainfo.yaml"), "\tObjectId: PT-1\n");
    write(&root.join("tabbed/filter.flt"), "x");

    let report = prune_excluded(root, &PruneRules::default());

    assert_not_exists(&root.join("tabbed"));
    assert_eq!(report.removed, vec![root.join("tabbed")]);
    assert_eq!(report.errors, 0);
}

#[test]
fn test_malformed_vendor_records_removed() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        &root.join("two_docs/metainfo.yaml"),
        "Name: first\n---\nObjectId: PT-2\n",
    );
    fs::create_dir_all(root.join("non_utf8")).unwrap();
    fs::write(
        root.join("non_utf8/metainfo.yaml"),
        b"Name: caf\xe9\nObjectId: PT-3\n",
    )
    .unwrap();
    write(
        &root.join("bom_crlf/metainfo.yaml"),
        "\u{feff}ObjectId: PT-4\r\nName: x\r\n",
    );

    let report = prune_excluded(root, &PruneRules::default());

    assert_not_exists(&root.join("two_docs"));
    assert_not_exists(&root.join("non_utf8"));
    assert_not_exists(&root.join("bom_crlf"));
    assert_eq!(report.removed.len(), 3);
    assert_eq!(report.errors, 0);
}

#[test]
fn test_malformed_record_without_marker_kept() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(&root.join("ours/metainfo.yaml"), "\tObjectId: LOC-1\n");

    let report = prune_excluded(root, &PruneRules::default());

    assert_dir_exists(&root.join("ours"));
    assert_eq!(report.errors, 1);
}
