//! Baseline Store Tests
//!
//! ## Scenarios Covered
//!
//! 1. Round-trip: what is saved is what is loaded
//! 2. Idempotence: saving the same content twice is byte-identical
//! 3. Partial update: saving one variant keeps the others
//! 4. Variant order: existing variants keep their position
//! 5. Corrupt documents are reported with their cause
//! 6. File-type guard fires before any I/O

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{initial_entries, set};
use permcheck_core::model::EntrySet;
use permcheck_core::{BaselineStore, ExErrorKind, PermCheckError, PermissionEntry, VariantPermissionSet};
use proptest::prelude::*;
use std::error::Error;
use std::fs;
use tempfile::TempDir;

fn setup_store() -> (BaselineStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = BaselineStore::new(temp_dir.path().join("permission-baseline.xml")).unwrap();
    (store, temp_dir)
}

fn single(variant: &str, entries: EntrySet) -> VariantPermissionSet {
    [(variant, entries)].into_iter().collect()
}

fn feature_entries() -> EntrySet {
    set([
        PermissionEntry::feature("android.hardware.camera").with_required(false),
        PermissionEntry::feature("").with_gl_version("0x00020000"),
        PermissionEntry::feature("android.hardware.nfc"),
    ])
}

// ========== Round-trip and idempotence ==========

#[test]
fn test_round_trip_is_lossless() {
    let (store, _dir) = setup_store();
    let mut baseline = single("release", initial_entries());
    baseline.insert("debug", feature_entries());

    store.save(baseline.clone()).unwrap();

    assert_eq!(store.load().unwrap(), baseline);
}

#[test]
fn test_second_save_is_byte_identical() {
    let (store, _dir) = setup_store();
    let baseline = single("release", initial_entries());

    store.save(baseline.clone()).unwrap();
    let first = fs::read(store.path()).unwrap();
    store.save(baseline).unwrap();
    let second = fs::read(store.path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_document_layout() {
    let (store, _dir) = setup_store();
    store.save(single("release", initial_entries())).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(text.contains("<baseline>"));
    assert!(text.contains("    <variant name=\"release\">"));
    assert!(text.contains(
        "        <uses-permission name=\"android.permission.CAMERA\" maxSdkVersion=\"26\""
    ));
    assert!(text.ends_with("</baseline>\n"));
}

// ========== Merge ==========

#[test]
fn test_partial_update_preserves_other_variants() {
    let (store, _dir) = setup_store();
    let release = initial_entries();
    let debug = feature_entries();

    store.save(single("release", release.clone())).unwrap();
    store.save(single("debug", debug.clone())).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.get("release"), Some(&release));
    assert_eq!(loaded.get("debug"), Some(&debug));
}

#[test]
fn test_update_replaces_variant_wholesale() {
    let (store, _dir) = setup_store();
    store.save(single("release", initial_entries())).unwrap();

    let replacement = set([PermissionEntry::permission("android.permission.VIBRATE")]);
    store.save(single("release", replacement.clone())).unwrap();

    assert_eq!(store.load().unwrap(), single("release", replacement));
}

#[test]
fn test_existing_variants_keep_their_position() {
    let (store, _dir) = setup_store();
    let initial: VariantPermissionSet = [
        ("release", EntrySet::new()),
        ("debug", EntrySet::new()),
    ]
    .into_iter()
    .collect();
    store.save(initial).unwrap();

    let update: VariantPermissionSet = [
        ("staging", EntrySet::new()),
        ("release", set([PermissionEntry::permission("X")])),
    ]
    .into_iter()
    .collect();
    store.save(update).unwrap();

    let loaded = store.load().unwrap();
    let names: Vec<&str> = loaded.variant_names().collect();
    assert_eq!(names, vec!["release", "debug", "staging"]);
}

// ========== Failure modes ==========

#[test]
fn test_corrupt_document_keeps_cause() {
    let (store, _dir) = setup_store();
    fs::write(store.path(), "<baseline><variant name=\"release\">").unwrap();

    let err = store.load().unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptBaseline);
    assert!(err.source().is_some());
}

#[test]
fn test_wrong_root_is_corrupt() {
    let (store, _dir) = setup_store();
    fs::write(store.path(), "<violations/>").unwrap();

    assert!(matches!(
        store.load().unwrap_err(),
        PermCheckError::CorruptBaseline { .. }
    ));
}

#[test]
fn test_invalid_bound_is_corrupt() {
    let (store, _dir) = setup_store();
    fs::write(
        store.path(),
        r#"<baseline><variant name="release"><uses-permission name="CAMERA" maxSdkVersion="new"/></variant></baseline>"#,
    )
    .unwrap();

    assert_eq!(store.load().unwrap_err().kind(), ExErrorKind::CorruptBaseline);
}

#[test]
fn test_save_refuses_to_merge_into_corrupt_file() {
    let (store, _dir) = setup_store();
    fs::write(store.path(), "<other/>").unwrap();

    let err = store.save(single("release", initial_entries())).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptBaseline);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "<other/>");
}

#[test]
fn test_file_type_guard_precedes_io() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("baseline.txt");

    let err = BaselineStore::new(&target).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Configuration);
    assert!(!temp_dir.path().join("nested").exists());
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let store = BaselineStore::new(temp_dir.path().join("config").join("baseline.xml")).unwrap();

    store.save(single("release", initial_entries())).unwrap();

    assert!(store.exists());
}

// ========== Properties ==========

fn arb_entry() -> impl Strategy<Value = PermissionEntry> {
    let name = "[a-z]{1,6}(\\.[A-Z_]{1,8})?";
    prop_oneof![
        (name, prop::option::of(1u32..40)).prop_map(|(name, max)| {
            let entry = PermissionEntry::permission(name);
            match max {
                Some(max) => entry.with_max_version(max),
                None => entry,
            }
        }),
        (name, prop::option::of(1u32..40)).prop_map(|(name, max)| {
            let entry = PermissionEntry::runtime_permission(name);
            match max {
                Some(max) => entry.with_max_version(max),
                None => entry,
            }
        }),
        (
            prop::option::of(name),
            prop::option::of(any::<bool>()),
            prop::option::of("0x000[1-3]0000")
        )
            .prop_map(|(name, required, gl_version)| {
                let mut entry = PermissionEntry::feature(name.unwrap_or_default());
                if let Some(required) = required {
                    entry = entry.with_required(required);
                }
                if let Some(gl_version) = gl_version {
                    entry = entry.with_gl_version(gl_version);
                }
                entry
            }),
    ]
}

fn arb_baseline() -> impl Strategy<Value = VariantPermissionSet> {
    prop::collection::btree_map(
        "[a-z]{1,8}",
        prop::collection::btree_set(arb_entry(), 0..6),
        1..4,
    )
    .prop_map(|variants| variants.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_load_after_save_is_identity(baseline in arb_baseline()) {
        let (store, _dir) = setup_store();
        store.save(baseline.clone()).unwrap();
        prop_assert_eq!(store.load().unwrap(), baseline);
    }

    #[test]
    fn prop_save_is_idempotent(baseline in arb_baseline()) {
        let (store, _dir) = setup_store();
        store.save(baseline.clone()).unwrap();
        let first = fs::read(store.path()).unwrap();
        store.save(baseline).unwrap();
        prop_assert_eq!(first, fs::read(store.path()).unwrap());
    }
}
