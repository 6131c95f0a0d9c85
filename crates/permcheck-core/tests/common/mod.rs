use permcheck_core::model::EntrySet;
use permcheck_core::PermissionEntry;
use std::fs;
use std::path::{Path, PathBuf};

/// Wrap declaration elements in a manifest with the android namespace bound
#[allow(dead_code)]
pub fn manifest_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.app">
{}
    <application android:label="Example"/>
</manifest>
"#,
        body
    )
}

/// Write a manifest with the given body below `dir`
#[allow(dead_code)]
pub fn write_manifest(dir: &Path, file_name: &str, body: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, manifest_xml(body)).unwrap();
    path
}

/// Collect entries into a set
#[allow(dead_code)]
pub fn set<I: IntoIterator<Item = PermissionEntry>>(entries: I) -> EntrySet {
    entries.into_iter().collect()
}

/// The three-entry manifest of the "fresh baseline" scenario
#[allow(dead_code)]
pub fn initial_entries() -> EntrySet {
    set([
        PermissionEntry::permission("android.permission.INTERNET"),
        PermissionEntry::permission("android.permission.CAMERA").with_max_version(26),
        PermissionEntry::runtime_permission("android.permission.ACCESS_NETWORK_STATE"),
    ])
}

#[allow(dead_code)]
pub const INITIAL_MANIFEST_BODY: &str = r#"
    <uses-permission android:name="android.permission.INTERNET"/>
    <uses-permission android:name="android.permission.CAMERA" android:maxSdkVersion="26"/>
    <uses-permission-sdk-23 android:name="android.permission.ACCESS_NETWORK_STATE"/>
"#;
