//! Reporter Tests
//!
//! ## Scenarios Covered
//!
//! 1. Log output per variant, blank-line separated
//! 2. XML report structure and attribute order
//! 3. HTML report cards
//! 4. Deterministic output and file writing
//! 5. File-type guards

#![allow(clippy::unwrap_used, clippy::expect_used)]

use permcheck_core::report::{html_reporter, xml_reporter};
use permcheck_core::{
    ExErrorKind, HtmlReporter, LogReporter, PermissionEntry, Reporter, Violation, ViolationKind,
    ViolationReport,
};
use std::fs;
use tempfile::TempDir;

fn debug_violations() -> Vec<Violation> {
    vec![
        Violation::added(PermissionEntry::permission("android.permission.CAMERA")),
        Violation::max_version_increased(
            PermissionEntry::permission("android.permission.ACCESS_FINE_LOCATION"),
            Some(27),
        ),
    ]
}

fn release_violations() -> Vec<Violation> {
    vec![
        Violation::removed(PermissionEntry::runtime_permission(
            "android.permission.ACCESS_COARSE_LOCATION",
        )),
        Violation::max_version_decreased(
            PermissionEntry::runtime_permission("android.permission.INTERNET").with_max_version(25),
            Some(28),
        ),
    ]
}

fn sample_report() -> ViolationReport {
    [
        ("debug", debug_violations()),
        ("release", release_violations()),
    ]
    .into_iter()
    .collect()
}

// ========== Log ==========

#[test]
fn test_log_report_for_multiple_variants() {
    let reporter = LogReporter::new(Vec::new());
    reporter.report(&sample_report()).unwrap();
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    let expected = [
        "Found 2 violation(s) for variant debug",
        r#"New permission '<uses-permission android:name="android.permission.CAMERA" />' was added"#,
        r#"Max SDK of permission '<uses-permission android:name="android.permission.ACCESS_FINE_LOCATION" />' was increased (from 27)"#,
        "",
        "Found 2 violation(s) for variant release",
        r#"Permission '<uses-permission-sdk-23 android:name="android.permission.ACCESS_COARSE_LOCATION" />' was removed"#,
        r#"Max SDK of permission '<uses-permission-sdk-23 android:name="android.permission.INTERNET" android:maxSdkVersion="25" />' was decreased (from 28)"#,
    ];
    assert_eq!(output.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn test_feature_change_messages() {
    let report: ViolationReport = [(
        "release",
        vec![
            Violation::new(
                ViolationKind::RequiredChanged {
                    entry: PermissionEntry::feature("android.hardware.camera").with_required(false),
                    from: Some(true),
                },
                false,
            ),
            Violation::new(
                ViolationKind::CapabilityChanged {
                    entry: PermissionEntry::feature("").with_gl_version("0x00030000"),
                    from: None,
                },
                false,
            ),
        ],
    )]
    .into_iter()
    .collect();

    let reporter = LogReporter::new(Vec::new());
    reporter.report(&report).unwrap();
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(output.contains(
        r#"Required of '<uses-feature android:name="android.hardware.camera" android:required="false" />' has changed (required true)"#
    ));
    assert!(output.contains(
        r#"GlEsVersion of '<uses-feature android:glEsVersion="0x00030000" />' has changed (glEsVersion -)"#
    ));
}

// ========== XML ==========

#[test]
fn test_xml_report_document() {
    let xml = String::from_utf8(xml_reporter::render(&sample_report(), "test").unwrap()).unwrap();

    let expected = [
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<violations>"#,
        r#"    <variant name="debug">"#,
        r#"        <violation type="added">"#,
        r#"            <uses-permission name="android.permission.CAMERA" />"#,
        r#"        </violation>"#,
        r#"        <violation type="max-sdk-increased" previousMaxSdkVersion="27">"#,
        r#"            <uses-permission name="android.permission.ACCESS_FINE_LOCATION" />"#,
        r#"        </violation>"#,
        r#"    </variant>"#,
        r#"    <variant name="release">"#,
        r#"        <violation type="removed" strict="true">"#,
        r#"            <uses-permission-sdk-23 name="android.permission.ACCESS_COARSE_LOCATION" />"#,
        r#"        </violation>"#,
        r#"        <violation type="max-sdk-decreased" strict="true" previousMaxSdkVersion="28">"#,
        r#"            <uses-permission-sdk-23 name="android.permission.INTERNET" maxSdkVersion="25" />"#,
        r#"        </violation>"#,
        r#"    </variant>"#,
        r#"</violations>"#,
        "",
    ]
    .join("\n");
    assert_eq!(xml, expected);
}

#[test]
fn test_xml_report_document_with_feature_changes() {
    let report: ViolationReport = [
        (
            "release",
            vec![
                Violation::new(
                    ViolationKind::RequiredChanged {
                        entry: PermissionEntry::feature("android.hardware.camera")
                            .with_required(false),
                        from: Some(true),
                    },
                    false,
                ),
                Violation::new(
                    ViolationKind::CapabilityChanged {
                        entry: PermissionEntry::feature("").with_gl_version("0x00030000"),
                        from: Some("0x00020000".to_string()),
                    },
                    false,
                ),
            ],
        ),
        ("debug", Vec::new()),
    ]
    .into_iter()
    .collect();
    let xml = String::from_utf8(xml_reporter::render(&report, "test").unwrap()).unwrap();

    let expected = [
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<violations>"#,
        r#"    <variant name="release">"#,
        r#"        <violation type="required-changed" previousRequired="true">"#,
        r#"            <uses-feature name="android.hardware.camera" required="false" />"#,
        r#"        </violation>"#,
        r#"        <violation type="glEsVersion-changed" previousGlEsVersion="0x00020000">"#,
        r#"            <uses-feature glEsVersion="0x00030000" />"#,
        r#"        </violation>"#,
        r#"    </variant>"#,
        r#"    <variant name="debug" />"#,
        r#"</violations>"#,
        "",
    ]
    .join("\n");
    assert_eq!(xml, expected);
}

#[test]
fn test_xml_report_lists_clean_variants() {
    let report: ViolationReport = [("debug", Vec::new()), ("release", debug_violations())]
        .into_iter()
        .collect();
    let xml = String::from_utf8(xml_reporter::render(&report, "test").unwrap()).unwrap();

    assert!(xml.contains("name=\"debug\""));
}

#[test]
fn test_xml_reporter_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir
        .path()
        .join("build")
        .join("reports")
        .join("permcheck.xml");
    let reporter = permcheck_core::XmlReporter::new(&target).unwrap();

    reporter.report(&sample_report()).unwrap();

    let written = fs::read(&target).unwrap();
    assert_eq!(written, xml_reporter::render(&sample_report(), "test").unwrap());
}

// ========== HTML ==========

#[test]
fn test_html_report_cards() {
    let html = String::from_utf8(html_reporter::render(&sample_report(), "test").unwrap()).unwrap();

    assert!(!html.starts_with("<?xml"));
    assert!(html.contains("<title>PermissionCheck Report</title>"));
    assert!(html.contains("<body class=\"bg-light\">"));
    assert_eq!(html.matches("card mt-4 mb-4 bg-dark").count(), 2);
    assert_eq!(html.matches(">strict</span>").count(), 2);
    assert!(html.contains("<h5>Max SDK decreased</h5>"));
    assert!(html.contains(
        "<p>Manifest contains a lower max SDK for permission than the baseline entry.</p>"
    ));
}

#[test]
fn test_html_reporter_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("permcheck.html");
    let reporter = HtmlReporter::new(&target).unwrap();

    reporter.report(&sample_report()).unwrap();

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("<b>release</b>"));
}

// ========== Determinism and guards ==========

#[test]
fn test_output_is_deterministic() {
    let report = sample_report();
    assert_eq!(
        xml_reporter::render(&report, "a").unwrap(),
        xml_reporter::render(&report, "b").unwrap()
    );
    assert_eq!(
        html_reporter::render(&report, "a").unwrap(),
        html_reporter::render(&report, "b").unwrap()
    );
}

#[test]
fn test_file_type_guards() {
    let temp_dir = TempDir::new().unwrap();

    let xml_err = permcheck_core::XmlReporter::new(temp_dir.path().join("report.html")).unwrap_err();
    let html_err = HtmlReporter::new(temp_dir.path().join("report.xml")).unwrap_err();

    assert_eq!(xml_err.kind(), ExErrorKind::Configuration);
    assert_eq!(html_err.kind(), ExErrorKind::Configuration);
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
