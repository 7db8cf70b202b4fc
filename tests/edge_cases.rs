//! Edge case tests: degenerate report files and directory layouts must not panic.

use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use trendboard::extractor::{extract, extract_file, ExtractError, ReportDocument};
use trendboard::{build_dashboard, CountPolicy, Counts, PipelineConfig, SkipReason};

const POLICIES: [CountPolicy; 3] = [CountPolicy::Flat, CountPolicy::Nested, CountPolicy::Deduplicated];

fn report_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn extract_str(json: &str, policy: CountPolicy) -> Counts {
    let doc: ReportDocument = serde_json::from_str(json).unwrap();
    extract(&doc, policy).counts
}

#[test]
fn empty_file_is_parse_error() {
    let file = report_file("");
    let err = extract_file(file.path(), CountPolicy::Deduplicated).unwrap_err();
    assert!(matches!(err, ExtractError::Parse { .. }));
}

#[test]
fn not_json_is_parse_error() {
    let file = report_file("hello world");
    assert!(extract_file(file.path(), CountPolicy::Nested).is_err());
}

#[test]
fn wrong_shape_is_parse_error() {
    let file = report_file(r#"{"suites": "not a list"}"#);
    assert!(matches!(
        extract_file(file.path(), CountPolicy::Nested),
        Err(ExtractError::Parse { .. })
    ));
}

#[test]
fn empty_object_counts_nothing() {
    for policy in POLICIES {
        assert_eq!(extract_str("{}", policy), Counts::default());
    }
}

#[test]
fn null_arrays_are_treated_as_empty() {
    let json = r#"{"suites":[{"specs":null,"tests":null,"suites":null}]}"#;
    for policy in POLICIES {
        assert_eq!(extract_str(json, policy), Counts::default());
    }
}

#[test]
fn null_suites_at_top_level() {
    for policy in POLICIES {
        assert_eq!(extract_str(r#"{"suites":null}"#, policy), Counts::default());
    }
}

#[test]
fn unknown_fields_are_ignored() {
    let json = r#"{"config":{"workers":4},"stats":{"expected":1},"suites":[
        {"file":"a.spec.ts","line":3,"tests":[{"id":"x","annotations":[],"results":[{"status":"passed","duration":12}]}]}
    ]}"#;
    assert_eq!(extract_str(json, CountPolicy::Nested).passed, 1);
}

#[test]
fn test_with_no_results_is_other() {
    let json = r#"{"suites":[{"tests":[{"id":"a","results":[]},{"id":"b"}]}]}"#;
    assert_eq!(
        extract_str(json, CountPolicy::Nested),
        Counts {
            passed: 0,
            failed: 0,
            other: 2
        }
    );
}

#[test]
fn result_without_status_is_other() {
    let json = r#"{"suites":[{"tests":[{"id":"a","results":[{"status":"passed"},{}]}]}]}"#;
    assert_eq!(extract_str(json, CountPolicy::Nested).other, 1);
}

#[test]
fn numeric_ids_dedupe() {
    let json = r#"{"suites":[
        {"tests":[{"id":7,"results":[{"status":"passed"}]}]},
        {"tests":[{"id":7,"results":[{"status":"passed"}]}]}
    ]}"#;
    assert_eq!(extract_str(json, CountPolicy::Deduplicated).passed, 1);
    assert_eq!(extract_str(json, CountPolicy::Nested).passed, 2);
}

#[test]
fn deep_nesting_no_panic() {
    let depth = 40;
    let mut json = String::from(r#"{"suites":["#);
    for _ in 0..depth {
        json.push_str(r#"{"suites":["#);
    }
    json.push_str(r#"{"tests":[{"id":"deep","results":[{"status":"failed"}]}]}"#);
    for _ in 0..depth {
        json.push_str("]}");
    }
    json.push_str("]}");
    assert_eq!(extract_str(&json, CountPolicy::Deduplicated).failed, 1);
}

#[test]
fn unicode_titles_survive() {
    let json = r#"{"suites":[{"tests":[{"title":"ログイン ✓","results":[{"status":"failed"}]}]}]}"#;
    let doc: ReportDocument = serde_json::from_str(json).unwrap();
    let result = extract(&doc, CountPolicy::Deduplicated);
    assert_eq!(result.failures, vec!["ログイン ✓".to_string()]);
}

// --- Directory layouts ---

#[test]
fn empty_root_gives_empty_dashboard() {
    let dir = TempDir::new().unwrap();
    let dashboard = build_dashboard(dir.path(), &PipelineConfig::default()).unwrap();
    assert!(dashboard.days.is_empty());
    assert!(dashboard.skipped.is_empty());
    assert!(dashboard.latest().is_none());
}

#[test]
fn root_that_is_a_file_is_not_found() {
    let file = report_file("{}");
    assert!(build_dashboard(file.path(), &PipelineConfig::default()).is_err());
}

#[test]
fn report_path_that_is_a_directory_is_missing() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("2025-06-01/report.json")).unwrap();
    let dashboard = build_dashboard(dir.path(), &PipelineConfig::default()).unwrap();
    assert!(dashboard.days.is_empty());
    assert_eq!(dashboard.skipped[0].reason, SkipReason::MissingReport);
}

#[test]
fn near_miss_date_names_are_ignored() {
    let dir = TempDir::new().unwrap();
    for name in ["2025-6-01", "2025-02-30", "20250601", "2025-06-01-rerun", " 2025-06-01"] {
        let day = dir.path().join(name);
        fs::create_dir_all(&day).unwrap();
        fs::write(day.join("report.json"), "{}").unwrap();
    }
    let dashboard = build_dashboard(dir.path(), &PipelineConfig::default()).unwrap();
    assert!(dashboard.days.is_empty());
    assert!(dashboard.skipped.is_empty());
}

#[test]
fn loose_report_at_root_is_ignored() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("report.json"), "{}").unwrap();
    fs::write(dir.path().join("2025-06-01"), "not a directory").unwrap();
    let dashboard = build_dashboard(dir.path(), &PipelineConfig::default()).unwrap();
    assert!(dashboard.days.is_empty());
}

#[cfg(unix)]
#[test]
fn symlinked_day_directory_is_followed() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("archive");
    fs::create_dir_all(&target).unwrap();
    fs::write(
        target.join("report.json"),
        r#"{"suites":[{"tests":[{"id":"a","results":[{"status":"passed"}]}]}]}"#,
    )
    .unwrap();
    let root = dir.path().join("Reports");
    fs::create_dir_all(&root).unwrap();
    std::os::unix::fs::symlink(&target, root.join("2025-06-01")).unwrap();

    let dashboard = build_dashboard(Path::new(&root), &PipelineConfig::default()).unwrap();
    assert_eq!(dashboard.days.len(), 1);
    assert_eq!(dashboard.days[0].counts.passed, 1);
}
