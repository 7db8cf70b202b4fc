//! Verdict extraction from per-day report documents

pub mod document;
pub mod walk;

pub use document::ReportDocument;
pub use walk::{visit_tests, TestRef};

use crate::{Counts, Verdict};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// How tests in a report document are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    /// Direct specs of each top-level suite, judged by `ok` or `status`
    Flat,
    /// Every test in the suite tree, judged by its last attempt
    Nested,
    /// Like `Nested`, counting each test identity once
    #[default]
    Deduplicated,
}

impl FromStr for CountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(CountPolicy::Flat),
            "nested" => Ok(CountPolicy::Nested),
            "deduplicated" | "dedup" => Ok(CountPolicy::Deduplicated),
            other => Err(format!(
                "unknown policy '{}' (expected flat, nested or deduplicated)",
                other
            )),
        }
    }
}

impl std::fmt::Display for CountPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountPolicy::Flat => write!(f, "flat"),
            CountPolicy::Nested => write!(f, "nested"),
            CountPolicy::Deduplicated => write!(f, "deduplicated"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid report JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Counts for one report plus the names of the tests that failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub counts: Counts,
    pub failures: Vec<String>,
}

impl Extraction {
    fn record(&mut self, verdict: Verdict, name: impl FnOnce() -> String) {
        self.counts.record(verdict);
        if verdict == Verdict::Failed {
            self.failures.push(name());
        }
    }
}

/// Load and parse a report document
pub fn read_report(path: &Path) -> Result<ReportDocument, ExtractError> {
    let content = fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ExtractError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a report file and count it under `policy`
pub fn extract_file(path: &Path, policy: CountPolicy) -> Result<Extraction, ExtractError> {
    let doc = read_report(path)?;
    Ok(extract(&doc, policy))
}

/// Count the verdicts in `doc` under `policy`
pub fn extract(doc: &ReportDocument, policy: CountPolicy) -> Extraction {
    match policy {
        CountPolicy::Flat => extract_flat(doc),
        CountPolicy::Nested => extract_nested(doc, false),
        CountPolicy::Deduplicated => extract_nested(doc, true),
    }
}

fn extract_flat(doc: &ReportDocument) -> Extraction {
    let mut extraction = Extraction::default();
    for suite in &doc.suites {
        for spec in &suite.specs {
            let verdict = match (spec.ok, spec.status.as_deref()) {
                (Some(true), _) => Verdict::Passed,
                (Some(false), _) => Verdict::Failed,
                (None, Some(status)) => Verdict::from_status(status),
                (None, None) => Verdict::Other,
            };
            extraction.record(verdict, || {
                spec.display_name()
                    .unwrap_or_else(|| "(untitled spec)".to_string())
            });
        }
    }
    extraction
}

fn extract_nested(doc: &ReportDocument, dedup: bool) -> Extraction {
    let mut extraction = Extraction::default();
    let mut seen: HashSet<String> = HashSet::new();
    visit_tests(doc, |test| {
        if dedup {
            if let Some(identity) = test.identity() {
                if !seen.insert(identity) {
                    return;
                }
            }
        }
        extraction.record(test.verdict(), || test.display_name());
    });
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(json: &str) -> ReportDocument {
        serde_json::from_str(json).unwrap()
    }

    fn counts(passed: u64, failed: u64, other: u64) -> Counts {
        Counts {
            passed,
            failed,
            other,
        }
    }

    const RETRIED: &str = r#"{"suites":[{"specs":[{"tests":[
        {"id":"t1","results":[{"status":"failed"},{"status":"passed"}]}
    ]}]}]}"#;

    const RELISTED: &str = r#"{"suites":[
        {"title":"first","tests":[{"id":"t1","results":[{"status":"failed"}]}]},
        {"title":"second","suites":[{"specs":[{"tests":[{"id":"t1","results":[{"status":"passed"}]}]}]}]}
    ]}"#;

    #[test]
    fn nested_counts_only_last_attempt() {
        let result = extract(&doc(RETRIED), CountPolicy::Nested);
        assert_eq!(result.counts, counts(1, 0, 0));
        assert!(result.failures.is_empty());
    }

    #[test]
    fn nested_counts_relisted_tests_twice() {
        let result = extract(&doc(RELISTED), CountPolicy::Nested);
        assert_eq!(result.counts, counts(1, 1, 0));
    }

    #[test]
    fn dedup_counts_relisted_test_once() {
        let result = extract(&doc(RELISTED), CountPolicy::Deduplicated);
        assert_eq!(result.counts.total(), 1);
        // first appearance wins
        assert_eq!(result.counts, counts(0, 1, 0));
        assert_eq!(result.failures, vec!["t1".to_string()]);
    }

    #[test]
    fn dedup_never_merges_tests_without_identity() {
        let json = r#"{"suites":[{"tests":[
            {"results":[{"status":"passed"}]},
            {"results":[{"status":"passed"}]}
        ]}]}"#;
        let result = extract(&doc(json), CountPolicy::Deduplicated);
        assert_eq!(result.counts, counts(2, 0, 0));
    }

    #[test]
    fn dedup_uses_title_when_id_missing() {
        let json = r#"{"suites":[
            {"tests":[{"title":"logs in","results":[{"status":"passed"}]}]},
            {"tests":[{"title":"logs in","results":[{"status":"failed"}]}]}
        ]}"#;
        let result = extract(&doc(json), CountPolicy::Deduplicated);
        assert_eq!(result.counts, counts(1, 0, 0));
    }

    #[test]
    fn unknown_statuses_go_to_other() {
        let json = r#"{"suites":[{"tests":[
            {"id":"a","results":[{"status":"skipped"}]},
            {"id":"b","results":[{"status":"timedOut"}]},
            {"id":"c","results":[{"status":"interrupted"}]},
            {"id":"d","results":[{"status":"passed"}]}
        ]}]}"#;
        let result = extract(&doc(json), CountPolicy::Deduplicated);
        assert_eq!(result.counts, counts(1, 0, 3));
    }

    #[test]
    fn zero_tests_yields_zero_counts() {
        for policy in [CountPolicy::Flat, CountPolicy::Nested, CountPolicy::Deduplicated] {
            let result = extract(&doc(r#"{"suites":[]}"#), policy);
            assert_eq!(result.counts, Counts::default());
        }
    }

    #[test]
    fn flat_uses_ok_flag_then_status() {
        let json = r#"{"suites":[{"specs":[
            {"title":"a","ok":true},
            {"title":"b","ok":false},
            {"title":"c","status":"passed"},
            {"title":"d","status":"failed"},
            {"title":"e","status":"skipped"},
            {"title":"f","ok":true,"status":"failed"},
            {"title":"g"}
        ]}]}"#;
        let result = extract(&doc(json), CountPolicy::Flat);
        assert_eq!(result.counts, counts(3, 2, 2));
        assert_eq!(result.failures, vec!["b".to_string(), "d".to_string()]);
    }

    #[test]
    fn flat_scans_every_top_level_suite() {
        let json = r#"{"suites":[
            {"specs":[{"ok":true}]},
            {"specs":[{"ok":false}],"suites":[{"specs":[{"ok":true}]}]}
        ]}"#;
        let result = extract(&doc(json), CountPolicy::Flat);
        // nested suites are not part of the flat layout
        assert_eq!(result.counts, counts(1, 1, 0));
    }

    #[test]
    fn flat_ignores_nested_tests_inside_specs() {
        let json = r#"{"suites":[{"specs":[{"ok":true,"tests":[
            {"results":[{"status":"failed"}]}
        ]}]}]}"#;
        let result = extract(&doc(json), CountPolicy::Flat);
        assert_eq!(result.counts, counts(1, 0, 0));
    }

    #[test]
    fn extract_file_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, RETRIED).unwrap();
        let result = extract_file(&path, CountPolicy::Nested).unwrap();
        assert_eq!(result.counts, counts(1, 0, 0));
    }

    #[test]
    fn extract_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = extract_file(&dir.path().join("report.json"), CountPolicy::Nested).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
        assert!(err.to_string().contains("report.json"));
    }

    #[test]
    fn extract_file_malformed_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "{\"suites\": [ {").unwrap();
        let err = extract_file(&path, CountPolicy::Deduplicated).unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid report JSON"));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("flat".parse::<CountPolicy>().unwrap(), CountPolicy::Flat);
        assert_eq!("nested".parse::<CountPolicy>().unwrap(), CountPolicy::Nested);
        assert_eq!("dedup".parse::<CountPolicy>().unwrap(), CountPolicy::Deduplicated);
        assert!("strict".parse::<CountPolicy>().is_err());
        assert_eq!(CountPolicy::default().to_string(), "deduplicated");
    }
}
