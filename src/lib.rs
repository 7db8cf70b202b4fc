//! Trendboard: daily test report dashboard
//!
//! Reads per-day JSON test reports from dated directories, counts verdicts
//! per day and renders a static HTML dashboard with a pass/fail trend chart.

pub mod config;
pub mod discovery;
pub mod extractor;
pub mod pipeline;
pub mod reporter;
pub mod trend;
pub mod unstable;

pub use extractor::CountPolicy;
pub use pipeline::{build_dashboard, PipelineConfig, Window};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Final verdict of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Failed,
    /// Skipped, timed out, interrupted, unknown, or never attempted
    Other,
}

impl Verdict {
    /// Map a runner status string to a verdict. Unknown statuses are `Other`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "passed" => Verdict::Passed,
            "failed" => Verdict::Failed,
            _ => Verdict::Other,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Passed => write!(f, "passed"),
            Verdict::Failed => write!(f, "failed"),
            Verdict::Other => write!(f, "other"),
        }
    }
}

/// Verdict counts for one day (or a sum of days)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub passed: u64,
    pub failed: u64,
    #[serde(default)]
    pub other: u64,
}

impl Counts {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Passed => self.passed += 1,
            Verdict::Failed => self.failed += 1,
            Verdict::Other => self.other += 1,
        }
    }

    /// Number of tests counted, whatever their verdict
    pub fn total(&self) -> u64 {
        self.passed + self.failed + self.other
    }

    /// Share of counted tests that passed, in percent. `None` when nothing was counted.
    pub fn pass_rate(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            None
        } else {
            Some(self.passed as f64 * 100.0 / total as f64)
        }
    }

    pub fn add(&mut self, other: &Counts) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.other += other.other;
    }
}

/// Aggregated result for one day directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    /// Day directory name (YYYY-MM-DD under the strict date filter)
    pub date: String,
    #[serde(flatten)]
    pub counts: Counts,
    /// Link to the day's HTML detail report, when the page exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Why a day directory did not make it into the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SkipReason {
    /// No report document in the directory
    MissingReport,
    /// The report document could not be read or parsed
    Unreadable { message: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingReport => write!(f, "no report file"),
            SkipReason::Unreadable { message } => write!(f, "{}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDay {
    pub date: String,
    pub reason: SkipReason,
}

/// A test that failed on one or more of the included days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnstableTest {
    pub name: String,
    /// Number of days on which the test's final verdict was failed
    pub failures: u64,
}

/// Everything one run computes; input to every reporter
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Included days, in listing order. The trend sequence uses the same order.
    pub days: Vec<DayReport>,
    pub skipped: Vec<SkippedDay>,
    pub unstable: Vec<UnstableTest>,
}

impl Dashboard {
    /// Sum of all included days
    pub fn totals(&self) -> Counts {
        let mut totals = Counts::default();
        for day in &self.days {
            totals.add(&day.counts);
        }
        totals
    }

    /// The most recent included day: greatest parsed date, or greatest
    /// name when no day name parses as a date
    pub fn latest(&self) -> Option<&DayReport> {
        self.days.iter().max_by(|a, b| a.chronological_key().cmp(&b.chronological_key()))
    }
}

impl DayReport {
    /// Sort key for time order. Undated names sort before every dated day.
    pub fn chronological_key(&self) -> (Option<NaiveDate>, &str) {
        (discovery::parse_day(&self.date).ok(), self.date.as_str())
    }
}
