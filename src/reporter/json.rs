//! JSON reporter for machine-readable output

use crate::{Dashboard, DayReport, SkippedDay, UnstableTest};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report the dashboard with a summary block
    pub fn report(&self, dashboard: &Dashboard) -> String {
        let totals = dashboard.totals();
        let output = JsonOutput {
            days: &dashboard.days,
            skipped: &dashboard.skipped,
            unstable: &dashboard.unstable,
            summary: JsonSummary {
                days: dashboard.days.len(),
                skipped: dashboard.skipped.len(),
                passed: totals.passed,
                failed: totals.failed,
                other: totals.other,
                latest_pass_rate: dashboard.latest().and_then(|d| d.counts.pass_rate()),
            },
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    days: &'a [DayReport],
    skipped: &'a [SkippedDay],
    unstable: &'a [UnstableTest],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    days: usize,
    skipped: usize,
    passed: u64,
    failed: u64,
    other: u64,
    latest_pass_rate: Option<f64>,
}
