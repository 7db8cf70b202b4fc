//! Console reporter with colored output

use crate::trend::format_delta;
use crate::{Counts, Dashboard, DayReport};
use chrono::NaiveDate;
use colored::Colorize;
use std::collections::HashMap;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show skipped days and unstable tests
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the dashboard summary to stdout
    pub fn report(&self, dashboard: &Dashboard) {
        print!("{}", self.render(dashboard));
    }

    /// Render the dashboard summary as text
    pub fn render(&self, dashboard: &Dashboard) -> String {
        let mut out = String::new();
        let previous = previous_failures(&dashboard.days);
        let width = dashboard
            .days
            .iter()
            .map(|d| d.date.chars().count())
            .max()
            .unwrap_or(10);

        for day in &dashboard.days {
            let delta = format_delta(previous.get(day.date.as_str()).copied(), day.counts.failed);
            out.push_str(&format!(
                "   {:<width$}  {}  {}  {}{}\n",
                day.date,
                self.paint_passed(day.counts.passed),
                self.paint_failed(day.counts.failed),
                self.paint_other(day.counts.other),
                self.dim(&delta),
                width = width,
            ));
        }

        if self.verbose {
            for skipped in &dashboard.skipped {
                out.push_str(&format!(
                    "   {:<width$}  {}\n",
                    skipped.date,
                    self.dim(&format!("skipped: {}", skipped.reason)),
                    width = width,
                ));
            }
            if !dashboard.unstable.is_empty() {
                out.push('\n');
                out.push_str(&format!("   {}\n", self.bold("Top unstable tests:")));
                for test in &dashboard.unstable {
                    out.push_str(&format!(
                        "   {:>3} day{}  {}\n",
                        test.failures,
                        if test.failures == 1 { " " } else { "s" },
                        test.name
                    ));
                }
            }
        }

        out.push_str(&self.render_summary(dashboard));
        out
    }

    fn render_summary(&self, dashboard: &Dashboard) -> String {
        let totals: Counts = dashboard.totals();
        let rate = dashboard
            .latest()
            .and_then(|d| d.counts.pass_rate())
            .map(|r| format!("{:.1}%", r))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "\n   {} {} day{}, {} passed, {} failed, {} other, latest pass rate {}\n",
            self.bold("Summary:"),
            dashboard.days.len(),
            if dashboard.days.len() == 1 { "" } else { "s" },
            totals.passed,
            totals.failed,
            totals.other,
            rate
        )
    }

    fn paint_passed(&self, n: u64) -> String {
        let s = format!("{:>5} passed", n);
        if self.use_colors {
            s.green().to_string()
        } else {
            s
        }
    }

    fn paint_failed(&self, n: u64) -> String {
        let s = format!("{:>5} failed", n);
        if self.use_colors && n > 0 {
            s.red().bold().to_string()
        } else {
            s
        }
    }

    fn paint_other(&self, n: u64) -> String {
        let s = format!("{:>5} other", n);
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Failures of the chronologically preceding day, keyed by day.
/// Dated days are compared with dated days only, undated names with each other.
fn previous_failures(days: &[DayReport]) -> HashMap<&str, u64> {
    let mut sorted: Vec<(Option<NaiveDate>, &DayReport)> = days
        .iter()
        .map(|day| (day.chronological_key().0, day))
        .collect();
    sorted.sort_by(|a, b| (a.0, a.1.date.as_str()).cmp(&(b.0, b.1.date.as_str())));
    sorted
        .windows(2)
        .filter(|pair| pair[0].0.is_some() == pair[1].0.is_some())
        .map(|pair| (pair[1].1.date.as_str(), pair[0].1.counts.failed))
        .collect()
}
