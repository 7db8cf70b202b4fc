//! One dashboard run: discover day directories, extract each report, rank failures

use crate::discovery::{in_window, list_day_dirs, sort_days, DateFilter, DayDir, DayOrder, DiscoveryError};
use crate::extractor::{extract_file, CountPolicy};
use crate::unstable::rank_unstable;
use crate::{Dashboard, DayReport, SkipReason, SkippedDay};
use chrono::NaiveDate;
use std::path::Path;

pub const DEFAULT_REPORT_FILE: &str = "report.json";
pub const DEFAULT_DETAIL_PAGE: &str = "index.html";
pub const DEFAULT_UNSTABLE_LIMIT: usize = 10;

/// Keep only the `days` calendar days ending at `today`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub today: NaiveDate,
    pub days: u32,
}

/// Inputs to [`build_dashboard`] besides the reports root
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Report document inside each day directory
    pub report_file: String,
    /// HTML detail report inside each day directory
    pub detail_page: String,
    /// Prefix for detail links; the reports root when `None`
    pub link_base: Option<String>,
    pub policy: CountPolicy,
    pub date_filter: DateFilter,
    pub order: DayOrder,
    pub window: Option<Window>,
    pub unstable_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            report_file: DEFAULT_REPORT_FILE.to_string(),
            detail_page: DEFAULT_DETAIL_PAGE.to_string(),
            link_base: None,
            policy: CountPolicy::default(),
            date_filter: DateFilter::default(),
            order: DayOrder::default(),
            window: None,
            unstable_limit: DEFAULT_UNSTABLE_LIMIT,
        }
    }
}

/// Build the dashboard for every day directory under `root`.
///
/// A day whose report is missing or unreadable is left out and recorded in
/// [`Dashboard::skipped`]; only discovery failures are errors.
pub fn build_dashboard(root: &Path, config: &PipelineConfig) -> Result<Dashboard, DiscoveryError> {
    let mut dirs = list_day_dirs(root, config.date_filter)?;
    // a zero-day window means no window
    if let Some(window) = config.window.filter(|w| w.days > 0) {
        dirs.retain(|dir| match dir.date {
            Some(date) => in_window(date, window.today, window.days),
            None => true,
        });
    }
    sort_days(&mut dirs, config.order);

    let link_base = config
        .link_base
        .clone()
        .unwrap_or_else(|| root.to_string_lossy().replace('\\', "/"));

    let mut dashboard = Dashboard::default();
    let mut daily_failures = Vec::new();
    for dir in &dirs {
        let report_path = dir.path.join(&config.report_file);
        if !report_path.is_file() {
            dashboard.skipped.push(SkippedDay {
                date: dir.name.clone(),
                reason: SkipReason::MissingReport,
            });
            continue;
        }
        match extract_file(&report_path, config.policy) {
            Ok(extraction) => {
                dashboard.days.push(DayReport {
                    date: dir.name.clone(),
                    counts: extraction.counts,
                    detail: detail_link(dir, &config.detail_page, &link_base),
                });
                daily_failures.push(extraction.failures);
            }
            Err(e) => dashboard.skipped.push(SkippedDay {
                date: dir.name.clone(),
                reason: SkipReason::Unreadable {
                    message: e.to_string(),
                },
            }),
        }
    }

    dashboard.unstable = rank_unstable(&daily_failures, config.unstable_limit);
    Ok(dashboard)
}

fn detail_link(dir: &DayDir, detail_page: &str, link_base: &str) -> Option<String> {
    if !dir.path.join(detail_page).is_file() {
        return None;
    }
    let page = detail_page
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/");
    let base = link_base.trim_end_matches('/');
    if base.is_empty() {
        Some(format!("{}/{}", encode_segment(&dir.name), page))
    } else {
        Some(format!("{}/{}/{}", base, encode_segment(&dir.name), page))
    }
}

/// Percent-encode one URL path segment; only RFC 3986 unreserved bytes pass through
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte))
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
