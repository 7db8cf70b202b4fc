//! Trend file - the ordered per-day counts that drive the chart

use crate::DayReport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TREND_FILENAME: &str = "trend.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub passed: u64,
    pub failed: u64,
    #[serde(default)]
    pub other: u64,
}

/// Trend sequence in the same order as `days`
pub fn trend_points(days: &[DayReport]) -> Vec<TrendPoint> {
    days.iter()
        .map(|day| TrendPoint {
            date: day.date.clone(),
            passed: day.counts.passed,
            failed: day.counts.failed,
            other: day.counts.other,
        })
        .collect()
}

/// Serialized trend file contents. Deterministic for equal input.
pub fn render_trend(points: &[TrendPoint]) -> String {
    let mut content = serde_json::to_string_pretty(points).unwrap_or_else(|_| "[]".to_string());
    content.push('\n');
    content
}

/// Write the trend file, creating parent directories
pub fn save_trend(path: &Path, points: &[TrendPoint]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_trend(points))
}

/// Load a trend file (or an empty trend when missing or corrupt)
pub fn load_trend(path: &Path) -> Vec<TrendPoint> {
    if let Ok(content) = fs::read_to_string(path) {
        if let Ok(points) = serde_json::from_str::<Vec<TrendPoint>>(&content) {
            return points;
        }
    }
    Vec::new()
}

/// Format failure delta for console: "[was 3 failing, up 2]" or "[unchanged at 3 failing]" or ""
pub fn format_delta(previous: Option<u64>, current: u64) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    if prev == current {
        return format!(" [unchanged at {} failing]", current);
    }
    if current > prev {
        format!(" [was {} failing, up {}]", prev, current - prev)
    } else {
        format!(" [was {} failing, down {}]", prev, prev - current)
    }
}
