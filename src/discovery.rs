//! Discovery of dated day directories under a reports root

use chrono::{Days, NaiveDate};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use walkdir::WalkDir;

/// Directory names must be ISO calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Reports directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Failed to list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Not a YYYY-MM-DD date: {0:?}")]
    InvalidDate(String),
}

/// Which subdirectory names count as days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    /// Only names that parse as YYYY-MM-DD
    #[default]
    Strict,
    /// Every subdirectory
    Any,
}

impl FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(DateFilter::Strict),
            "any" => Ok(DateFilter::Any),
            other => Err(format!("unknown date format '{}' (expected strict or any)", other)),
        }
    }
}

/// Listing order for days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayOrder {
    #[default]
    NewestFirst,
    Lexicographic,
}

impl FromStr for DayOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest-first" | "newest" => Ok(DayOrder::NewestFirst),
            "lexicographic" | "name" => Ok(DayOrder::Lexicographic),
            other => Err(format!(
                "unknown order '{}' (expected newest-first or lexicographic)",
                other
            )),
        }
    }
}

impl std::fmt::Display for DayOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayOrder::NewestFirst => write!(f, "newest-first"),
            DayOrder::Lexicographic => write!(f, "lexicographic"),
        }
    }
}

/// A discovered day directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDir {
    pub name: String,
    /// Parsed date; `None` only under [`DateFilter::Any`]
    pub date: Option<NaiveDate>,
    pub path: PathBuf,
}

/// Parse a directory name as a day. Accepts exactly `YYYY-MM-DD` naming a real date.
pub fn parse_day(name: &str) -> Result<NaiveDate, DiscoveryError> {
    let invalid = || DiscoveryError::InvalidDate(name.to_string());
    let bytes = name.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(name, DATE_FORMAT).map_err(|_| invalid())?;
    // chrono tolerates unpadded fields; the name must be canonical
    if date.format(DATE_FORMAT).to_string() != name {
        return Err(invalid());
    }
    Ok(date)
}

/// List the immediate subdirectories of `root` that qualify as days.
///
/// Unreadable entries below the root are skipped. Non-UTF-8 names are skipped.
pub fn list_day_dirs(root: &Path, filter: DateFilter) -> Result<Vec<DayDir>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }

    let mut days = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(DiscoveryError::Io {
                    path: root.to_path_buf(),
                    source: e,
                })
            }
            Err(_) => continue,
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let date = parse_day(name).ok();
        if filter == DateFilter::Strict && date.is_none() {
            continue;
        }
        days.push(DayDir {
            name: name.to_string(),
            date,
            path: entry.path().to_path_buf(),
        });
    }
    Ok(days)
}

/// Sort days for listing. Undated names go after all dated ones under newest-first.
pub fn sort_days(days: &mut [DayDir], order: DayOrder) {
    match order {
        DayOrder::NewestFirst => days.sort_by(|a, b| match (a.date, b.date) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| b.name.cmp(&a.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.name.cmp(&a.name),
        }),
        DayOrder::Lexicographic => days.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

/// True when `date` falls in the `window_days` calendar days ending at `today`
pub fn in_window(date: NaiveDate, today: NaiveDate, window_days: u32) -> bool {
    if window_days == 0 {
        return false;
    }
    let start = today
        .checked_sub_days(Days::new(u64::from(window_days - 1)))
        .unwrap_or(NaiveDate::MIN);
    date >= start && date <= today
}
