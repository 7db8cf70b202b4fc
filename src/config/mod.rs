//! Configuration loading for Trendboard

mod schema;

pub use schema::{
    ChartConfig, ChartSource, CliOverrides, Config, DEFAULT_OUTPUT, DEFAULT_REPORTS_ROOT,
    DEFAULT_TITLE,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".trendboardrc.json";

/// Find and load the config file. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

fn read_config(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;
    Ok(config)
}

/// Search for .trendboardrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Contents written by `trendboard init`
pub fn default_config_json(reports_root: &str, policy: crate::CountPolicy) -> String {
    let value = serde_json::json!({
        "reportsRoot": reports_root,
        "reportFile": crate::pipeline::DEFAULT_REPORT_FILE,
        "detailPage": crate::pipeline::DEFAULT_DETAIL_PAGE,
        "output": DEFAULT_OUTPUT,
        "trendFile": crate::trend::DEFAULT_TREND_FILENAME,
        "policy": policy.to_string(),
        "dateFormat": "strict",
        "order": "newest-first",
        "chart": { "type": "line", "source": "inline" },
        "unstableLimit": crate::pipeline::DEFAULT_UNSTABLE_LIMIT,
        "title": DEFAULT_TITLE,
    });
    let mut json = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}
