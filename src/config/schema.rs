//! Config schema and deserialization

use crate::discovery::{DateFilter, DayOrder};
use crate::pipeline::{
    PipelineConfig, Window, DEFAULT_DETAIL_PAGE, DEFAULT_REPORT_FILE, DEFAULT_UNSTABLE_LIMIT,
};
use crate::reporter::ChartKind;
use crate::trend::DEFAULT_TREND_FILENAME;
use crate::CountPolicy;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORTS_ROOT: &str = "Reports";
pub const DEFAULT_OUTPUT: &str = "index.html";
pub const DEFAULT_TITLE: &str = "Test Dashboard";

fn default_trend_file() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_TREND_FILENAME))
}

/// How the chart gets its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartSource {
    /// Trend data embedded in the page (works from file://)
    #[default]
    Inline,
    /// Page fetches the trend file when viewed
    Fetch,
}

/// Chart settings
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default, rename = "type")]
    pub kind: ChartKind,

    #[serde(default)]
    pub source: ChartSource,
}

/// Root config structure for .trendboardrc.json
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one subdirectory per day
    #[serde(default)]
    pub reports_root: Option<PathBuf>,

    /// Report document inside each day directory (default: report.json)
    #[serde(default)]
    pub report_file: Option<String>,

    /// HTML detail report inside each day directory (default: index.html)
    #[serde(default)]
    pub detail_page: Option<String>,

    /// Dashboard output path (default: index.html)
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Trend file path; `null` disables the trend file
    #[serde(default = "default_trend_file")]
    pub trend_file: Option<PathBuf>,

    #[serde(default)]
    pub policy: CountPolicy,

    #[serde(default)]
    pub date_format: DateFilter,

    #[serde(default)]
    pub order: DayOrder,

    /// Only show the last N calendar days; 0 shows every day
    #[serde(default)]
    pub window_days: Option<u32>,

    #[serde(default)]
    pub chart: ChartConfig,

    /// Rows in the unstable tests table; 0 hides it
    #[serde(default)]
    pub unstable_limit: Option<usize>,

    #[serde(default)]
    pub title: Option<String>,

    /// Prefix for detail links (default: the reports root)
    #[serde(default)]
    pub link_base: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reports_root: None,
            report_file: None,
            detail_page: None,
            output: None,
            trend_file: default_trend_file(),
            policy: CountPolicy::default(),
            date_format: DateFilter::default(),
            order: DayOrder::default(),
            window_days: None,
            chart: ChartConfig::default(),
            unstable_limit: None,
            title: None,
            link_base: None,
        }
    }
}

/// Values given on the command line; `None` leaves the config value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub reports_root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub trend_file: Option<PathBuf>,
    pub no_trend: bool,
    pub policy: Option<CountPolicy>,
    pub order: Option<DayOrder>,
    pub any_date: bool,
    pub window_days: Option<u32>,
    pub chart: Option<ChartKind>,
    pub fetch_trend: bool,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if cli.reports_root.is_some() {
            self.reports_root = cli.reports_root;
        }
        if cli.output.is_some() {
            self.output = cli.output;
        }
        if cli.no_trend {
            self.trend_file = None;
        } else if cli.trend_file.is_some() {
            self.trend_file = cli.trend_file;
        }
        if let Some(policy) = cli.policy {
            self.policy = policy;
        }
        if let Some(order) = cli.order {
            self.order = order;
        }
        if cli.any_date {
            self.date_format = DateFilter::Any;
        }
        if cli.window_days.is_some() {
            self.window_days = cli.window_days;
        }
        if let Some(kind) = cli.chart {
            self.chart.kind = kind;
        }
        if cli.fetch_trend {
            self.chart.source = ChartSource::Fetch;
        }
        self
    }

    pub fn reports_root(&self) -> PathBuf {
        self.reports_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_ROOT))
    }

    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Resolve paths relative to `base` (the directory the tool runs in)
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.reports_root = Some(resolve(self.reports_root()));
        self.output = Some(resolve(self.output()));
        self.trend_file = self.trend_file.take().map(resolve);
        self
    }

    /// Library settings for one run. `today` anchors the day window.
    pub fn pipeline(&self, today: NaiveDate) -> PipelineConfig {
        // Detail links are relative to the dashboard page when the root sits below it
        let link_base = self.link_base.clone().or_else(|| {
            let output = self.output();
            let output_dir = output.parent().unwrap_or(Path::new(""));
            self.reports_root()
                .strip_prefix(output_dir)
                .ok()
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        });
        PipelineConfig {
            report_file: self
                .report_file
                .clone()
                .unwrap_or_else(|| DEFAULT_REPORT_FILE.to_string()),
            detail_page: self
                .detail_page
                .clone()
                .unwrap_or_else(|| DEFAULT_DETAIL_PAGE.to_string()),
            link_base,
            policy: self.policy,
            date_filter: self.date_format,
            order: self.order,
            window: self.window_days.map(|days| Window { today, days }),
            unstable_limit: self.unstable_limit.unwrap_or(DEFAULT_UNSTABLE_LIMIT),
        }
    }
}
