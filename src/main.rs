//! Trendboard: daily test report dashboard CLI

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use trendboard::config::{default_config_json, load_config, ChartSource, CliOverrides, CONFIG_FILENAME};
use trendboard::discovery::{DayOrder, DiscoveryError};
use trendboard::reporter::{ChartData, ChartKind, ConsoleReporter, HtmlReporter, JsonReporter};
use trendboard::trend::{save_trend, trend_points};
use trendboard::{build_dashboard, CountPolicy, SkipReason};

/// Trendboard: static pass/fail trend dashboard for daily test reports
#[derive(Parser, Debug)]
#[command(name = "trendboard")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Reports root with one directory per day (default: Reports)
    root: Option<PathBuf>,

    /// Dashboard HTML output path (default: index.html)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Trend JSON output path (default: trend.json)
    #[arg(long)]
    trend_file: Option<PathBuf>,

    /// Do not write the trend file
    #[arg(long, conflicts_with = "trend_file")]
    no_trend: bool,

    /// Counting policy: flat, nested, deduplicated
    #[arg(long, value_name = "POLICY")]
    policy: Option<CountPolicy>,

    /// Listing order: newest-first, lexicographic
    #[arg(long, value_name = "ORDER")]
    order: Option<DayOrder>,

    /// Accept every subdirectory as a day, not only YYYY-MM-DD names
    #[arg(long)]
    any_date: bool,

    /// Only include the last N calendar days (0: all days)
    #[arg(long, value_name = "DAYS")]
    window: Option<u32>,

    /// Chart type: line, bar
    #[arg(long, value_name = "TYPE")]
    chart: Option<ChartKind>,

    /// Chart fetches the trend file instead of embedding the data
    #[arg(long)]
    fetch_trend: bool,

    /// Print the dashboard as JSON on stdout
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (only the final status line)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (skipped days, unstable tests)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .trendboardrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .trendboardrc.json with sensible defaults
    Init {
        /// Reports root to record in the config (default: Reports)
        #[arg(long)]
        root: Option<String>,

        /// Counting policy: flat, nested, deduplicated
        #[arg(long)]
        policy: Option<CountPolicy>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(Commands::Init { root, policy, dir }) = args.command {
        return run_init(root, policy, dir.as_deref());
    }

    let work_dir = std::env::current_dir().context("Failed to resolve current directory")?;
    let config = load_config(&work_dir, args.config.as_deref())?
        .merge_with_cli(CliOverrides {
            reports_root: args.root.clone(),
            output: args.output.clone(),
            trend_file: args.trend_file.clone(),
            no_trend: args.no_trend,
            policy: args.policy,
            order: args.order,
            any_date: args.any_date,
            window_days: args.window,
            chart: args.chart,
            fetch_trend: args.fetch_trend,
        })
        .resolve_paths(&work_dir);

    let root = config.reports_root();
    let pipeline = config.pipeline(Local::now().date_naive());

    let dashboard = match build_dashboard(&root, &pipeline) {
        Ok(dashboard) => dashboard,
        Err(DiscoveryError::RootNotFound(path)) => {
            eprintln!(
                "{}: Reports directory not found: {} (nothing to do)",
                "Warning".yellow(),
                path.display()
            );
            eprintln!("{}: Nothing to do, no dashboard written", "Done".green().bold());
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e.into()),
    };

    for skipped in &dashboard.skipped {
        match &skipped.reason {
            SkipReason::MissingReport => {
                if args.verbose {
                    eprintln!(
                        "{}: {}: no {}, skipped",
                        "Info".blue(),
                        skipped.date,
                        pipeline.report_file
                    );
                }
            }
            SkipReason::Unreadable { message } => {
                if !args.quiet {
                    eprintln!("{}: {}: {}, skipped", "Warning".yellow(), skipped.date, message);
                }
            }
        }
    }
    if dashboard.days.is_empty() && !args.quiet {
        eprintln!(
            "{}: No day reports found under {}",
            "Warning".yellow(),
            root.display()
        );
    }

    let output = config.output();

    if let Some(ref trend_path) = config.trend_file {
        save_trend(trend_path, &trend_points(&dashboard.days))
            .with_context(|| format!("Failed to write trend file {}", trend_path.display()))?;
    }

    let data = match (config.chart.source, config.trend_file.as_deref()) {
        (ChartSource::Inline, _) => ChartData::Inline,
        (ChartSource::Fetch, Some(trend_path)) => ChartData::Fetch(relative_href(&output, trend_path)),
        (ChartSource::Fetch, None) => {
            if !args.quiet {
                eprintln!(
                    "{}: Chart source 'fetch' needs a trend file; embedding data instead",
                    "Warning".yellow()
                );
            }
            ChartData::Inline
        }
    };

    let html = HtmlReporter::new(config.title())
        .chart(config.chart.kind)
        .data(data)
        .report(&dashboard);
    write_output(&output, &html)?;

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&dashboard));
    } else if !args.quiet {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&dashboard);
    }

    eprintln!(
        "{}: Dashboard written to {} ({} day{})",
        "Done".green().bold(),
        output.display(),
        dashboard.days.len(),
        if dashboard.days.len() == 1 { "" } else { "s" }
    );
    Ok(ExitCode::SUCCESS)
}

fn run_init(root: Option<String>, policy: Option<CountPolicy>, dir: Option<&Path>) -> Result<ExitCode> {
    let dir = dir.unwrap_or(Path::new("."));
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        eprintln!(
            "{}: {} already exists, leaving it untouched",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::from(1));
    }

    let root = root.unwrap_or_else(|| trendboard::config::DEFAULT_REPORTS_ROOT.to_string());
    let policy = policy.unwrap_or_default();
    fs::write(&config_path, default_config_json(&root, policy))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with reportsRoot={}, policy={}",
        "Done".green().bold(),
        config_path.display(),
        root,
        policy
    );
    Ok(ExitCode::SUCCESS)
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Href from the dashboard page to `target`, relative when `target` sits below the page's directory
fn relative_href(page: &Path, target: &Path) -> String {
    let page_dir = page.parent().unwrap_or(Path::new(""));
    target
        .strip_prefix(page_dir)
        .unwrap_or(target)
        .to_string_lossy()
        .replace('\\', "/")
}
