use crate::chart::{ChartData, show_chart};
use crate::cli::Cli;
use crate::fetch::fetch_operating_cash;
use crate::progress::{Progress, Stage};
use crate::series::DailySeries;
use crate::stats::CashSummary;
use crate::summary::{print_missing_today_warning, print_summary};
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use colored::Colorize;
use reqwest::Client;
use std::io::IsTerminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod chart;
mod cli;
mod fetch;
mod formatting;
mod progress;
mod series;
mod stats;
mod summary;

const USER_AGENT: &str = concat!("dtscash/", env!("CARGO_PKG_VERSION"));
const DEFAULT_LOG_FILTER: &str = "error";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let mut cli = Cli::parse();

    if let Some(command) = cli.command.take() {
        crate::cli::handle_command(command)?;
        return Ok(());
    }

    let Cli {
        no_chart,
        no_progress,
        ..
    } = cli;

    let today = Local::now().date_naive();
    let year = today.year();

    // No request timeout: a stalled server blocks the run until the connection drops.
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;

    let progress = Progress::new(!no_progress);

    let spinner = progress.start(Stage::Download, format!("operating cash for {year}"));
    let fetched =
        fetch_operating_cash(&client, year, |received| spinner.page_received(received)).await;
    spinner.finish(&fetched, |fetched| {
        format!("{} records in {} pages", fetched.records.len(), fetched.pages)
    });
    let fetched = fetched?;
    info!(
        pages = fetched.pages,
        records = fetched.records.len(),
        "operating cash download complete"
    );

    let spinner = progress.start(Stage::Aggregate, "daily totals");
    let series = DailySeries::from_records(&fetched.records);
    spinner.finish(&series, |series| format!("{} days", series.len()));
    let series = series?;
    if series.is_empty() {
        warn!(year, "no operating cash records returned");
    } else if let (Some(first), Some(last)) = (series.totals().first(), series.totals().last()) {
        info!(days = series.len(), first = %first.date, last = %last.date, "daily series built");
    }

    let summary = CashSummary::compute(&series, today);
    if summary.today.is_none() {
        print_missing_today_warning(today);
    }
    print_summary(&summary);

    if no_chart {
        return Ok(());
    }

    let changes = series.percent_change();
    let Some(chart) = ChartData::from_changes(&changes, year) else {
        println!(
            "{}",
            "Not enough daily data to chart percent change.".bright_black()
        );
        return Ok(());
    };
    if !std::io::stdout().is_terminal() {
        println!(
            "{}",
            "Standard output is not a terminal; skipping chart.".bright_black()
        );
        return Ok(());
    }

    show_chart(&chart)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
