use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use star_scraper::{
    merge_rows, render_delimited, save_csv, utc_date_suffix, HttpFetcher, RowCollector,
    ScrapeConfig,
};

const DEFAULT_URL: &str =
    "https://www.the-numbers.com/box-office-star-records/domestic/lifetime-acting/top-grossing-leading-stars/";

/// Scrape the top-grossing leading stars table plus each star's birth year.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Listing URL (page 1); page tokens and detail links resolve against it
    #[arg(default_value = DEFAULT_URL)]
    url: String,

    /// Number of data rows to collect
    #[arg(short, long, default_value_t = 200)]
    limit: usize,

    /// Cell separator for the output
    #[arg(short, long, default_value = ";")]
    separator: String,

    /// Directory the dated CSV is written to
    #[arg(short, long, default_value = "data")]
    out_dir: PathBuf,

    /// Listing rows consumed per page-index step
    #[arg(long, default_value_t = 1)]
    rows_per_step: usize,

    /// Maximum concurrent detail-page fetches
    #[arg(long, default_value_t = 8)]
    max_in_flight: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    let config = ScrapeConfig {
        url: args.url,
        limit: args.limit,
        separator: args.separator,
        rows_per_step: args.rows_per_step,
        max_in_flight: args.max_in_flight,
        ..ScrapeConfig::default()
    };

    log::info!("Collecting {} rows from {}", config.limit, config.url);

    let fetcher = HttpFetcher::new(&config.url)?;
    let collector = RowCollector::new(fetcher, &config);
    let listing = collector.collect(config.limit).await?;

    let table = merge_rows(listing);
    let csv = render_delimited(&table, &config.separator);

    let file = args
        .out_dir
        .join(format!("popular_actors_{}.csv", utc_date_suffix(Utc::now())));
    save_csv(&file, &csv)?;

    log::info!(
        "Saved {} data rows to {}",
        table.len().saturating_sub(1),
        file.display()
    );

    Ok(())
}
