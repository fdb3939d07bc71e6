//! Company harvester CLI.
//!
//! Discovers companies on a business directory from a search query, or
//! validates a file of seed URLs, and writes the structured records to
//! JSON or CSV.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dirharvest::utils::constants::{CHROME_USER_AGENT, DEFAULT_MAX_LISTS, FETCH_TIMEOUT};
use dirharvest::{FetchMode, HarvestConfig, HarvestPipeline, input, output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "dirharvest", version)]
#[command(about = "Discover and extract structured company records from a business directory")]
#[command(group(ArgGroup::new("source").required(true)))]
struct Cli {
    /// Search query for discovering companies
    #[arg(short, long, group = "source")]
    query: Option<String>,

    /// Path to a file of newline-delimited seed URLs
    #[arg(long, value_name = "FILE", group = "source")]
    url_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Csv)]
    output_format: OutputFormat,

    /// Output file path (defaults to output/results.csv or .json)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Listing pages to follow from the search results
    #[arg(long, default_value_t = DEFAULT_MAX_LISTS)]
    max_lists: usize,

    /// Extract from listing-page markup instead of fetching each profile
    #[arg(long)]
    listing_only: bool,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let extension = match self.output_format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
            };
            PathBuf::from("output").join(format!("results.{extension}"))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(url_file) = &cli.url_file {
        info!("Reading seed URLs from {}", url_file.display());

        let client = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        let urls = input::load_seed_urls(&client, url_file).await?;
        // Seed-URL runs stop at validation; harvesting company sites
        // directly is outside the directory pipeline.
        info!("{} valid seed URLs found", urls.len());
        return Ok(());
    }

    let Some(query) = cli.query.as_deref() else {
        unreachable!("clap enforces exactly one of --query / --url-file");
    };

    let fetch_mode = if cli.listing_only {
        FetchMode::ListingHtml
    } else {
        FetchMode::ProfilePages
    };

    let config = HarvestConfig::default()
        .with_max_lists(cli.max_lists)
        .with_fetch_mode(fetch_mode)
        .with_headless(!cli.headed);

    let pipeline = HarvestPipeline::new(config)?;
    let outcome = pipeline.run_query(query).await?;

    if outcome.records.is_empty() {
        warn!("No company data extracted");
        return Ok(());
    }

    info!(
        "Extracted {} companies, {} unique",
        outcome.extracted, outcome.unique
    );

    let path = cli.output_path();
    match cli.output_format {
        OutputFormat::Json => output::save_to_json(&outcome.records, &path)?,
        OutputFormat::Csv => output::save_to_csv(&outcome.records, &path)?,
    }

    Ok(())
}
