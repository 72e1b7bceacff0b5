//! Stock advisor CLI
//!
//! Asks for a stock symbol, forecasts its close price, scores recent posts
//! about the company and prints an investment recommendation.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use stock_advisor::{
    load_config, Advisor, AdvisorError, AppConfig, SymbolResolver, TwitterClient, YahooClient,
};

#[derive(Parser)]
#[command(name = "stock-advisor")]
#[command(about = "Forecast a stock and weigh it against social-media sentiment", long_about = None)]
struct Cli {
    /// Config file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stock symbol to analyze instead of prompting (e.g., AAPL)
    #[arg(short, long)]
    symbol: Option<String>,

    /// CSV file with Symbol and Name columns
    #[arg(long)]
    companies: Option<PathBuf>,

    /// Skip rendering the chart
    #[arg(long)]
    no_plot: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str()))
        .init();

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(companies) = cli.companies {
        config.companies_file = companies;
    }

    let prices = YahooClient::new(&config.market, &config.http)
        .context("Failed to create Yahoo Finance client")?;
    // A missing bearer token surfaces at the sentiment stage
    let posts = TwitterClient::new(&config.sentiment, &config.http)
        .context("Failed to create Twitter client")?;

    let advisor = Advisor::new(config, prices, posts).with_plot(!cli.no_plot);

    let outcome = match cli.symbol.as_deref() {
        Some(symbol) => {
            let table = advisor.load_symbols()?;
            let resolver = SymbolResolver::new(&table, advisor.config().prompt.max_attempts);
            let record = resolver
                .resolve_symbol(symbol)
                .with_context(|| format!("Unknown stock symbol '{}'", symbol))?;
            advisor.run_for(&record)
        }
        None => advisor.run(io::stdin().lock(), io::stdout()),
    };

    let report = match outcome {
        Ok(report) => report,
        Err(AdvisorError::Cancelled) => {
            println!("Cancelled.");
            return Ok(());
        }
        Err(e) if e.is_input_error() => return Err(e).context("Stock advisor cannot run with this input"),
        Err(e) => return Err(e).context("Stock advisor run failed"),
    };

    log::debug!(
        "Forecast accuracy {:.4} over {} forecast day(s)",
        report.forecast.accuracy,
        report.forecast.forecast_out
    );
    if let Some(path) = &report.plot_path {
        log::info!("Chart saved to {}", path.display());
    }

    println!("{}", report.recommendation);
    Ok(())
}
