//! End-to-end advisor run
//!
//! Wires symbol resolution, price loading, forecasting, plotting,
//! sentiment collection and the recommendation into one sequential pass.

use chrono::{Duration, NaiveDate, Utc};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::api::{PostSource, PriceSource};
use crate::config::AppConfig;
use crate::data::prices::PriceTable;
use crate::data::symbols::{SymbolRecord, SymbolResolver, SymbolTable};
use crate::error::{AdvisorError, Result, Stage};
use crate::forecast::{ForecastOutcome, Forecaster};
use crate::plot::ForecastPlot;
use crate::recommend::{recommend, Recommendation};
use crate::sentiment::{SentimentCollector, SentimentReport};

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub record: SymbolRecord,
    pub forecast: ForecastOutcome,
    /// Chart location, when plotting is enabled
    pub plot_path: Option<PathBuf>,
    pub sentiment: SentimentReport,
    pub recommendation: Recommendation,
}

/// Stock advisor over a price source and a post source
pub struct Advisor<P, S> {
    config: AppConfig,
    prices: P,
    posts: S,
    plot: bool,
    end_date: Option<NaiveDate>,
}

impl<P: PriceSource, S: PostSource> Advisor<P, S> {
    pub fn new(config: AppConfig, prices: P, posts: S) -> Self {
        Self {
            config,
            prices,
            posts,
            plot: true,
            end_date: None,
        }
    }

    /// Enable or disable the chart stage
    pub fn with_plot(mut self, enabled: bool) -> Self {
        self.plot = enabled;
        self
    }

    /// Fix the end of the price window instead of using today
    pub fn with_end_date(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load the configured symbol reference table
    pub fn load_symbols(&self) -> Result<SymbolTable> {
        let table = SymbolTable::from_path(&self.config.companies_file)?;
        if table.is_empty() {
            return Err(AdvisorError::SymbolTable(format!(
                "{} contains no symbols",
                self.config.companies_file.display()
            )));
        }
        Ok(table)
    }

    /// Prompt for a symbol on `output`, read it from `input`, then run
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<RunReport> {
        let table = self.load_symbols()?;
        let record = SymbolResolver::new(&table, self.config.prompt.max_attempts).resolve(input, output)?;
        self.run_for(&record)
    }

    /// Run every stage for an already resolved symbol
    pub fn run_for(&self, record: &SymbolRecord) -> Result<RunReport> {
        log::info!("Advising on {} ({})", record.symbol, record.name);

        println!("Retrieving Stock Data from introduced symbol...");
        let table = self.load_prices(&record.symbol)?;

        println!("Forecasting stock prices...");
        let forecast = Forecaster::new(self.config.forecast.clone()).forecast(table)?;

        let plot_path = if self.plot {
            println!("Plotting existing and forecasted values...");
            let plotter = ForecastPlot::new(self.config.plot.clone());
            let path = plotter.render(&forecast.table, &record.symbol)?;
            plotter.show(&path)?;
            Some(path)
        } else {
            log::debug!("Plotting disabled");
            None
        };

        println!("Retrieving {} related tweets polarity...", record.symbol);
        let sentiment =
            SentimentCollector::new(&self.posts, &self.config.sentiment).collect(&record.name)?;

        println!("Generating recommendation based on prediction & polarity...");
        println!("Market Sentiment: {}", sentiment.sentiment);

        let reference_close = forecast.reference_close().ok_or_else(|| {
            AdvisorError::insufficient(Stage::Forecast, "no reference close before the forecast window")
        })?;
        let final_prediction = forecast
            .final_prediction()
            .ok_or_else(|| AdvisorError::insufficient(Stage::Forecast, "forecast is empty"))?;

        let recommendation = recommend(
            &record.symbol,
            reference_close,
            final_prediction,
            &sentiment.sentiment,
        );
        log::info!(
            "{}: reference close {:.2}, final prediction {:.2}, verdict {:?}",
            record.symbol,
            reference_close,
            final_prediction,
            recommendation.verdict
        );

        Ok(RunReport {
            record: record.clone(),
            forecast,
            plot_path,
            sentiment,
            recommendation,
        })
    }

    fn load_prices(&self, symbol: &str) -> Result<PriceTable> {
        let end = self.end_date.unwrap_or_else(|| Utc::now().date_naive());
        let start = end - Duration::days(i64::from(self.config.market.lookback_days));

        let bars = self.prices.daily_bars(symbol, start, end)?;
        let table = PriceTable::from_bars(&bars);
        if table.is_empty() {
            return Err(AdvisorError::insufficient(
                Stage::Prices,
                format!("no daily prices for {} between {} and {}", symbol, start, end),
            ));
        }

        log::info!(
            "Loaded {} price rows for {} ({} to {})",
            table.len(),
            symbol,
            start,
            end
        );
        Ok(table)
    }
}
