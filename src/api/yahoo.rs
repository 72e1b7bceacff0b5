//! Yahoo Finance data loading for daily stock prices.

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;

use super::{build_http_client, send_with_retry, PriceSource};
use crate::config::{HttpSettings, MarketSettings};
use crate::data::prices::PriceBar;
use crate::error::{AdvisorError, Result};

const SERVICE: &str = "Yahoo Finance";

/// Yahoo Finance API response
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance client
pub struct YahooClient {
    base_url: String,
    client: Client,
    max_retries: u32,
}

impl YahooClient {
    pub fn new(market: &MarketSettings, http: &HttpSettings) -> Result<Self> {
        Ok(Self::with_client(build_http_client(http)?, market, http.max_retries))
    }

    /// Reuse an existing HTTP client
    pub fn with_client(client: Client, market: &MarketSettings, max_retries: u32) -> Self {
        Self {
            base_url: market.base_url.trim_end_matches('/').to_string(),
            client,
            max_retries,
        }
    }

    /// Fetch daily bars between two dates, `end` exclusive
    pub fn fetch_range(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let period1 = day_start_timestamp(start);
        let period2 = day_start_timestamp(end);

        log::debug!("Fetching Yahoo data from {} ({} to {})", url, start, end);

        let response = send_with_retry(
            || {
                self.client.get(&url).query(&[
                    ("period1", period1.to_string()),
                    ("period2", period2.to_string()),
                    ("interval", "1d".to_string()),
                ])
            },
            self.max_retries,
            SERVICE,
        )?;

        let status = response.status();
        let body = response.text()?;
        let bars = parse_chart(&body, start, end).map_err(|e| match e {
            ChartParseError::Json(_) if !status.is_success() => AdvisorError::Api {
                service: SERVICE,
                message: format!("HTTP {}", status),
            },
            ChartParseError::Json(err) => AdvisorError::Api {
                service: SERVICE,
                message: format!("unexpected response: {}", err),
            },
            ChartParseError::Provider { code, description } => AdvisorError::Api {
                service: SERVICE,
                message: format!("{} - {}", code, description),
            },
        })?;

        log::info!("Fetched {} daily bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

impl PriceSource for YahooClient {
    fn daily_bars(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        self.fetch_range(symbol, start, end)
    }
}

fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[derive(Debug)]
enum ChartParseError {
    Json(serde_json::Error),
    Provider { code: String, description: String },
}

/// Turn a chart response body into bars within `[start, end)`
///
/// A result without timestamps means no trading days and yields no bars.
/// Bars with any missing value are skipped.
fn parse_chart(body: &str, start: NaiveDate, end: NaiveDate) -> std::result::Result<Vec<PriceBar>, ChartParseError> {
    let response: YahooResponse = serde_json::from_str(body).map_err(ChartParseError::Json)?;

    if let Some(error) = response.chart.error {
        return Err(ChartParseError::Provider {
            code: error.code,
            description: error.description,
        });
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let bars = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            let value = |series: &Vec<Option<f64>>| series.get(i).copied().flatten();
            Some(PriceBar::new(
                date,
                value(&quote.open)?,
                value(&quote.high)?,
                value(&quote.low)?,
                value(&quote.close)?,
                value(&quote.volume)?,
            ))
        })
        .filter(|bar| bar.date >= start && bar.date < end)
        .collect();

    Ok(bars)
}
