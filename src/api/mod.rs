//! Remote data sources
//!
//! - `yahoo` - daily price history from the Yahoo Finance chart API
//! - `twitter` - recent posts from the X/Twitter v2 search API
//!
//! Both are reached through a trait so the pipeline can run against
//! in-memory sources in tests.

pub mod twitter;
pub mod yahoo;

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;

use crate::config::HttpSettings;
use crate::data::prices::PriceBar;
use crate::error::{AdvisorError, Result};

pub use twitter::TwitterClient;
pub use yahoo::YahooClient;

/// Source of daily price bars
pub trait PriceSource {
    /// Daily bars for `symbol` with `start <= date < end`
    fn daily_bars(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>>;
}

/// Source of social-media post texts
pub trait PostSource {
    /// Up to `max_results` recent posts matching `query` in `language`
    fn search(&self, query: &str, max_results: usize, language: &str) -> Result<Vec<String>>;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn daily_bars(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        (**self).daily_bars(symbol, start, end)
    }
}

impl<T: PostSource + ?Sized> PostSource for &T {
    fn search(&self, query: &str, max_results: usize, language: &str) -> Result<Vec<String>> {
        (**self).search(query, max_results, language)
    }
}

/// Build the blocking HTTP client shared by the API clients
pub fn build_http_client(settings: &HttpSettings) -> Result<Client> {
    let client = Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;
    Ok(client)
}

/// Send a request, retrying transient failures
///
/// Connect errors, timeouts, 429 and 5xx responses are retried up to
/// `max_retries` attempts in total with a linear back-off. Any other
/// response is returned as-is for the caller to interpret.
pub(crate) fn send_with_retry<F>(build: F, max_retries: u32, service: &'static str) -> Result<Response>
where
    F: Fn() -> RequestBuilder,
{
    let attempts = max_retries.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        match build().send() {
            Ok(response) => {
                let status = response.status();
                if status.as_u16() == 429 || status.is_server_error() {
                    log::warn!(
                        "{} responded {} (attempt {}/{})",
                        service,
                        status,
                        attempt + 1,
                        attempts
                    );
                    last_error = Some(AdvisorError::Api {
                        service,
                        message: format!("HTTP {}", status),
                    });
                } else {
                    return Ok(response);
                }
            }
            Err(e) => {
                let err = AdvisorError::from(e);
                if !err.is_retryable() {
                    return Err(err);
                }
                log::warn!("{} request failed (attempt {}/{}): {}", service, attempt + 1, attempts, err);
                last_error = Some(err);
            }
        }

        if attempt + 1 < attempts {
            std::thread::sleep(Duration::from_millis(500 * (attempt as u64 + 1)));
        }
    }

    Err(last_error.unwrap_or(AdvisorError::Api {
        service,
        message: "request failed".to_string(),
    }))
}
