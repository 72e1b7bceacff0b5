//! # Stock Advisor
//!
//! Forecasts a stock's closing price with linear regression, scores recent
//! social-media posts about the company, and combines the two into an
//! investment recommendation.
//!
//! ## Modules
//!
//! - `api` - Yahoo Finance and X/Twitter clients behind source traits
//! - `data` - Symbol table, price table and feature preprocessing
//! - `models` - Ordinary least squares regression
//! - `metrics` - Regression evaluation metrics
//! - `forecast` - Label shifting, training and forward prediction
//! - `plot` - SVG chart of actual and forecast prices
//! - `sentiment` - Lexicon-based post polarity
//! - `recommend` - Trend and sentiment verdict
//! - `advisor` - The end-to-end run

pub mod advisor;
pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod plot;
pub mod recommend;
pub mod sentiment;

pub use advisor::{Advisor, RunReport};
pub use api::{PostSource, PriceSource, TwitterClient, YahooClient};
pub use config::{load_config, AppConfig};
pub use data::prices::{PriceBar, PriceTable};
pub use data::symbols::{SymbolRecord, SymbolResolver, SymbolTable};
pub use error::{AdvisorError, Result};
pub use forecast::{ForecastOutcome, Forecaster};
pub use metrics::regression::RegressionMetrics;
pub use models::linear::LinearRegression;
pub use plot::ForecastPlot;
pub use recommend::{recommend, Recommendation, Verdict};
pub use sentiment::{MarketSentiment, SentimentAnalyzer, SentimentCollector};
