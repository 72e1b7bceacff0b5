//! Integration tests for the stock advisor pipeline

use chrono::{Duration, NaiveDate};
use std::io::Write;
use std::path::Path;

use stock_advisor::{
    config::{ForecastSettings, MarketSettings, PlotSettings},
    error::Stage,
    recommend::{SentimentSign, Trend},
    Advisor, AdvisorError, AppConfig, MarketSentiment, PostSource, PriceBar, PriceSource, Result,
    SymbolRecord, TwitterClient, Verdict,
};

/// Deterministic daily prices with a linear drift
struct SyntheticPrices {
    base: f64,
    slope: f64,
}

impl PriceSource for SyntheticPrices {
    fn daily_bars(&self, _symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        let days = (end - start).num_days();
        Ok((0..days)
            .map(|i| {
                let t = i as f64;
                let close = self.base + self.slope * t + (t * 0.7).sin();
                PriceBar::new(
                    start + Duration::days(i),
                    close - 0.3 * (t * 1.3).cos(),
                    close + 1.0 + 0.2 * (t * 0.4).sin(),
                    close - 1.0,
                    close,
                    1_000_000.0 + 5_000.0 * (t * 0.9).cos(),
                )
            })
            .collect())
    }
}

struct NoPrices;

impl PriceSource for NoPrices {
    fn daily_bars(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<Vec<PriceBar>> {
        Ok(Vec::new())
    }
}

struct StaticPosts(Vec<&'static str>);

impl PostSource for StaticPosts {
    fn search(&self, _query: &str, max_results: usize, _language: &str) -> Result<Vec<String>> {
        Ok(self.0.iter().take(max_results).map(|s| s.to_string()).collect())
    }
}

const LOOKBACK_DAYS: u32 = 120;

fn config(dir: &Path) -> AppConfig {
    AppConfig {
        companies_file: dir.join("nasdaq_list.csv"),
        market: MarketSettings {
            lookback_days: LOOKBACK_DAYS,
            ..Default::default()
        },
        forecast: ForecastSettings {
            seed: Some(7),
            ..Default::default()
        },
        plot: PlotSettings {
            output_dir: dir.join("plots"),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn apple() -> SymbolRecord {
    SymbolRecord {
        symbol: "AAPL".to_string(),
        name: "Apple Inc. - Common Stock".to_string(),
    }
}

fn write_companies(dir: &Path) {
    let mut file = std::fs::File::create(dir.join("nasdaq_list.csv")).unwrap();
    writeln!(file, "Symbol,Name,Market Category").unwrap();
    writeln!(file, "AAPL,Apple Inc. - Common Stock,Q").unwrap();
    writeln!(file, "MSFT,Microsoft Corporation - Common Stock,Q").unwrap();
}

fn rising() -> SyntheticPrices {
    SyntheticPrices {
        base: 100.0,
        slope: 0.5,
    }
}

fn falling() -> SyntheticPrices {
    SyntheticPrices {
        base: 300.0,
        slope: -0.5,
    }
}

fn positive_posts() -> StaticPosts {
    StaticPosts(vec![
        "Great quarter for Apple, strong growth!",
        "Really good products. https://t.co/abc",
    ])
}

fn negative_posts() -> StaticPosts {
    StaticPosts(vec!["Terrible earnings. Bad outlook.", "Not great at all"])
}

mod pipeline {
    use super::*;

    #[test]
    fn test_rising_forecast_with_positive_posts_is_great() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = Advisor::new(config(dir.path()), rising(), positive_posts())
            .with_plot(false)
            .with_end_date(end_date());

        let report = advisor.run_for(&apple()).unwrap();

        let n = LOOKBACK_DAYS as usize;
        assert_eq!(report.forecast.forecast_out, 12);
        assert_eq!(report.forecast.table.original_len(), n);
        assert_eq!(report.forecast.table.len(), n + 12);
        assert!(report.plot_path.is_none());

        assert_eq!(report.sentiment.posts.len(), 2);
        assert!(report.sentiment.sentiment.mean_polarity().unwrap() > 0.0);

        let rec = &report.recommendation;
        assert_eq!(rec.symbol, "AAPL");
        assert_eq!(rec.trend, Trend::Rising);
        assert_eq!(rec.sentiment, SentimentSign::Positive);
        assert_eq!(rec.verdict, Verdict::Great);
        assert_eq!(Some(rec.reference_close), report.forecast.reference_close());
        assert!(rec.message().ends_with("Investing in AAPL is a GREAT idea!"));
    }

    #[test]
    fn test_rising_forecast_with_negative_posts_is_bad() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = Advisor::new(config(dir.path()), rising(), negative_posts())
            .with_plot(false)
            .with_end_date(end_date());

        let rec = advisor.run_for(&apple()).unwrap().recommendation;
        assert_eq!(rec.trend, Trend::Rising);
        assert_eq!(rec.sentiment, SentimentSign::Negative);
        assert_eq!(rec.verdict, Verdict::Bad);
    }

    #[test]
    fn test_falling_forecast_is_bad() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = Advisor::new(config(dir.path()), falling(), positive_posts())
            .with_plot(false)
            .with_end_date(end_date());

        let rec = advisor.run_for(&apple()).unwrap().recommendation;
        assert_eq!(rec.trend, Trend::NotRising);
        assert_eq!(rec.verdict, Verdict::Bad);
        assert!(rec.final_prediction < rec.reference_close);
    }

    #[test]
    fn test_no_posts_is_inconclusive() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = Advisor::new(config(dir.path()), rising(), StaticPosts(Vec::new()))
            .with_plot(false)
            .with_end_date(end_date());

        let report = advisor.run_for(&apple()).unwrap();
        assert_eq!(report.sentiment.sentiment, MarketSentiment::NoData);
        assert_eq!(report.recommendation.verdict, Verdict::Inconclusive);
        assert_eq!(report.recommendation.mean_polarity, None);
    }

    #[test]
    fn test_empty_price_history() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = Advisor::new(config(dir.path()), NoPrices, positive_posts())
            .with_plot(false)
            .with_end_date(end_date());

        let result = advisor.run_for(&apple());
        assert!(matches!(
            result,
            Err(AdvisorError::InsufficientData {
                stage: Stage::Prices,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_token_fails_after_forecast_and_plot() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.sentiment.bearer_token = None;
        config.sentiment.bearer_token_env = "STOCK_ADVISOR_TEST_PIPELINE_TOKEN_UNSET".to_string();

        let posts = TwitterClient::new(&config.sentiment, &config.http).unwrap();
        let advisor = Advisor::new(config, rising(), posts).with_end_date(end_date());

        let result = advisor.run_for(&apple());
        assert!(matches!(result, Err(AdvisorError::MissingCredentials { .. })));
        assert!(dir.path().join("plots").join("AAPL.svg").exists());
    }

    #[test]
    fn test_plot_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = Advisor::new(config(dir.path()), rising(), positive_posts())
            .with_end_date(end_date());

        let report = advisor.run_for(&apple()).unwrap();
        let path = report.plot_path.unwrap();

        assert_eq!(path, dir.path().join("plots").join("AAPL.svg"));
        assert!(path.exists());
    }
}

mod prompt {
    use super::*;

    #[test]
    fn test_run_prompts_until_symbol_matches() {
        let dir = tempfile::tempdir().unwrap();
        write_companies(dir.path());
        let advisor = Advisor::new(config(dir.path()), rising(), positive_posts())
            .with_plot(false)
            .with_end_date(end_date());

        let mut output = Vec::new();
        let report = advisor.run("zzzz\n msft \n".as_bytes(), &mut output).unwrap();

        assert_eq!(report.record.symbol, "MSFT");
        assert_eq!(report.record.name, "Microsoft Corporation - Common Stock");
        assert_eq!(report.recommendation.symbol, "MSFT");

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Enter a stock symbol to retrieve data from: ").count(), 2);
        assert!(output.contains("Unknown symbol 'ZZZZ'"));
    }

    #[test]
    fn test_run_cancelled_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        write_companies(dir.path());
        let advisor = Advisor::new(config(dir.path()), rising(), positive_posts())
            .with_plot(false)
            .with_end_date(end_date());

        let result = advisor.run("".as_bytes(), Vec::new());
        assert!(matches!(result, Err(AdvisorError::Cancelled)));
    }

    #[test]
    fn test_missing_companies_file() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = Advisor::new(config(dir.path()), rising(), positive_posts());

        let result = advisor.run("AAPL\n".as_bytes(), Vec::new());
        assert!(matches!(result, Err(AdvisorError::SymbolTable(_))));
    }
}

mod configuration {
    use super::*;
    use stock_advisor::config::SplitMode;
    use stock_advisor::load_config;

    #[test]
    fn test_partial_toml_config_drives_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        std::fs::write(
            &path,
            "[market]\nlookback_days = 60\n\n[forecast]\nsplit = \"chronological\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.market.lookback_days, 60);
        assert_eq!(config.forecast.split, SplitMode::Chronological);
        assert_eq!(config.sentiment.max_posts, 100);

        let advisor = Advisor::new(config, rising(), positive_posts())
            .with_plot(false)
            .with_end_date(end_date());
        let report = advisor.run_for(&apple()).unwrap();

        assert_eq!(report.forecast.forecast_out, 6);
        assert_eq!(report.forecast.table.len(), 66);
    }
}
