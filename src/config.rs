//! Configuration
//!
//! Every section has defaults, so a config file only needs the values it
//! changes. Files are read as TOML, JSON or YAML depending on extension.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV file with `Symbol` and `Name` columns
    pub companies_file: PathBuf,
    /// HTTP client settings
    pub http: HttpSettings,
    /// Price history provider
    pub market: MarketSettings,
    /// Regression forecast settings
    pub forecast: ForecastSettings,
    /// Social-media sentiment settings
    pub sentiment: SentimentSettings,
    /// Chart output
    pub plot: PlotSettings,
    /// Interactive symbol prompt
    pub prompt: PromptSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            companies_file: PathBuf::from("nasdaq_list.csv"),
            http: HttpSettings::default(),
            market: MarketSettings::default(),
            forecast: ForecastSettings::default(),
            sentiment: SentimentSettings::default(),
            plot: PlotSettings::default(),
            prompt: PromptSettings::default(),
        }
    }
}

impl AppConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.forecast;
        if !(f.forecast_fraction > 0.0 && f.forecast_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "forecast.forecast_fraction must be in (0, 1), got {}",
                f.forecast_fraction
            )));
        }
        if !(f.test_size > 0.0 && f.test_size < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "forecast.test_size must be in (0, 1), got {}",
                f.test_size
            )));
        }
        if self.prompt.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "prompt.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.sentiment.max_posts == 0 {
            return Err(ConfigError::Invalid(
                "sentiment.max_posts must be at least 1".to_string(),
            ));
        }
        if self.market.lookback_days == 0 {
            return Err(ConfigError::Invalid(
                "market.lookback_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP client settings shared by both remote services
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request for transient failures
    pub max_retries: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

/// Price history provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    pub base_url: String,
    /// Length of the history window ending today
    pub lookback_days: u32,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            lookback_days: 730,
        }
    }
}

/// Which rows the feature scaler is fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleScope {
    /// All rows, forecast window included
    FullHistory,
    /// Only rows that carry a label
    LabeledOnly,
}

/// How labeled rows are divided into train and test sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Random assignment
    Shuffled,
    /// Earlier rows train, later rows test
    Chronological,
}

/// Regression forecast settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Forecast horizon as a fraction of the history length (rounded up)
    pub forecast_fraction: f64,
    /// Fraction of labeled rows held out for scoring
    pub test_size: f64,
    pub scale_scope: ScaleScope,
    pub split: SplitMode,
    /// Seed for the shuffled split; random when absent
    pub seed: Option<u64>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            forecast_fraction: 0.1,
            test_size: 0.5,
            scale_scope: ScaleScope::FullHistory,
            split: SplitMode::Shuffled,
            seed: None,
        }
    }
}

/// Social-media search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentSettings {
    pub base_url: String,
    /// Upper bound on retrieved posts
    pub max_posts: usize,
    /// Language filter for the search
    pub language: String,
    /// API bearer token (can be loaded from env)
    pub bearer_token: Option<String>,
    /// Environment variable holding the bearer token
    pub bearer_token_env: String,
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitter.com".to_string(),
            max_posts: 100,
            language: "en".to_string(),
            bearer_token: None,
            bearer_token_env: "TWITTER_BEARER_TOKEN".to_string(),
        }
    }
}

impl SentimentSettings {
    /// Get bearer token from config or environment
    pub fn get_bearer_token(&self) -> Option<String> {
        self.bearer_token
            .clone()
            .or_else(|| std::env::var(&self.bearer_token_env).ok())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Chart output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Command used to display the chart; headless when absent
    pub viewer: Option<String>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            width: 1280,
            height: 720,
            viewer: None,
        }
    }
}

/// Interactive prompt settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub max_attempts: u32,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

/// Load configuration from file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ConfigError::FileError(format!("{}: {}", path.as_ref().display(), e)))?;

    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let config: AppConfig = match ext {
        "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string())),
        "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string())),
        "yaml" | "yml" => {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }?;

    config.validate()?;
    Ok(config)
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("Config file error: {0}")]
    FileError(String),
    /// Parse error
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// Unsupported format
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
    /// Value out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.forecast.forecast_fraction, 0.1);
        assert_eq!(config.forecast.scale_scope, ScaleScope::FullHistory);
        assert_eq!(config.forecast.split, SplitMode::Shuffled);
        assert_eq!(config.plot.output_dir, PathBuf::from("plots"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[forecast]\nsplit = \"chronological\"\nseed = 7\n\n[prompt]\nmax_attempts = 2"
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.forecast.split, SplitMode::Chronological);
        assert_eq!(config.forecast.seed, Some(7));
        assert_eq!(config.prompt.max_attempts, 2);
        assert_eq!(config.forecast.test_size, 0.5);
        assert_eq!(config.market.lookback_days, 730);
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.json");
        std::fs::write(&path, r#"{"sentiment": {"max_posts": 25, "language": "de"}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.sentiment.max_posts, 25);
        assert_eq!(config.sentiment.language, "de");
    }

    #[test]
    fn test_rejects_out_of_range_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.yaml");
        std::fs::write(&path, "forecast:\n  forecast_fraction: 1.5\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.ini");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_bearer_token_from_config() {
        let settings = SentimentSettings {
            bearer_token: Some("token".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.get_bearer_token(), Some("token".to_string()));
    }

    #[test]
    fn test_bearer_token_env_missing() {
        let settings = SentimentSettings {
            bearer_token_env: "STOCK_ADVISOR_TEST_TOKEN_UNSET".to_string(),
            ..Default::default()
        };
        assert!(settings.get_bearer_token().is_none());
    }
}
