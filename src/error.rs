//! Error types for the stock advisor

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::linear::LinearRegressionError;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Pipeline stage an error or a data shortage belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prices,
    Forecast,
    Plot,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Prices => "price history",
            Stage::Forecast => "forecast",
            Stage::Plot => "plot",
        };
        f.write_str(name)
    }
}

/// Main error type for the library
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Reference table missing or malformed
    #[error("Symbol table error: {0}")]
    SymbolTable(String),

    /// No matching symbol after the allowed attempts
    #[error("No matching stock symbol after {attempts} attempt(s)")]
    SymbolNotFound { attempts: u32 },

    /// User cancelled the symbol prompt
    #[error("Symbol entry cancelled")]
    Cancelled,

    /// Not enough data to carry out a stage
    #[error("Insufficient data for {stage}: {reason}")]
    InsufficientData { stage: Stage, reason: String },

    /// Transport-level HTTP failure
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with an error
    #[error("{service} API error: {message}")]
    Api { service: &'static str, message: String },

    /// No credentials for a service that needs them
    #[error("Missing credentials for {service}: set {env_var} or configure a token")]
    MissingCredentials {
        service: &'static str,
        env_var: String,
    },

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Regression model failure
    #[error("Model error: {0}")]
    Model(#[from] LinearRegressionError),

    /// Chart rendering failure
    #[error("Plot error: {0}")]
    Plot(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdvisorError {
    pub(crate) fn insufficient(stage: Stage, reason: impl Into<String>) -> Self {
        AdvisorError::InsufficientData {
            stage,
            reason: reason.into(),
        }
    }

    /// Check if error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            AdvisorError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Check if error stems from the user's input or setup rather than the system
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AdvisorError::SymbolTable(_)
                | AdvisorError::SymbolNotFound { .. }
                | AdvisorError::Cancelled
                | AdvisorError::Config(_)
                | AdvisorError::MissingCredentials { .. }
        )
    }
}
