//! Investment recommendation from the forecast trend and market sentiment

use serde::Serialize;
use std::fmt;

use crate::sentiment::MarketSentiment;

const PREFIX: &str = "According to the predictions and twitter sentiment analysis -> Investing in";

/// Direction of the forecast against the reference close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Rising,
    NotRising,
}

impl Trend {
    pub fn from_prices(reference_close: f64, final_prediction: f64) -> Self {
        if final_prediction > reference_close {
            Trend::Rising
        } else {
            Trend::NotRising
        }
    }
}

/// Sign of the mean post polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentSign {
    Positive,
    Negative,
    Neutral,
    /// No posts were retrieved
    Unknown,
}

impl From<&MarketSentiment> for SentimentSign {
    fn from(sentiment: &MarketSentiment) -> Self {
        match sentiment.mean_polarity() {
            Some(p) if p > 0.0 => SentimentSign::Positive,
            Some(p) if p < 0.0 => SentimentSign::Negative,
            Some(_) => SentimentSign::Neutral,
            None => SentimentSign::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Great,
    Bad,
    /// Rising forecast without a sentiment signal
    Inconclusive,
}

/// Final recommendation for one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub symbol: String,
    pub trend: Trend,
    pub sentiment: SentimentSign,
    pub verdict: Verdict,
    pub reference_close: f64,
    pub final_prediction: f64,
    pub mean_polarity: Option<f64>,
}

impl Recommendation {
    /// Console message for the verdict
    pub fn message(&self) -> String {
        match self.verdict {
            Verdict::Great => format!("{} {} is a GREAT idea!", PREFIX, self.symbol),
            Verdict::Bad => format!("{} {} is a BAD idea!", PREFIX, self.symbol),
            Verdict::Inconclusive => format!(
                "{} {} is INCONCLUSIVE (no sentiment signal).",
                PREFIX, self.symbol
            ),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Combine the forecast trend with the sentiment sign
///
/// A forecast that does not rise is always `Bad`. A rising forecast is
/// `Great` with positive sentiment, `Bad` with negative sentiment and
/// `Inconclusive` when there is no sentiment signal.
pub fn recommend(
    symbol: &str,
    reference_close: f64,
    final_prediction: f64,
    sentiment: &MarketSentiment,
) -> Recommendation {
    let trend = Trend::from_prices(reference_close, final_prediction);
    let sign = SentimentSign::from(sentiment);

    let verdict = match (trend, sign) {
        (Trend::NotRising, _) => Verdict::Bad,
        (Trend::Rising, SentimentSign::Positive) => Verdict::Great,
        (Trend::Rising, SentimentSign::Negative) => Verdict::Bad,
        (Trend::Rising, SentimentSign::Neutral | SentimentSign::Unknown) => Verdict::Inconclusive,
    };

    Recommendation {
        symbol: symbol.to_string(),
        trend,
        sentiment: sign,
        verdict,
        reference_close,
        final_prediction,
        mean_polarity: sentiment.mean_polarity(),
    }
}
