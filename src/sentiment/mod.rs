//! # Sentiment Analysis Module
//!
//! Lexicon-based polarity scoring of social-media posts.

mod aggregator;
mod analyzer;
mod collector;
mod lexicon;
pub mod text;

pub use aggregator::{MarketSentiment, SentimentAggregator};
pub use analyzer::{PostSentiment, ScoredSentence, SentimentAnalyzer};
pub use collector::{SentimentCollector, SentimentReport};
pub use lexicon::{PolarityLexicon, NEGATION_FACTOR};
pub use text::SentenceSplitter;
