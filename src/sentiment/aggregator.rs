//! # Sentiment Aggregator
//!
//! Averages post polarities into a single market sentiment.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::analyzer::PostSentiment;

/// Market-wide sentiment over the retrieved posts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarketSentiment {
    /// Mean polarity over `posts` posts
    Scored { mean_polarity: f64, posts: usize },
    /// No posts were retrieved
    NoData,
}

impl MarketSentiment {
    pub fn mean_polarity(&self) -> Option<f64> {
        match self {
            MarketSentiment::Scored { mean_polarity, .. } => Some(*mean_polarity),
            MarketSentiment::NoData => None,
        }
    }

    pub fn posts(&self) -> usize {
        match self {
            MarketSentiment::Scored { posts, .. } => *posts,
            MarketSentiment::NoData => 0,
        }
    }
}

impl fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketSentiment::Scored { mean_polarity, .. } => write!(f, "{}", mean_polarity),
            MarketSentiment::NoData => write!(f, "no data"),
        }
    }
}

/// Running total of post polarities
#[derive(Debug, Clone, Default)]
pub struct SentimentAggregator {
    total_polarity: f64,
    posts: usize,
}

impl SentimentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one post
    pub fn add(&mut self, post: &PostSentiment) {
        self.add_polarity(post.polarity);
    }

    /// Add one post by its polarity
    pub fn add_polarity(&mut self, polarity: f64) {
        self.total_polarity += polarity;
        self.posts += 1;
    }

    pub fn posts(&self) -> usize {
        self.posts
    }

    pub fn total_polarity(&self) -> f64 {
        self.total_polarity
    }

    /// Total polarity divided by the number of posts
    pub fn mean_polarity(&self) -> Option<f64> {
        if self.posts == 0 {
            return None;
        }
        Some(self.total_polarity / self.posts as f64)
    }

    pub fn summary(&self) -> MarketSentiment {
        match self.mean_polarity() {
            Some(mean_polarity) => MarketSentiment::Scored {
                mean_polarity,
                posts: self.posts,
            },
            None => MarketSentiment::NoData,
        }
    }
}

impl<'a> Extend<&'a PostSentiment> for SentimentAggregator {
    fn extend<I: IntoIterator<Item = &'a PostSentiment>>(&mut self, iter: I) {
        for post in iter {
            self.add(post);
        }
    }
}
