//! Post retrieval and scoring

use serde::Serialize;

use super::aggregator::{MarketSentiment, SentimentAggregator};
use super::analyzer::{PostSentiment, SentimentAnalyzer};
use crate::api::PostSource;
use crate::config::SentimentSettings;
use crate::error::Result;

/// Scored posts and their aggregate
#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub posts: Vec<PostSentiment>,
    pub sentiment: MarketSentiment,
}

/// Fetches posts from a [`PostSource`] and scores them
pub struct SentimentCollector<S> {
    source: S,
    analyzer: SentimentAnalyzer,
    max_posts: usize,
    language: String,
    echo: bool,
}

impl<S: PostSource> SentimentCollector<S> {
    pub fn new(source: S, settings: &SentimentSettings) -> Self {
        Self {
            source,
            analyzer: SentimentAnalyzer::new(),
            max_posts: settings.max_posts,
            language: settings.language.clone(),
            echo: true,
        }
    }

    /// Replace the default analyzer
    pub fn with_analyzer(mut self, analyzer: SentimentAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Print each post and its polarity to stdout while collecting
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Fetch up to `max_posts` posts about `query` and score them
    pub fn collect(&self, query: &str) -> Result<SentimentReport> {
        let texts = self.source.search(query, self.max_posts, &self.language)?;
        let mut aggregator = SentimentAggregator::new();
        let mut posts = Vec::with_capacity(texts.len());

        for text in &texts {
            let post = self.analyzer.analyze_post(text);
            if self.echo {
                println!("{}", post.text);
                println!("Polarity: {}", post.polarity);
            }
            log::debug!(
                "Post scored {:.4} over {} sentence(s)",
                post.polarity,
                post.sentences.len()
            );
            aggregator.add(&post);
            posts.push(post);
        }

        let sentiment = aggregator.summary();
        match sentiment {
            MarketSentiment::Scored { mean_polarity, posts } => {
                log::info!("Mean polarity {:.4} over {} post(s)", mean_polarity, posts)
            }
            MarketSentiment::NoData => log::warn!("No posts found for [{}]", query),
        }

        Ok(SentimentReport { posts, sentiment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;

    struct FixedPosts {
        texts: Vec<&'static str>,
        calls: RefCell<Vec<(String, usize, String)>>,
    }

    impl PostSource for FixedPosts {
        fn search(&self, query: &str, max_results: usize, language: &str) -> Result<Vec<String>> {
            self.calls
                .borrow_mut()
                .push((query.to_string(), max_results, language.to_string()));
            Ok(self
                .texts
                .iter()
                .take(max_results)
                .map(|t| t.to_string())
                .collect())
        }
    }

    struct FailingPosts;

    impl PostSource for FailingPosts {
        fn search(&self, _: &str, _: usize, _: &str) -> Result<Vec<String>> {
            Err(AdvisorError::Api {
                service: "Twitter",
                message: "HTTP 503".to_string(),
            })
        }
    }

    fn settings(max_posts: usize) -> SentimentSettings {
        SentimentSettings {
            max_posts,
            ..Default::default()
        }
    }

    #[test]
    fn test_collect_scores_and_averages() {
        let source = FixedPosts {
            texts: vec!["Great quarter!", "Terrible product. Bad support.", "Nothing to say"],
            calls: RefCell::new(Vec::new()),
        };
        let collector = SentimentCollector::new(&source, &settings(100)).with_echo(false);
        let report = collector.collect("Apple Inc.").unwrap();

        assert_eq!(report.posts.len(), 3);
        // (0.8 + (-1.0 + -0.7) + 0.0) / 3
        assert_abs_diff_eq!(
            report.sentiment.mean_polarity().unwrap(),
            -0.3,
            epsilon = 1e-12
        );
        assert_eq!(
            source.calls.borrow()[0],
            ("Apple Inc.".to_string(), 100, "en".to_string())
        );
    }

    #[test]
    fn test_collect_respects_max_posts() {
        let source = FixedPosts {
            texts: vec!["good", "good", "good"],
            calls: RefCell::new(Vec::new()),
        };
        let collector = SentimentCollector::new(&source, &settings(2)).with_echo(false);
        let report = collector.collect("X").unwrap();
        assert_eq!(report.sentiment.posts(), 2);
    }

    #[test]
    fn test_no_posts_is_no_data() {
        let source = FixedPosts {
            texts: Vec::new(),
            calls: RefCell::new(Vec::new()),
        };
        let report = SentimentCollector::new(&source, &settings(100))
            .with_echo(false)
            .collect("Nobody Corp")
            .unwrap();
        assert!(report.posts.is_empty());
        assert_eq!(report.sentiment, MarketSentiment::NoData);
    }

    #[test]
    fn test_source_error_propagates() {
        let result = SentimentCollector::new(FailingPosts, &settings(10)).collect("X");
        assert!(matches!(result, Err(AdvisorError::Api { .. })));
    }
}
