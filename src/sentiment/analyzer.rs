//! # Sentiment Analyzer
//!
//! Scores a post sentence by sentence with the polarity lexicon.

use serde::{Deserialize, Serialize};

use super::lexicon::PolarityLexicon;
use super::text::SentenceSplitter;

/// One sentence and its polarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentence {
    pub text: String,
    pub polarity: f64,
}

/// Sentiment of one retrieved post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSentiment {
    /// Original post text
    pub text: String,
    /// Sum of the sentence polarities
    pub polarity: f64,
    /// Per-sentence breakdown
    pub sentences: Vec<ScoredSentence>,
}

/// Sentence-level sentiment analyzer
#[derive(Default)]
pub struct SentimentAnalyzer {
    splitter: SentenceSplitter,
    lexicon: PolarityLexicon,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom lexicon
    pub fn with_lexicon(lexicon: PolarityLexicon) -> Self {
        Self {
            splitter: SentenceSplitter::new(),
            lexicon,
        }
    }

    pub fn lexicon(&self) -> &PolarityLexicon {
        &self.lexicon
    }

    /// Score every sentence of `text`
    pub fn analyze_post(&self, text: &str) -> PostSentiment {
        let sentences: Vec<ScoredSentence> = self
            .splitter
            .split(text)
            .into_iter()
            .map(|sentence| ScoredSentence {
                polarity: self.lexicon.sentence_polarity(&sentence),
                text: sentence,
            })
            .collect();

        let polarity = sentences.iter().map(|s| s.polarity).sum();

        PostSentiment {
            text: text.to_string(),
            polarity,
            sentences,
        }
    }

    /// Score a batch of posts
    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<PostSentiment> {
        texts.iter().map(|t| self.analyze_post(t.as_ref())).collect()
    }
}
