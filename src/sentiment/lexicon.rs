//! # Polarity Lexicon
//!
//! Word-level polarity scores for rule-based sentence scoring. General
//! English opinion words are combined with market vocabulary.

use std::collections::HashMap;

use super::text::tokenize;

/// Multiplier applied to a sentiment word that follows a negation
pub const NEGATION_FACTOR: f64 = -0.5;

/// Polarity lexicon
pub struct PolarityLexicon {
    /// Word to polarity mapping
    words: HashMap<String, f64>,
    /// Negation words
    negations: Vec<String>,
    /// Intensifier words
    intensifiers: HashMap<String, f64>,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityLexicon {
    /// Create a lexicon with the built-in word lists
    pub fn new() -> Self {
        let mut words = HashMap::new();

        let general_words = [
            ("good", 0.7),
            ("great", 0.8),
            ("excellent", 1.0),
            ("amazing", 0.6),
            ("awesome", 1.0),
            ("best", 1.0),
            ("better", 0.5),
            ("nice", 0.6),
            ("love", 0.5),
            ("happy", 0.8),
            ("glad", 0.5),
            ("wonderful", 1.0),
            ("fantastic", 0.4),
            ("impressive", 1.0),
            ("impressed", 0.7),
            ("perfect", 1.0),
            ("win", 0.8),
            ("winner", 0.6),
            ("bad", -0.7),
            ("worse", -0.4),
            ("worst", -1.0),
            ("terrible", -1.0),
            ("awful", -1.0),
            ("horrible", -1.0),
            ("hate", -0.8),
            ("poor", -0.4),
            ("sad", -0.5),
            ("angry", -0.5),
            ("wrong", -0.5),
            ("ugly", -0.7),
            ("stupid", -0.8),
            ("useless", -0.5),
            ("disappointing", -0.6),
            ("disappointed", -0.75),
        ];

        let market_words = [
            ("bullish", 0.8),
            ("surge", 0.7),
            ("rally", 0.7),
            ("soar", 0.8),
            ("gain", 0.5),
            ("profit", 0.6),
            ("profitable", 0.6),
            ("growth", 0.6),
            ("rise", 0.5),
            ("up", 0.3),
            ("outperform", 0.7),
            ("beat", 0.6),
            ("strong", 0.5),
            ("positive", 0.5),
            ("optimistic", 0.6),
            ("record", 0.6),
            ("upgrade", 0.6),
            ("buy", 0.5),
            ("breakout", 0.6),
            ("recovery", 0.5),
            ("rebound", 0.5),
            ("bearish", -0.8),
            ("crash", -0.9),
            ("plunge", -0.8),
            ("drop", -0.6),
            ("fall", -0.5),
            ("decline", -0.6),
            ("loss", -0.6),
            ("down", -0.4),
            ("weak", -0.5),
            ("negative", -0.5),
            ("pessimistic", -0.6),
            ("fear", -0.6),
            ("risk", -0.4),
            ("miss", -0.6),
            ("underperform", -0.6),
            ("downgrade", -0.6),
            ("sell", -0.5),
            ("dump", -0.7),
            ("lawsuit", -0.6),
            ("bankrupt", -0.9),
            ("bankruptcy", -0.9),
            ("scam", -0.9),
            ("fraud", -0.9),
        ];

        for (word, score) in general_words.into_iter().chain(market_words) {
            words.insert(word.to_string(), score);
        }

        let negations = [
            "not", "no", "never", "neither", "nobody", "nothing", "none", "cannot",
            "cant", "can't", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt",
            "won't", "wont", "isn't", "isnt", "aren't", "arent", "wasn't", "wasnt",
            "hardly", "barely",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let intensifiers = [
            ("very", 1.3),
            ("really", 1.3),
            ("extremely", 1.5),
            ("super", 1.3),
            ("so", 1.2),
            ("incredibly", 1.5),
            ("highly", 1.3),
            ("totally", 1.3),
            ("slightly", 0.5),
            ("somewhat", 0.7),
            ("kinda", 0.7),
        ]
        .into_iter()
        .map(|(w, m)| (w.to_string(), m))
        .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Polarity of a word, trying simple inflection stripping on a miss
    pub fn get_score(&self, word: &str) -> Option<f64> {
        let word = word.to_lowercase();
        if let Some(&score) = self.words.get(&word) {
            return Some(score);
        }

        for suffix in ["s", "es", "ed", "d", "ing"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.len() < 3 {
                    continue;
                }
                if let Some(&score) = self.words.get(stem) {
                    return Some(score);
                }
                if let Some(&score) = self.words.get(&format!("{}e", stem)) {
                    return Some(score);
                }
            }
        }
        None
    }

    /// Check if a word is a negation
    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n.eq_ignore_ascii_case(word))
    }

    /// Get intensifier multiplier
    pub fn get_intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(&word.to_lowercase()).copied()
    }

    /// Polarity of one sentence in `[-1, 1]`
    ///
    /// The mean of the matched word scores. A negation scales the next
    /// sentiment word by [`NEGATION_FACTOR`] and an intensifier multiplies
    /// it. Modifiers are dropped when a neutral word intervenes. A sentence
    /// with no sentiment words scores 0.
    pub fn sentence_polarity(&self, sentence: &str) -> f64 {
        let mut scores: Vec<f64> = Vec::new();
        let mut negate_next = false;
        let mut intensifier: f64 = 1.0;

        for word in tokenize(sentence) {
            if self.is_negation(&word) {
                negate_next = true;
                continue;
            }

            if let Some(mult) = self.get_intensifier(&word) {
                intensifier *= mult;
                continue;
            }

            if let Some(mut score) = self.get_score(&word) {
                if negate_next {
                    score *= NEGATION_FACTOR;
                    negate_next = false;
                }
                score *= intensifier;
                intensifier = 1.0;
                scores.push(score);
            } else {
                negate_next = false;
                intensifier = 1.0;
            }
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }

    /// Add or override a word's polarity
    pub fn add_word(&mut self, word: &str, score: f64) {
        self.words.insert(word.to_lowercase(), score);
    }
}
