//! # Text Preprocessing
//!
//! Cleans raw post text and breaks it into sentences for scoring.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Sentence splitter for social-media posts
pub struct SentenceSplitter {
    /// Regex for URL removal
    url_regex: Regex,
    /// Regex for mention removal
    mention_regex: Regex,
    /// Horizontal whitespace runs; line breaks are sentence boundaries
    whitespace_regex: Regex,
    /// Sentence terminators and line breaks
    boundary_regex: Regex,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSplitter {
    pub fn new() -> Self {
        Self {
            url_regex: Regex::new(r"https?://\S+|www\.\S+").unwrap(),
            mention_regex: Regex::new(r"@\w+").unwrap(),
            whitespace_regex: Regex::new(r"[^\S\n]+").unwrap(),
            boundary_regex: Regex::new(r"[.!?]+|\n+").unwrap(),
        }
    }

    /// Normalize text: NFC, plain apostrophes, no URLs or mentions, single spaces
    pub fn clean(&self, text: &str) -> String {
        let normalized: String = text.nfc().map(fold_apostrophe).collect();
        let normalized = normalized.replace("\r\n", "\n").replace('\r', "\n");
        let no_urls = self.url_regex.replace_all(&normalized, "");
        let no_mentions = self.mention_regex.replace_all(&no_urls, "");
        self.whitespace_regex
            .replace_all(&no_mentions, " ")
            .trim()
            .to_string()
    }

    /// Cleaned, non-empty sentences of `text`
    pub fn split(&self, text: &str) -> Vec<String> {
        let clean = self.clean(text);
        self.boundary_regex
            .split(&clean)
            .map(str::trim)
            .filter(|s| s.chars().any(char::is_alphanumeric))
            .map(String::from)
            .collect()
    }
}

/// Lowercased word tokens with surrounding punctuation stripped
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence
        .split_whitespace()
        .map(|w| {
            let w: String = w.chars().map(fold_apostrophe).collect();
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_matches('\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Typographic single quotes become `'`
fn fold_apostrophe(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{02bc}' => '\'',
        _ => c,
    }
}
