//! Word filtering module
//!
//! Turns raw lines from the dictionary files into the final five-letter word
//! set. A token survives only if it is non-empty, not a comment, purely
//! alphabetic, pure ASCII and exactly [`WORD_LENGTH`] characters long; it is
//! then lowercased and kept once.

use std::fmt;

use crate::dedup::Deduplicator;
use crate::error::{BuildError, Result};

/// Length of every accepted word
pub const WORD_LENGTH: usize = 5;

/// Lines starting with this character are comments
pub const COMMENT_MARKER: char = '#';

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Comment,
    NonAlphabetic,
    NonAscii,
    WrongLength,
    Duplicate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Empty => "empty",
            Self::Comment => "comment",
            Self::NonAlphabetic => "non-alphabetic",
            Self::NonAscii => "non-ASCII",
            Self::WrongLength => "wrong length",
            Self::Duplicate => "duplicate",
        };
        f.write_str(reason)
    }
}

/// Check a single token and return its normalized form.
///
/// Does not deduplicate; see [`WordFilter`] for that.
pub fn normalize(token: &str) -> std::result::Result<String, Rejection> {
    let word = token.trim();

    if word.is_empty() {
        return Err(Rejection::Empty);
    }
    if word.starts_with(COMMENT_MARKER) {
        return Err(Rejection::Comment);
    }
    if !word.chars().all(char::is_alphabetic) {
        return Err(Rejection::NonAlphabetic);
    }
    // Independent of the alphabetic check: scripts with letters outside
    // ASCII must still be rejected here.
    if !word.is_ascii() {
        return Err(Rejection::NonAscii);
    }
    if word.chars().count() != WORD_LENGTH {
        return Err(Rejection::WrongLength);
    }

    Ok(word.to_ascii_lowercase())
}

/// Rejection counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: u64,
    pub empty: u64,
    pub comment: u64,
    pub non_alphabetic: u64,
    pub non_ascii: u64,
    pub wrong_length: u64,
    pub duplicate: u64,
}

impl FilterStats {
    fn record(&mut self, rejection: Rejection) {
        let counter = match rejection {
            Rejection::Empty => &mut self.empty,
            Rejection::Comment => &mut self.comment,
            Rejection::NonAlphabetic => &mut self.non_alphabetic,
            Rejection::NonAscii => &mut self.non_ascii,
            Rejection::WrongLength => &mut self.wrong_length,
            Rejection::Duplicate => &mut self.duplicate,
        };
        *counter += 1;
    }

    pub fn rejected(&self) -> u64 {
        self.empty
            + self.comment
            + self.non_alphabetic
            + self.non_ascii
            + self.wrong_length
            + self.duplicate
    }

    pub fn total(&self) -> u64 {
        self.accepted + self.rejected()
    }
}

/// Accumulates accepted words in input order
pub struct WordFilter {
    seen: Deduplicator,
    words: Vec<String>,
    stats: FilterStats,
}

impl WordFilter {
    pub fn new() -> Self {
        Self {
            seen: Deduplicator::new(),
            words: Vec::new(),
            stats: FilterStats::default(),
        }
    }

    /// Feed one raw token. Returns the normalized word when it was accepted.
    pub fn push(&mut self, token: &str) -> std::result::Result<&str, Rejection> {
        let outcome = normalize(token).and_then(|word| {
            if self.seen.insert(&word) {
                Ok(word)
            } else {
                Err(Rejection::Duplicate)
            }
        });

        match outcome {
            Ok(word) => {
                self.stats.accepted += 1;
                self.words.push(word);
                Ok(self.words[self.words.len() - 1].as_str())
            }
            Err(rejection) => {
                log::trace!("rejected {:?}: {}", token, rejection);
                self.stats.record(rejection);
                Err(rejection)
            }
        }
    }

    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            let _ = self.push(token.as_ref());
        }
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Sort the accepted words. An empty result is an error.
    pub fn finish(self) -> Result<WordSet> {
        let WordFilter {
            mut words, stats, ..
        } = self;

        if words.is_empty() {
            return Err(BuildError::EmptyWordSet);
        }

        words.sort_unstable();
        log::debug!(
            "filter kept {} of {} tokens ({} duplicates)",
            stats.accepted,
            stats.total(),
            stats.duplicate
        );

        Ok(WordSet { words, stats })
    }
}

impl Default for WordFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the whole filter over a sequence of raw lines
pub fn filter_words<I, S>(tokens: I) -> Result<WordSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut filter = WordFilter::new();
    filter.extend(tokens);
    filter.finish()
}

/// Final sorted, unique list of lowercase five-letter words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    words: Vec<String>,
    stats: FilterStats,
}

impl WordSet {
    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.words.iter()
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// First and last `n` words, for the run summary
    pub fn sample(&self, n: usize) -> (&[String], &[String]) {
        let n = n.min(self.words.len());
        (&self.words[..n], &self.words[self.words.len() - n..])
    }
}

impl<'a> IntoIterator for &'a WordSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
