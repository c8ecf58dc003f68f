use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{SpellError, SpellResult};

/// Additive smoothing constant used for out-of-vocabulary unigrams.
pub const ALPHA: f64 = 1e-5;

/// The constant substituted for an out-of-vocabulary word when smoothing is
/// disabled (see `words_nll` in `crate::scorer`).
pub const OOV_UNSMOOTHED: f64 = 1_000.0;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Unigram and bigram frequency store with additive smoothing for
/// out-of-vocabulary terms.
///
/// Built once from a training corpus, then read-only for the lifetime of
/// the service (see spec.md §5).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LanguageModel {
    unigram_stat: HashMap<String, u32>,
    bigram_stat: HashMap<(String, String), u32>,

    unigram_weights: HashMap<String, f64>,
    bigram_weights: HashMap<(String, String), f64>,

    /// Total unigram token count, N.
    total_count: u64,

    /// Smoothed NLL assigned to any word never seen in training.
    unigram_def_value: f64,
}

impl LanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a tab-separated corpus and accumulate unigram/bigram counts.
    ///
    /// The right-hand field of a `original<TAB>correction` line (or the
    /// whole line when there is no tab) is lower-cased and tokenized with
    /// `\w+`; unigram counts and consecutive-pair bigram counts are
    /// accumulated. Does not call `calc_weights` — call it explicitly once
    /// all corpora have been ingested.
    pub fn build_from_file(&mut self, path: &str) -> SpellResult<()> {
        let file = File::open(path).map_err(|e| SpellError::io(path, e))?;
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("{}", SpellError::MalformedInput(e.to_string()));
                    continue;
                }
            };
            let line = line.to_lowercase();
            let text = match line.find('\t') {
                Some(idx) => &line[idx + 1..],
                None => &line[..],
            };
            self.ingest_line(text);
        }
        self.calc_weights();
        Ok(())
    }

    fn ingest_line(&mut self, text: &str) {
        let words: Vec<&str> = WORD_RE.find_iter(text).map(|m| m.as_str()).collect();
        for (i, word) in words.iter().enumerate() {
            *self.unigram_stat.entry((*word).to_string()).or_insert(0) += 1;
            if let Some(next) = words.get(i + 1) {
                *self
                    .bigram_stat
                    .entry(((*word).to_string(), (*next).to_string()))
                    .or_insert(0) += 1;
            }
        }
    }

    /// Derive all NLL tables and the OOV default from the accumulated
    /// counts. Idempotent; call again after ingesting more data.
    pub fn calc_weights(&mut self) {
        let total: u64 = self.unigram_stat.values().map(|c| *c as u64).sum();
        self.total_count = total;
        let vocab_size = self.unigram_stat.len() as f64;
        self.unigram_def_value = -(ALPHA / (total as f64 + ALPHA * vocab_size)).ln();

        self.unigram_weights.clear();
        for (word, count) in self.unigram_stat.iter() {
            let weight = -((*count as f64) / (total as f64 + ALPHA)).ln();
            self.unigram_weights.insert(word.clone(), weight);
        }

        self.bigram_weights.clear();
        for ((w1, w2), count) in self.bigram_stat.iter() {
            if let Some(c1) = self.unigram_stat.get(w1) {
                let weight = -((*count as f64) / (*c1 as f64)).ln();
                self.bigram_weights.insert((w1.clone(), w2.clone()), weight);
            }
        }
    }

    /// Unigram NLL for `word`, or the smoothed OOV default when unseen.
    pub fn unigram_weight(&self, word: &str) -> f64 {
        self.unigram_weights
            .get(word)
            .copied()
            .unwrap_or(self.unigram_def_value)
    }

    /// Bigram NLL for `(w1, w2)`, or 0.0 (the "fall back to unigram"
    /// sentinel) when the pair was never observed.
    pub fn bigram_weight(&self, w1: &str, w2: &str) -> f64 {
        self.bigram_weights
            .get(&(w1.to_string(), w2.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Raw unigram frequency, for presence checks (0 means out-of-vocabulary).
    pub fn unigram_count(&self, word: &str) -> u32 {
        self.unigram_stat.get(word).copied().unwrap_or(0)
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// All words with positive unigram count — the vocabulary the trie is
    /// built from.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.unigram_stat.keys().map(|s| s.as_str())
    }

    /// Manually record a unigram observation (used by tests and by callers
    /// building a model incrementally rather than from a file).
    pub fn add_unigram(&mut self, word: &str) {
        *self.unigram_stat.entry(word.to_string()).or_insert(0) += 1;
    }

    /// Manually record a bigram observation.
    pub fn add_bigram(&mut self, w1: &str, w2: &str) {
        *self
            .bigram_stat
            .entry((w1.to_string(), w2.to_string()))
            .or_insert(0) += 1;
    }
}
