//! Linear query scorer: `1.7 * words_NLL + Σ error_weight` (spec.md §4.8).

use crate::language_model::{LanguageModel, OOV_UNSMOOTHED};
use crate::trie::Candidate;

/// Weight given to the language-model term relative to accumulated edit
/// cost, matching `classifiers.py`'s `stat_clf`.
pub const LM_WEIGHT: f64 = 1.7;

/// Score a candidate sequence: the LM term uses unsmoothed NLL (OOV words
/// fall back to the constant 1000, not the smoothed default) plus the sum
/// of each candidate's accumulated edit cost.
pub fn score(candidates: &[Candidate], language_model: &LanguageModel) -> f64 {
    let words: Vec<String> = candidates.iter().map(|c| c.word.to_lowercase()).collect();
    let fix_error: f64 = candidates.iter().map(|c| c.error_weight).sum();
    LM_WEIGHT * words_nll(&words, language_model, false) + fix_error
}

/// Negative log-likelihood of a word sequence under the language model.
///
/// The first word uses its unigram NLL (or the OOV constant/default);
/// every subsequent word prefers the bigram NLL with its predecessor,
/// falling back to the unigram NLL, falling back to the OOV value, exactly
/// as `util.py`'s `evaluate_words_nll`.
pub fn words_nll(words: &[String], language_model: &LanguageModel, smoothing: bool) -> f64 {
    if words.is_empty() {
        return OOV_UNSMOOTHED;
    }
    let oov = |lm: &LanguageModel, word: &str| {
        if smoothing {
            lm.unigram_weight(word)
        } else {
            OOV_UNSMOOTHED
        }
    };

    let mut total = if language_model.unigram_count(&words[0]) > 0 {
        language_model.unigram_weight(&words[0])
    } else {
        oov(language_model, &words[0])
    };

    for i in 1..words.len() {
        let prev = &words[i - 1];
        let word = &words[i];
        if language_model.unigram_count(prev) == 0 {
            total += oov(language_model, word);
            continue;
        }
        let bigram = language_model.bigram_weight(prev, word);
        if bigram == 0.0 {
            total += if language_model.unigram_count(word) > 0 {
                language_model.unigram_weight(word)
            } else {
                oov(language_model, word)
            };
        } else {
            total += bigram;
        }
    }
    total
}
