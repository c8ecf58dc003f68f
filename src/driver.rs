//! The correction driver: iterates the generators for a configured number
//! of rounds, accumulates cost, and selects the global minimum-score
//! rewrite (spec.md §4.7).

use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

use crate::error_model::ErrorModel;
use crate::generators::{self};
use crate::language_model::LanguageModel;
use crate::scorer;
use crate::tokenizer::{self};
use crate::trie::{Candidate, Trie};

/// Tunable correction parameters (spec.md §5, §6). Library defaults are
/// `iterations = 1, max_candidates = 5`; the CLI overrides `iterations` to 2.
#[derive(Clone, Debug)]
pub struct CorrectionParams {
    pub iterations: usize,
    pub max_candidates: usize,
}

impl Default for CorrectionParams {
    fn default() -> Self {
        CorrectionParams { iterations: 1, max_candidates: 5 }
    }
}

impl CorrectionParams {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }
}

/// Query strings discovered so far, mapped to their score, in first-seen
/// order — so the final argmin breaks ties by insertion order exactly as
/// iterating a Python dict (insertion-ordered since 3.7) and taking `min`
/// does (spec.md §4.7).
#[derive(Default)]
struct SeenRequests {
    order: Vec<String>,
    scores: HashMap<String, f64>,
}

impl SeenRequests {
    fn contains(&self, query: &str) -> bool {
        self.scores.contains_key(query)
    }

    fn insert(&mut self, query: String, score: f64) {
        self.order.push(query.clone());
        self.scores.insert(query, score);
    }

    fn argmin(&self) -> &str {
        let mut best: Option<(&str, f64)> = None;
        for query in &self.order {
            let score = self.scores[query];
            match best {
                Some((_, b)) if score >= b => {}
                _ => best = Some((query, score)),
            }
        }
        best.map(|(q, _)| q).expect("at least the original query is always recorded")
    }
}

/// Read-only view over the three built models; holds no interior mutable
/// state so it is `Send + Sync` and cheaply cloned per worker
/// (spec.md §5).
pub struct Spellchecker<'a> {
    language_model: &'a LanguageModel,
    error_model: &'a ErrorModel,
    trie: &'a Trie,
    debug: bool,
}

impl<'a> Spellchecker<'a> {
    pub fn new(language_model: &'a LanguageModel, error_model: &'a ErrorModel, trie: &'a Trie) -> Self {
        Spellchecker { language_model, error_model, trie, debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Correct a single query. Infallible: tokenization and the generators
    /// never fail on well-formed UTF-8 input — use `correct_safe` if the
    /// caller cannot tolerate an internal panic escaping.
    pub fn correct(&self, orig_request: &str, params: &CorrectionParams) -> String {
        let mut frontier: HashSet<String> = HashSet::new();
        frontier.insert(orig_request.to_string());

        let mut seen = SeenRequests::default();
        let mut accumulated_errors: HashMap<String, f64> = HashMap::new();

        for round in 0..params.iterations {
            let mut next_frontier: HashSet<String> = HashSet::new();
            for req in &frontier {
                let accumulated = accumulated_errors.get(req).copied().unwrap_or(0.0);
                let tokens = tokenizer::tokenize(req);
                let needs_any_correction = tokens.iter().any(|t| t.needs_correction);

                if !needs_any_correction {
                    if !seen.contains(req) {
                        seen.insert(req.clone(), 0.0);
                        next_frontier.insert(req.clone());
                    }
                    continue;
                }

                if let Some(short_circuit) = tokenizer::special_join(req) {
                    if self.debug {
                        eprintln!("round {round}: special-join short-circuit for {req:?}");
                    }
                    return short_circuit;
                }

                for (fix_req, fix_list) in generators::word_generator(
                    &tokens,
                    self.language_model,
                    self.trie,
                    self.error_model,
                    params.max_candidates,
                ) {
                    if seen.contains(&fix_req) {
                        continue;
                    }
                    let req_score = scorer::score(&fix_list, self.language_model);
                    let sum_error: f64 = fix_list.iter().map(|c| c.error_weight).sum();
                    accumulated_errors.insert(fix_req.clone(), accumulated + sum_error);
                    seen.insert(fix_req.clone(), accumulated + req_score);
                    next_frontier.insert(fix_req);
                }

                if let Some((fix_req, fix_list)) =
                    generators::split_generator_complex(req, self.language_model)
                {
                    if !seen.contains(&fix_req) {
                        let req_score = scorer::score(&fix_list, self.language_model);
                        accumulated_errors.insert(fix_req.clone(), accumulated + 1.0);
                        seen.insert(fix_req.clone(), accumulated + req_score);
                        next_frontier.insert(fix_req);
                    }
                }

                let (fix_req, fix_list) =
                    generators::join_generator(req, &tokens, self.language_model);
                if !seen.contains(&fix_req) {
                    let req_score = scorer::score(&fix_list, self.language_model);
                    accumulated_errors.insert(fix_req.clone(), accumulated + 1.0);
                    seen.insert(fix_req.clone(), accumulated + req_score);
                    next_frontier.insert(fix_req);
                }

                let fix_req = generators::keyboard_layout_generator(req);
                if !seen.contains(&fix_req) {
                    let fix_tokens = tokenizer::tokenize(&fix_req);
                    let fix_list: Vec<Candidate> = fix_tokens
                        .iter()
                        .filter(|t| !t.is_delim)
                        .map(|t| Candidate::new(t.text.to_lowercase(), 0.0, 0.0))
                        .collect();
                    let req_score = scorer::score(&fix_list, self.language_model);
                    accumulated_errors
                        .insert(fix_req.clone(), accumulated + fix_req.chars().count() as f64);
                    seen.insert(fix_req.clone(), accumulated + req_score);
                    next_frontier.insert(fix_req);
                }
            }
            frontier = next_frontier;
        }

        seen.argmin().to_string()
    }

    /// `correct`, but any internal panic (an invariant violation that
    /// "should not happen" per spec.md §7) is caught and the original
    /// query is returned unchanged, mirroring the Python prototype's
    /// bare `except:` in `safe_correction`.
    pub fn correct_safe(&self, orig_request: &str, params: &CorrectionParams) -> String {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.correct(orig_request, params)));
        match result {
            Ok(corrected) => corrected,
            Err(_) => {
                eprintln!("error correcting {orig_request:?}, returning unchanged");
                orig_request.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(unigrams: &[&str], error_pairs: &[(&str, &str)]) -> (LanguageModel, ErrorModel, Trie) {
        let mut lm = LanguageModel::new();
        for w in unigrams {
            lm.add_unigram(w);
        }
        lm.calc_weights();
        let mut em = ErrorModel::new();
        for (orig, fix) in error_pairs {
            em.update_stat(orig, fix);
        }
        em.calc_weights();
        let mut trie = Trie::new();
        trie.build(&lm);
        (lm, em, trie)
    }

    #[test]
    fn test0001_invocabulary_query_is_left_unchanged() {
        let (lm, em, trie) = build(&["hello", "world"], &[("helo", "hello")]);
        let checker = Spellchecker::new(&lm, &em, &trie);
        let result = checker.correct("hello world", &CorrectionParams::default());
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test0002_single_substitution_is_corrected() {
        let (lm, em, trie) = build(&["hello", "world"], &[("helo", "hello"), ("wrold", "world")]);
        let checker = Spellchecker::new(&lm, &em, &trie);
        let result = checker.correct("helo world", &CorrectionParams::default());
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test0003_special_join_short_circuits() {
        let (lm, em, trie) = build(&["hello"], &[]);
        let checker = Spellchecker::new(&lm, &em, &trie);
        let result = checker.correct("t 42 site:.com", &CorrectionParams::default());
        assert_eq!(result, "t42 site:.com");
    }

    #[test]
    fn test0004_safe_correction_never_panics_on_empty_query() {
        let (lm, em, trie) = build(&["hello"], &[]);
        let checker = Spellchecker::new(&lm, &em, &trie);
        let result = checker.correct_safe("", &CorrectionParams::default());
        assert_eq!(result, "");
    }
}
