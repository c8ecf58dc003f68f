//! Weighted trie search over the language model's vocabulary.
//!
//! `find_candidates` is a best-first expansion of a priority queue of
//! `Transition`s, budgeted by an edit-cost `limit_weight` and a hard
//! iteration cap, exactly mirroring the Python prototype's `Trie.find_candidates`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error_model::ErrorModel;
use crate::language_model::LanguageModel;
use crate::tables;

/// Caller-supplied default search budget (spec.md §4.4).
pub const DEFAULT_LIMIT_WEIGHT: f64 = 8.0;
/// Budget used once the input prefix reaches `LONG_PREFIX_THRESHOLD` characters.
pub const LONG_PREFIX_LIMIT_WEIGHT: f64 = 14.0;
const LONG_PREFIX_THRESHOLD: usize = 5;
const TRANSPOSITION_PENALTY: f64 = 4.0;
const MAX_ITERS: usize = 100_000;

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    is_terminal: bool,
    word: Option<String>,
    lm_weight: f64,
}

/// A proposed replacement word, scored by `1.7 * lm_weight + error_weight`
/// (spec.md §3, Candidate).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub word: String,
    pub lm_weight: f64,
    pub error_weight: f64,
    pub total: f64,
}

impl Candidate {
    pub fn new(word: impl Into<String>, lm_weight: f64, error_weight: f64) -> Self {
        let word = word.into();
        let total = 1.7 * lm_weight + error_weight;
        Candidate { word, lm_weight, error_weight, total }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total
    }
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total
            .partial_cmp(&other.total)
            .expect("candidate weights are never NaN")
    }
}

/// Search-frontier item: a trie position reached with some accumulated cost,
/// the unconsumed input suffix, and the output built so far (spec.md §3,
/// Transition).
struct Transition<'a> {
    node: &'a Node,
    weight: f64,
    prefix: Vec<char>,
    result: String,
}

impl PartialEq for Transition<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}
impl Eq for Transition<'_> {}
impl PartialOrd for Transition<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Transition<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so a `BinaryHeap` (a max-heap) pops the lowest-cost
        // transition first.
        other
            .weight
            .partial_cmp(&self.weight)
            .expect("transition weights are never NaN")
    }
}

/// Keyed candidate cache with the capacity bug from the prototype preserved:
/// it admits entries while `len() <= max_candidates`, i.e. up to
/// `max_candidates + 1` entries, after which further new words are dropped
/// outright rather than evicting the worst (spec.md §4.4.1, §9).
struct CandidateCache {
    entries: HashMap<String, Candidate>,
    max_candidates: usize,
}

impl CandidateCache {
    fn new(max_candidates: usize) -> Self {
        CandidateCache { entries: HashMap::new(), max_candidates }
    }

    fn insert(&mut self, candidate: Candidate) {
        if let Some(existing) = self.entries.get_mut(&candidate.word) {
            if candidate.error_weight < existing.error_weight {
                existing.error_weight = candidate.error_weight;
            }
        } else if self.entries.len() <= self.max_candidates {
            self.entries.insert(candidate.word.clone(), candidate);
        }
    }

    fn into_values(self) -> impl Iterator<Item = Candidate> {
        self.entries.into_values()
    }
}

/// Prefix tree of the language model's in-vocabulary words, searched with a
/// best-first expansion weighted by the error model.
#[derive(Debug, Default)]
pub struct Trie {
    root: Node,
    len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every word with positive unigram count into the trie
    /// (spec.md §4.4).
    pub fn build(&mut self, language_model: &LanguageModel) {
        let words: Vec<String> = language_model.vocabulary().map(|w| w.to_string()).collect();
        for word in words {
            self.add(&word, language_model);
        }
    }

    fn add(&mut self, word: &str, language_model: &LanguageModel) {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_insert_with(Node::default);
        }
        if !node.is_terminal {
            node.is_terminal = true;
            node.word = Some(word.to_string());
            node.lm_weight = language_model.unigram_weight(word);
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, word: &str) -> bool {
        let mut node = &self.root;
        for c in word.chars() {
            match node.children.get(&c) {
                Some(next) => node = next,
                None => return false,
            }
        }
        node.is_terminal
    }

    /// Best-first search for up to `max_candidates + 1` in-vocabulary words
    /// within `limit_weight` of `prefix` (raised to 14 once `prefix` reaches
    /// 5 characters), scored by accumulated edit cost (spec.md §4.4).
    pub fn find_candidates(
        &self,
        prefix: &str,
        max_candidates: usize,
        limit_weight: f64,
        error_model: &ErrorModel,
    ) -> Vec<Candidate> {
        let limit_weight = if prefix.chars().count() >= LONG_PREFIX_THRESHOLD {
            LONG_PREFIX_LIMIT_WEIGHT
        } else {
            limit_weight
        };

        let mut cache = CandidateCache::new(max_candidates);
        let mut queue: BinaryHeap<Transition> = BinaryHeap::new();
        queue.push(Transition {
            node: &self.root,
            weight: 0.0,
            prefix: prefix.chars().collect(),
            result: String::new(),
        });

        let mut iters = 0;
        while let Some(curr) = queue.pop() {
            iters += 1;
            if iters > MAX_ITERS {
                break;
            }

            if curr.prefix.is_empty() && curr.node.is_terminal {
                let word = curr.result.clone();
                cache.insert(Candidate::new(word, curr.node.lm_weight, curr.weight));
            }

            let prefix_letter = curr.prefix.first().copied();
            for (trie_letter, child) in curr.node.children.iter() {
                if !tables::is_keyboard_letter(*trie_letter) {
                    continue;
                }

                if Some(*trie_letter) == prefix_letter {
                    push_if_within_budget(
                        &mut queue,
                        child,
                        curr.weight,
                        curr.prefix[1..].to_vec(),
                        extend(&curr.result, *trie_letter),
                        limit_weight,
                    );
                    if let Some(p) = prefix_letter {
                        if let Some(w) = error_model.weight(None, Some(p)) {
                            push_if_within_budget(
                                &mut queue,
                                child,
                                curr.weight + w,
                                curr.prefix.clone(),
                                extend(&curr.result, p),
                                limit_weight,
                            );
                        }
                    }
                } else {
                    if let Some(w) = error_model.weight(prefix_letter, Some(*trie_letter)) {
                        let w = prefix_letter
                            .and_then(|p| tables::similar_symbol_weight(p, *trie_letter))
                            .unwrap_or(w);
                        push_if_within_budget(
                            &mut queue,
                            child,
                            curr.weight + w,
                            curr.prefix.get(1..).unwrap_or(&[]).to_vec(),
                            extend(&curr.result, *trie_letter),
                            limit_weight,
                        );
                    }
                    if let Some(w) = error_model.weight(None, Some(*trie_letter)) {
                        push_if_within_budget(
                            &mut queue,
                            child,
                            curr.weight + w,
                            curr.prefix.clone(),
                            extend(&curr.result, *trie_letter),
                            limit_weight,
                        );
                    }
                }

                if curr.prefix.len() > 1
                    && Some(*trie_letter) == curr.prefix.get(1).copied()
                    && Some(*trie_letter) != prefix_letter
                {
                    if let Some(p) = prefix_letter {
                        if let Some(grandchild) = child.children.get(&p) {
                            let mut result = curr.result.clone();
                            result.push(*trie_letter);
                            result.push(p);
                            push_if_within_budget(
                                &mut queue,
                                grandchild,
                                curr.weight + TRANSPOSITION_PENALTY,
                                curr.prefix[2..].to_vec(),
                                result,
                                limit_weight,
                            );
                        }
                    }
                }
            }

            if let Some(p) = prefix_letter {
                if let Some(w) = error_model.weight(Some(p), None) {
                    push_if_within_budget(
                        &mut queue,
                        curr.node,
                        curr.weight + w,
                        curr.prefix[1..].to_vec(),
                        curr.result.clone(),
                        limit_weight,
                    );
                }
            }
        }

        // Every terminal node was only ever inserted for a positive-count
        // vocabulary word (see `build`), so every cached candidate is
        // already in-vocabulary by construction (spec.md §8, law 5).
        cache.into_values().collect()
    }
}

fn extend(result: &str, c: char) -> String {
    let mut s = result.to_string();
    s.push(c);
    s
}

fn push_if_within_budget<'a>(
    queue: &mut BinaryHeap<Transition<'a>>,
    node: &'a Node,
    weight: f64,
    prefix: Vec<char>,
    result: String,
    limit_weight: f64,
) {
    if weight < limit_weight {
        queue.push(Transition { node, weight, prefix, result });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[&str]) -> (LanguageModel, ErrorModel, Trie) {
        let mut lm = LanguageModel::new();
        for w in words {
            lm.add_unigram(w);
        }
        lm.calc_weights();
        let mut em = ErrorModel::new();
        em.update_stat("helo", "hello");
        em.update_stat("wrold", "world");
        em.calc_weights();
        let mut trie = Trie::new();
        trie.build(&lm);
        (lm, em, trie)
    }

    #[test]
    fn test0001_exact_match_is_candidate() {
        let (_, em, trie) = build(&["hello", "world"]);
        let candidates = trie.find_candidates("hello", 5, DEFAULT_LIMIT_WEIGHT, &em);
        assert!(candidates.iter().any(|c| c.word == "hello" && c.error_weight == 0.0));
    }

    #[test]
    fn test0002_insertion_recovers_missing_letter() {
        let (_, em, trie) = build(&["hello", "world"]);
        let candidates = trie.find_candidates("helo", 5, DEFAULT_LIMIT_WEIGHT, &em);
        assert!(candidates.iter().any(|c| c.word == "hello"));
    }

    #[test]
    fn test0003_deletion_recovers_extra_letter() {
        let (_, em, trie) = build(&["hello", "world"]);
        let candidates = trie.find_candidates("wrrold", 5, DEFAULT_LIMIT_WEIGHT, &em);
        assert!(candidates.iter().any(|c| c.word == "world"));
    }

    #[test]
    fn test0004_candidates_bounded_by_limit_weight() {
        let (_, em, trie) = build(&["hello", "world"]);
        let candidates = trie.find_candidates("zzzzzzzz", 5, DEFAULT_LIMIT_WEIGHT, &em);
        for c in &candidates {
            assert!(c.error_weight < LONG_PREFIX_LIMIT_WEIGHT);
        }
    }

    #[test]
    fn test0005_long_prefix_raises_budget() {
        let (_, em, trie) = build(&["helloooo"]);
        // a 5+ char prefix should search with the relaxed 14.0 budget
        let candidates = trie.find_candidates("helooooo", 5, DEFAULT_LIMIT_WEIGHT, &em);
        assert!(candidates.iter().all(|c| c.error_weight < LONG_PREFIX_LIMIT_WEIGHT));
    }

    #[test]
    fn test0006_candidates_are_in_vocabulary() {
        let (lm, em, trie) = build(&["hello", "world"]);
        let candidates = trie.find_candidates("helo", 5, DEFAULT_LIMIT_WEIGHT, &em);
        for c in &candidates {
            assert!(lm.unigram_count(&c.word) > 0);
        }
    }
}
