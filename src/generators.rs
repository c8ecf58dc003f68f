//! Rewrite generators: word-level beam, token split, token join, and the
//! whole-query keyboard-layout flip (spec.md §4.5–§4.6).

use crate::error_model::ErrorModel;
use crate::language_model::LanguageModel;
use crate::scorer;
use crate::tables;
use crate::tokenizer::{self, Token};
use crate::trie::{Candidate, Trie};

/// An ordered candidate sequence (one candidate per estimated token) plus
/// its cached combined score (spec.md §3, CandidateList).
#[derive(Clone, Debug)]
pub struct CandidateList {
    pub candidates: Vec<Candidate>,
    pub weight: f64,
}

impl CandidateList {
    pub fn new(candidates: Vec<Candidate>, language_model: &LanguageModel) -> Self {
        let weight = scorer::score(&candidates, language_model);
        CandidateList { candidates, weight }
    }

    pub fn push(&mut self, candidate: Candidate, language_model: &LanguageModel) {
        self.candidates.push(candidate);
        self.weight = scorer::score(&self.candidates, language_model);
    }
}

fn is_estimated(token: &Token) -> bool {
    !token.is_delim
}

/// Beam search over per-token candidate lists, producing whole-query
/// rewrites (spec.md §4.5).
pub fn word_generator(
    tokens: &[Token],
    language_model: &LanguageModel,
    trie: &Trie,
    error_model: &ErrorModel,
    max_candidates: usize,
) -> Vec<(String, Vec<Candidate>)> {
    const SEED_WIDTH: usize = 5;
    const EXPAND_WIDTH: usize = 10;
    const BEAM_WIDTH: usize = 3;

    let mut fix_words_l: Vec<Vec<Candidate>> = Vec::new();
    let mut tokens_fix_indices: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let orig_word = token.text.to_lowercase();
        if token.needs_correction {
            let found = trie.find_candidates(
                &orig_word,
                max_candidates,
                crate::trie::DEFAULT_LIMIT_WEIGHT,
                error_model,
            );
            let mut fix_words: Vec<Candidate> = found
                .into_iter()
                .filter(|c| language_model.unigram_count(&c.word) > 0)
                .collect();
            fix_words.sort();
            if fix_words.is_empty() {
                fix_words.push(Candidate::new(
                    orig_word.clone(),
                    language_model.unigram_weight(&orig_word),
                    0.0,
                ));
            }
            fix_words_l.push(fix_words);
            tokens_fix_indices.push(i);
        } else if is_estimated(token) {
            fix_words_l.push(vec![Candidate::new(
                orig_word.clone(),
                language_model.unigram_weight(&orig_word),
                0.0,
            )]);
            tokens_fix_indices.push(i);
        }
    }

    let mut res = Vec::new();
    if fix_words_l.is_empty() {
        return res;
    }
    if fix_words_l.len() == 1 {
        let fix_list = vec![fix_words_l[0][0].clone()];
        let fix_words = fix_words_for_reconstruction(tokens, &tokens_fix_indices, &fix_list);
        res.push((tokenizer::reconstruct(tokens, Some(&fix_words)), fix_list));
        return res;
    }

    let mut beam: Vec<CandidateList> = fix_words_l[0]
        .iter()
        .take(SEED_WIDTH)
        .map(|c| CandidateList::new(vec![c.clone()], language_model))
        .collect();

    for next_list in &fix_words_l[1..] {
        let mut expanded: Vec<CandidateList> = Vec::new();
        for cl in &beam {
            for cand in next_list.iter().take(EXPAND_WIDTH) {
                let mut next = cl.clone();
                next.push(cand.clone(), language_model);
                expanded.push(next);
            }
        }
        expanded.sort_by(|a, b| a.weight.partial_cmp(&b.weight).expect("candidate list weights are never NaN"));
        expanded.truncate(BEAM_WIDTH);
        beam = expanded;
    }

    for cl in &beam {
        let fix_words = fix_words_for_reconstruction(tokens, &tokens_fix_indices, &cl.candidates);
        res.push((tokenizer::reconstruct(tokens, Some(&fix_words)), cl.candidates.clone()));
    }
    res
}

fn fix_words_for_reconstruction(
    tokens: &[Token],
    tokens_fix_indices: &[usize],
    chosen: &[Candidate],
) -> Vec<String> {
    tokens_fix_indices
        .iter()
        .zip(chosen.iter())
        .filter(|(&idx, _)| tokens[idx].needs_correction)
        .map(|(_, c)| c.word.clone())
        .collect()
}

/// Translate the whole query across the RU/EN keyboard map (spec.md §4.6).
pub fn keyboard_layout_generator(req: &str) -> String {
    req.chars().map(tables::flip_keyboard_char).collect()
}

fn unscored_candidates(tokens: &[Token]) -> Vec<Candidate> {
    tokens
        .iter()
        .filter(|t| is_estimated(t))
        .map(|t| Candidate::new(t.text.clone(), 0.0, 0.0))
        .collect()
}

/// Try to introduce a space inside every correctable token in the query;
/// a split is kept iff its score strictly improves on the unsplit baseline
/// for that token (spec.md §4.6, Split).
pub fn split_generator_complex(
    req: &str,
    language_model: &LanguageModel,
) -> Option<(String, Vec<Candidate>)> {
    let tokens = tokenizer::tokenize(req);
    let mut new_tokens: Vec<Token> = Vec::new();
    let mut new_fix_cl: Vec<Candidate> = Vec::new();
    let mut did_split = false;

    for token in &tokens {
        if !token.is_delim && !token.is_digit {
            let (fix_tokens, fix_cl, split_here) = split_token(token, language_model);
            if split_here {
                did_split = true;
                new_tokens.extend(fix_tokens);
                new_fix_cl.extend(fix_cl);
            } else {
                new_tokens.push(token.clone());
                new_fix_cl.push(Candidate::new(token.text.clone(), 0.0, 0.0));
            }
        } else {
            new_tokens.push(token.clone());
        }
    }

    if did_split {
        Some((tokenizer::reconstruct(&new_tokens, None), new_fix_cl))
    } else {
        None
    }
}

/// Per-token split attempt. Every candidate split position is compared
/// against the *original* unsplit score, not against the best split found
/// so far — the last position that beats the baseline wins, matching the
/// prototype exactly (its `fix_request_l` is never updated inside the
/// loop).
fn split_token(token: &Token, language_model: &LanguageModel) -> (Vec<Token>, Vec<Candidate>, bool) {
    let chars: Vec<char> = token.text.chars().collect();
    let indices: Vec<usize> = (1..chars.len()).filter(|&i| chars[i - 1] != ' ').collect();

    let mut fix_tokens = vec![token.clone()];
    let mut fix_cl = vec![Candidate::new(token.text.clone(), 0.0, 0.0)];
    let baseline = scorer::score(&fix_cl, language_model);
    let mut did_split = false;

    for &idx in &indices {
        let candidate_text: String =
            chars[..idx].iter().collect::<String>() + " " + &chars[idx..].iter().collect::<String>();
        let candidate_tokens = tokenizer::tokenize(&candidate_text);
        let candidate_cl = unscored_candidates(&candidate_tokens);
        let candidate_score = scorer::score(&candidate_cl, language_model);
        if candidate_score < baseline {
            did_split = true;
            fix_tokens = candidate_tokens;
            fix_cl = candidate_cl;
        }
    }

    if did_split {
        for t in &mut fix_tokens {
            t.needs_correction = !t.is_delim;
        }
    }
    (fix_tokens, fix_cl, did_split)
}

/// Remove delimiters between adjacent non-delimiter tokens, scanning
/// left to right and committing a join whenever it strictly improves the
/// running score (spec.md §4.6, Join).
///
/// `fix_generators.py`'s `join_generator` only bounds-checks the *upper*
/// side of the right index (`idx+1-join_cnt <= len(fix_tokens)-1`); the
/// left index is never checked and, when negative, wraps Python-list-style
/// to count from the end (`fix_tokens[-1]` is the last token) — e.g. a
/// query whose first delimiter sits at `idx == 0` tries to join the last
/// token with the second one. This is reproduced here via `rem_euclid`
/// rather than guarded against, per spec.md's instruction to preserve
/// quirks that are easy to get subtly wrong by re-deriving from prose
/// alone (see DESIGN.md, Open Question decisions).
pub fn join_generator(req: &str, tokens: &[Token], language_model: &LanguageModel) -> (String, Vec<Candidate>) {
    let delim_indices: Vec<i64> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_delim)
        .map(|(i, _)| i as i64)
        .collect();

    let mut fix_tokens: Vec<Token> = tokens.to_vec();
    let mut fix_cl = unscored_candidates(&fix_tokens);
    if fix_cl.is_empty() {
        return (req.to_string(), fix_cl);
    }

    let mut running_score = scorer::score(&fix_cl, language_model);
    let mut join_cnt: i64 = 0;

    for idx in delim_indices {
        let len = fix_tokens.len() as i64;
        if len == 0 {
            continue;
        }
        let left_raw = idx - 1 - join_cnt;
        let right_raw = idx + 1 - join_cnt;
        if right_raw > len - 1 {
            continue;
        }
        let left_u = left_raw.rem_euclid(len) as usize;
        let right_u = right_raw.rem_euclid(len) as usize;
        if fix_tokens[left_u].is_delim || fix_tokens[right_u].is_delim {
            continue;
        }

        let joined_text = format!("{}{}", fix_tokens[left_u].text, fix_tokens[right_u].text);
        let joined_token = Token::joined(&joined_text);

        let mut candidate_tokens: Vec<Token> = fix_tokens[..left_u].to_vec();
        candidate_tokens.push(joined_token);
        candidate_tokens.extend(fix_tokens[right_u + 1..].iter().cloned());

        let candidate_cl = unscored_candidates(&candidate_tokens);
        let candidate_score = scorer::score(&candidate_cl, language_model);
        if candidate_score < running_score {
            fix_tokens = candidate_tokens;
            running_score = candidate_score;
            fix_cl = candidate_cl;
            join_cnt += 2;
        }
    }

    (tokenizer::reconstruct(&fix_tokens, None), fix_cl)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(lines: &[&str]) -> LanguageModel {
        let mut lm = LanguageModel::new();
        for line in lines {
            let words: Vec<&str> = line.split_whitespace().collect();
            for w in &words {
                lm.add_unigram(w);
            }
            for pair in words.windows(2) {
                lm.add_bigram(pair[0], pair[1]);
            }
        }
        lm.calc_weights();
        lm
    }

    #[test]
    fn test0001_keyboard_layout_roundtrips_through_both_rows() {
        let flipped = keyboard_layout_generator("hello");
        let back = keyboard_layout_generator(&flipped);
        assert_eq!(back, "hello");
    }

    #[test]
    fn test0002_keyboard_layout_passes_through_unknown_chars() {
        assert_eq!(keyboard_layout_generator("42!"), "42!");
    }

    #[test]
    fn test0003_join_merges_when_it_improves_score() {
        let lm = model(&["newyork newyork newyork newyork newyork"]);
        let tokens = tokenizer::tokenize("new york");
        let (joined, _) = join_generator("new york", &tokens, &lm);
        assert_eq!(joined, "newyork");
    }

    #[test]
    fn test0004_join_leaves_request_untouched_when_it_does_not_improve() {
        let lm = model(&["new york", "new york", "new york"]);
        let tokens = tokenizer::tokenize("new york");
        let (joined, _) = join_generator("new york", &tokens, &lm);
        assert_eq!(joined, "new york");
    }

    #[test]
    fn test0005_split_complex_introduces_space_when_it_improves_score() {
        let lm = model(&["new york", "new york", "new york", "new york"]);
        let result = split_generator_complex("newyork", &lm);
        assert!(result.is_some());
        assert_eq!(result.unwrap().0, "new york");
    }

    #[test]
    fn test0006_split_complex_returns_none_when_no_split_helps() {
        let lm = model(&["newyork newyork newyork newyork newyork"]);
        let result = split_generator_complex("newyork", &lm);
        assert!(result.is_none());
    }

    #[test]
    fn test0007_leading_delimiter_wraps_left_index_without_panicking() {
        // A leading delimiter drives the first delimiter's left index
        // negative; the upstream index-wraparound quirk (preserved on
        // purpose, see DESIGN.md) resolves it to the last token rather
        // than skipping the join. Neither outcome should panic, and
        // since "yorknew" is never in vocabulary the wrapped join never
        // scores better than the untouched query.
        let lm = model(&["new york", "new york", "new york"]);
        let tokens = tokenizer::tokenize(" new york");
        let (joined, _) = join_generator(" new york", &tokens, &lm);
        assert_eq!(joined, " new york");
    }
}
