use nlspell::driver::CorrectionParams;
use nlspell::error_model::ErrorModel;
use nlspell::language_model::LanguageModel;
use nlspell::trie::Trie;
use nlspell::Spellchecker;

fn build(unigrams: &[&str], bigrams: &[(&str, &str)], error_pairs: &[(&str, &str)]) -> (LanguageModel, ErrorModel, Trie) {
    let mut lm = LanguageModel::new();
    for w in unigrams {
        lm.add_unigram(w);
    }
    for (w1, w2) in bigrams {
        lm.add_bigram(w1, w2);
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
fn test0001_noop_on_in_vocabulary_query() {
    // E1: both words already in-vocabulary, output is unchanged.
    let (lm, em, trie) = build(&["hello", "world"], &[], &[("helo", "hello")]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    assert_eq!(checker.correct("hello world", &CorrectionParams::default()), "hello world");
}

#[test]
fn test0002_single_substitution_is_corrected() {
    // E2: "helo" -> "hello" via an observed insertion of 'l'.
    let (lm, em, trie) = build(
        &["hello", "world", "help", "held"],
        &[],
        &[("helo", "hello"), ("wrold", "world")],
    );
    let checker = Spellchecker::new(&lm, &em, &trie);
    assert_eq!(checker.correct("helo world", &CorrectionParams::default()), "hello world");
}

#[test]
fn test0003_join_favors_higher_likelihood_compound() {
    // E3: "newyork" strongly outscores the bigram "new york".
    let unigrams: Vec<&str> = std::iter::repeat("newyork").take(6).collect();
    let (lm, em, trie) = build(&unigrams, &[], &[]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    let result = checker.correct("new york", &CorrectionParams::default().with_iterations(2));
    assert_eq!(result, "newyork");
}

#[test]
fn test0004_split_favors_higher_likelihood_bigram() {
    // E4: "new" and "york" individually, with a strong bigram, outscore "newyork".
    let mut unigrams = Vec::new();
    for _ in 0..6 {
        unigrams.push("new");
        unigrams.push("york");
    }
    let bigrams = vec![("new", "york"); 6];
    let (lm, em, trie) = build(&unigrams, &bigrams, &[]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    let result = checker.correct("newyork", &CorrectionParams::default().with_iterations(2));
    assert_eq!(result, "new york");
}

#[test]
fn test0005_keyboard_layout_flip_recovers_misencoded_query() {
    // E5: "руддщ" was typed on the RU layout while meaning "hello"; flipping
    // it across the RU/EN keyboard map and rescoring against a vocabulary
    // that knows "hello" picks the flipped form as the winning candidate.
    let unigrams: Vec<&str> = std::iter::repeat("hello").take(6).collect();
    let (lm, em, trie) = build(&unigrams, &[], &[]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    let result = checker.correct("руддщ", &CorrectionParams::default().with_iterations(2));
    assert_eq!(result, "hello");
}

#[test]
fn test0006_special_join_short_circuits_other_generators() {
    // E6: the hard-coded "letter digits site:.tld" idiom always short-circuits.
    let (lm, em, trie) = build(&["hello"], &[], &[]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    assert_eq!(
        checker.correct("t 42 site:.com", &CorrectionParams::default()),
        "t42 site:.com"
    );
}

#[test]
fn test0007_case_is_preserved_on_first_upper_correction() {
    let (lm, em, trie) = build(&["hello", "world"], &[], &[("helo", "hello")]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    assert_eq!(checker.correct("Helo world", &CorrectionParams::default()), "Hello world");
}

#[test]
fn test0008_safe_correction_returns_original_on_empty_input() {
    let (lm, em, trie) = build(&["hello"], &[], &[]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    assert_eq!(checker.correct_safe("", &CorrectionParams::default()), "");
}

#[test]
fn test0009_delimiter_multiset_shrinks_under_join() {
    // Law 2: join strictly removes a delimiter, never adds one.
    let unigrams: Vec<&str> = std::iter::repeat("newyork").take(6).collect();
    let (lm, em, trie) = build(&unigrams, &[], &[]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    let result = checker.correct("new york", &CorrectionParams::default().with_iterations(2));
    let input_spaces = "new york".matches(' ').count();
    let output_spaces = result.matches(' ').count();
    assert!(output_spaces <= input_spaces);
}

#[test]
fn test0010_unreachable_word_falls_back_to_original() {
    // With an empty vocabulary the trie finds nothing; the word generator
    // falls back to the input word itself rather than dropping the token.
    let (lm, em, trie) = build(&[], &[], &[]);
    let checker = Spellchecker::new(&lm, &em, &trie);
    assert_eq!(checker.correct("xyzzyx", &CorrectionParams::default()), "xyzzyx");
}
