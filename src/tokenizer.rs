//! Two-pass query segmentation (spec.md §4.1).
//!
//! Pass 1 splits on whitespace vs. non-whitespace runs. Pass 2 reclassifies
//! each non-delimiter run as special (email/URL), digit, stop-word, or
//! splits it further into `\w+`/`\W+` runs, each independently classified.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tables;

static PASS1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+|\S+").expect("valid regex"));
static PASS2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|\W+").expect("valid regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.[\w.]+$").expect("valid regex"));
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:[-\w]+\.)?[-\w]+\.\w+(?:\.\w+)?/?.*$").expect("valid regex")
});
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static SPECIAL_JOIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w) (\d\d site:\.\w{2,4})$").expect("valid regex"));

/// One unit of a tokenized query. Exactly one of `is_delim`, `needs_correction`,
/// `is_stop_word`, `is_digit`, `is_special`, `is_single_letter` is the reason
/// for this token's classification; delimiters carry no other flag
/// (spec.md §3, Token invariant).
#[derive(Clone, Debug)]
pub struct Token {
    pub text: String,
    pub is_delim: bool,
    pub is_stop_word: bool,
    pub is_digit: bool,
    pub is_special: bool,
    pub is_single_letter: bool,
    pub needs_correction: bool,
    pub first_upper: bool,
    pub all_upper: bool,
}

impl Token {
    fn new(text: &str, needs_correction: bool, is_delim: bool, is_stop_word: bool, is_single_letter: bool) -> Self {
        let (first_upper, all_upper) = if needs_correction {
            let first_upper = text.chars().next().is_some_and(|c| c.is_uppercase());
            let all_upper = !text.is_empty() && text.chars().all(|c| !c.is_lowercase());
            (first_upper, all_upper)
        } else {
            (false, false)
        };
        Token {
            text: text.to_string(),
            is_delim,
            is_stop_word,
            is_digit: false,
            is_special: false,
            is_single_letter,
            needs_correction,
            first_upper,
            all_upper,
        }
    }

    fn delim(text: &str) -> Self {
        Token::new(text, false, true, false, false)
    }

    /// A synthetic token formed by the join generator merging two
    /// neighbors; always a correction candidate, never a delimiter.
    pub fn joined(text: &str) -> Self {
        Token::new(text, true, false, false, false)
    }
}

/// Whether `req` matches the hard-coded "letter digits site:.tld" idiom; if
/// so, returns the short-circuit replacement (spec.md §4.6, special joiner).
pub fn special_join(req: &str) -> Option<String> {
    let caps = SPECIAL_JOIN_RE.captures(req)?;
    Some(format!("{}{}", &caps[1], &caps[2]))
}

pub fn tokenize(req: &str) -> Vec<Token> {
    let mut pass1 = Vec::new();
    for m in PASS1_RE.find_iter(req) {
        let text = m.as_str();
        let is_delim = text.chars().next().is_some_and(|c| c.is_whitespace());
        pass1.push(Token::new(text, !is_delim, is_delim, false, false));
    }

    let mut tokens = Vec::new();
    for t in pass1 {
        if t.is_delim {
            tokens.push(t);
            continue;
        }
        if EMAIL_RE.is_match(&t.text) || URL_RE.is_match(&t.text) {
            let mut t = t;
            t.is_special = true;
            t.needs_correction = false;
            t.is_stop_word = false;
            tokens.push(t);
            continue;
        }
        if DIGIT_RE.is_match(&t.text) {
            let mut t = t;
            t.is_digit = true;
            t.needs_correction = false;
            tokens.push(t);
            continue;
        }
        if tables::is_stop_word(&t.text) {
            let mut t = t;
            t.is_stop_word = true;
            t.needs_correction = false;
            tokens.push(t);
            continue;
        }

        for m in PASS2_RE.find_iter(&t.text) {
            let sub = m.as_str();
            let is_delim = !sub.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_');
            if is_delim {
                tokens.push(Token::delim(sub));
                continue;
            }
            let is_special = EMAIL_RE.is_match(sub) || URL_RE.is_match(sub);
            let is_digit = DIGIT_RE.is_match(sub);
            let is_stop = tables::is_stop_word(sub);
            let is_single_letter = sub.chars().count() == 1 && !is_special && !is_digit;
            let needs_correction = !is_stop && !is_special && !is_single_letter && !is_digit;

            let mut new_token = Token::new(sub, needs_correction, false, is_stop, is_single_letter);
            new_token.is_digit = is_digit;
            new_token.is_special = is_special;
            tokens.push(new_token);
        }
    }
    tokens
}

/// Re-assemble tokens into surface text, transferring case onto each
/// replacement word from its original surface form (spec.md §4.1,
/// Reconstruction).
pub fn reconstruct(tokens: &[Token], fix_words: Option<&[String]>) -> String {
    let mut fix_iter = fix_words.map(|w| w.iter());
    let mut req = String::new();
    for t in tokens {
        if !t.needs_correction {
            req.push_str(&t.text);
            continue;
        }
        let fix_word = match fix_iter.as_mut().and_then(|it| it.next()) {
            Some(w) => w.as_str(),
            None => &t.text,
        };
        if t.all_upper {
            req.push_str(&fix_word.to_uppercase());
        } else if t.text.to_lowercase() == fix_word {
            req.push_str(&t.text);
        } else if t.text.chars().count() == fix_word.chars().count() {
            for (c, fix_c) in t.text.chars().zip(fix_word.chars()) {
                if c.is_uppercase() {
                    req.extend(fix_c.to_uppercase());
                } else {
                    req.push(fix_c);
                }
            }
        } else if t.first_upper {
            req.push_str(&capitalize(fix_word));
        } else {
            req.push_str(fix_word);
        }
    }
    req
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
