//! Embedded literal data: stop-word lists, the RU/EN keyboard map, and the
//! cross-script look-alike table. All three are fixed external interfaces
//! per spec.md §6 and are reproduced verbatim from the original Python
//! prototype (`nltk_util.py`, `trie.py`).

pub static STOP_WORDS_EN: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves",
    "you", "you're", "you've", "you'll", "you'd", "your", "yours", "yourself",
    "yourselves", "he", "him", "his", "himself", "she", "she's", "her",
    "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was",
    "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "a", "an", "the", "and",
    "but", "if", "or", "because", "as", "until", "while", "of",
    "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where",
    "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t",
    "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't",
    "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't",
    "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won",
    "won't", "wouldn", "wouldn't",
];

pub static STOP_WORDS_RU: &[&str] = &[
    "и", "в", "во", "не", "что", "он", "на", "я",
    "с", "со", "как", "а", "то", "все", "она", "так",
    "его", "но", "да", "ты", "к", "у", "же", "вы",
    "за", "бы", "по", "только", "ее", "мне", "было", "вот",
    "от", "меня", "еще", "нет", "о", "из", "ему", "теперь",
    "когда", "даже", "ну", "вдруг", "ли", "если", "уже", "или",
    "ни", "быть", "был", "него", "до", "вас", "нибудь", "опять",
    "уж", "вам", "ведь", "там", "потом", "себя", "ничего", "ей",
    "может", "они", "тут", "где", "есть", "надо", "ней", "для",
    "мы", "тебя", "их", "чем", "была", "сам", "чтоб", "без",
    "будто", "чего", "раз", "тоже", "себе", "под", "будет", "ж",
    "тогда", "кто", "этот", "того", "потому", "этого", "какой", "совсем",
    "ним", "здесь", "этом", "один", "почти", "мой", "тем", "чтобы",
    "нее", "сейчас", "были", "куда", "зачем", "всех", "никогда", "можно",
    "при", "наконец", "два", "об", "другой", "хоть", "после", "над",
    "больше", "тот", "через", "эти", "нас", "про", "всего", "них",
    "какая", "много", "разве", "три", "эту", "моя", "впрочем", "хорошо",
    "свою", "этой", "перед", "иногда", "лучше", "чуть", "том", "нельзя",
    "такой", "им", "более", "всегда", "конечно", "всю", "между",
];

/// RU keyboard row, index-aligned with `KEYBOARD_EN` (spec.md §4.6).
pub static KEYBOARD_RU: &str = "йцукенгшщзхъфывапролджэёячсмитьбю";
/// EN keyboard row, index-aligned with `KEYBOARD_RU`.
pub static KEYBOARD_EN: &str = "qwertyuiop[]asdfghjkl;'\\zxcvbnm,.";

/// The seven cross-script look-alikes whose substitution weight is
/// hard-coded to 0.5, overriding (not adding to) the error-model weight
/// (spec.md §4.4, Design Notes). Maps a Latin letter to its visually
/// similar Cyrillic/Ukrainian code point.
pub static SIMILAR_SYMBOLS: &[(char, char)] = &[
    ('i', '\u{0456}'), // Ukrainian і
    ('e', '\u{0435}'), // Cyrillic е
    ('o', '\u{043e}'), // Cyrillic о
    ('a', '\u{0430}'), // Cyrillic а
    ('c', '\u{0441}'), // Cyrillic с
    ('y', '\u{0443}'), // Cyrillic у
    ('p', '\u{0440}'), // Cyrillic р
];

/// Returns the 0.5 override weight if `trie_letter` is the recognized
/// cross-script look-alike of `input_letter`.
pub fn similar_symbol_weight(input_letter: char, trie_letter: char) -> Option<f64> {
    SIMILAR_SYMBOLS
        .iter()
        .find(|(latin, _)| *latin == trie_letter)
        .filter(|(_, cyr)| *cyr == input_letter)
        .map(|_| 0.5)
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS_EN.contains(&word) || STOP_WORDS_RU.contains(&word)
}

static KEYBOARD_ALPHABET: once_cell::sync::Lazy<std::collections::HashSet<char>> =
    once_cell::sync::Lazy::new(|| {
        KEYBOARD_RU
            .chars()
            .chain(KEYBOARD_RU.to_uppercase().chars())
            .chain(KEYBOARD_EN.chars())
            .chain(KEYBOARD_EN.to_uppercase().chars())
            .collect()
    });

/// Whether `c` is one of the recognized RU/EN keyboard-row letters the trie
/// search walks transitions over (spec.md §4.4, "not in the recognized
/// RU/EN alphabet are skipped").
pub fn is_keyboard_letter(c: char) -> bool {
    KEYBOARD_ALPHABET.contains(&c)
}

static KEYBOARD_FLIP: once_cell::sync::Lazy<std::collections::HashMap<char, char>> =
    once_cell::sync::Lazy::new(|| {
        let ru_lower: Vec<char> = KEYBOARD_RU.chars().collect();
        let ru_upper: Vec<char> = KEYBOARD_RU.to_uppercase().chars().collect();
        let en_lower: Vec<char> = KEYBOARD_EN.chars().collect();
        let en_upper: Vec<char> = KEYBOARD_EN.to_uppercase().chars().collect();
        let mut map = std::collections::HashMap::new();
        for i in 0..ru_lower.len() {
            map.insert(ru_lower[i], en_lower[i]);
            map.insert(en_lower[i], ru_lower[i]);
        }
        for i in 0..ru_upper.len() {
            map.insert(ru_upper[i], en_upper[i]);
            map.insert(en_upper[i], ru_upper[i]);
        }
        map
    });

/// Translate a single character across the RU/EN keyboard map, passing
/// through any character in neither row (spec.md §4.6).
pub fn flip_keyboard_char(c: char) -> char {
    KEYBOARD_FLIP.get(&c).copied().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test0001_keyboard_rows_equal_length() {
        assert_eq!(KEYBOARD_RU.chars().count(), KEYBOARD_EN.chars().count());
    }

    #[test]
    fn test0002_similar_symbol_override() {
        assert_eq!(similar_symbol_weight('\u{0430}', 'a'), Some(0.5));
        assert_eq!(similar_symbol_weight('a', 'a'), None);
    }

    #[test]
    fn test0003_stop_word_membership() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("и"));
        assert!(!is_stop_word("hello"));
    }
}
