//! Sentence-to-word tokenization shared by training and scoring.

/// Punctuation trimmed from both ends of every token.
const STRIP_CHARS: &[char] = &[
    '.', ',', '(', ')', '[', ']', '-', '!', ':', '?', ';', '\\', '"',
];

/// Splits a sentence into normalized word tokens.
///
/// The sentence is lower-cased, a single trailing newline is removed, and the
/// text is split on single space characters only.  Leading and trailing
/// punctuation is then trimmed from each token.  Consecutive spaces yield
/// empty-string tokens; they are retained here so callers make the policy
/// explicit via [`tokenize_with`].
#[must_use]
pub fn tokenize(sentence: &str) -> Vec<String> {
    let lowered = sentence.to_lowercase();
    let line = lowered.strip_suffix('\n').unwrap_or(&lowered);
    line.split(' ')
        .map(|word| word.trim_matches(STRIP_CHARS).to_string())
        .collect()
}

/// Tokenizes a sentence, optionally dropping the empty tokens produced by
/// consecutive spaces or punctuation-only words.
///
/// The flag must match the one the model was trained with so that scoring
/// sees the same word stream as training did.
#[must_use]
pub fn tokenize_with(sentence: &str, drop_empty: bool) -> Vec<String> {
    let mut words = tokenize(sentence);
    if drop_empty {
        words.retain(|word| !word.is_empty());
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_folds_case() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn removes_single_trailing_newline() {
        assert_eq!(tokenize("bonjour le monde\n"), vec!["bonjour", "le", "monde"]);
    }

    #[test]
    fn consecutive_spaces_yield_empty_tokens() {
        assert_eq!(tokenize("a  b"), vec!["a", "", "b"]);
        assert_eq!(tokenize_with("a  b", true), vec!["a", "b"]);
    }

    #[test]
    fn trims_punctuation_from_both_ends_only() {
        assert_eq!(tokenize("\"(nested)\" mid-word"), vec!["nested", "mid-word"]);
        assert_eq!(tokenize("?!;"), vec![""]);
        assert_eq!(tokenize_with("?!;", true), Vec::<String>::new());
    }

    #[test]
    fn other_whitespace_is_not_a_separator() {
        assert_eq!(tokenize("tab\tseparated"), vec!["tab\tseparated"]);
    }
}
