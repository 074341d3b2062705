//! Lexical statistics of a single comment: shouting, first-person pronouns
//! and length.

use regex::Regex;

/// Singular first-person forms
const SINGULAR_PRONOUNS: &[&str] = &[
    "i", "i'd", "i'll", "i'm", "i've", "im", "ive", "me", "mine", "my", "myself",
];

/// Plural and inclusive first-person forms
const PLURAL_PRONOUNS: &[&str] = &[
    "lets", "let's", "our", "ours", "ourselves", "us", "we", "we'd", "we'll", "we're", "weve",
    "we've",
];

/// Punctuation stripped from both ends of a token before pronoun matching
const STRIP_CHARS: &[char] = &['.', ',', '!', '?', '"', '\'', '(', ')', '[', ']'];

/// Scalar lexical counts of one comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexicalFeatures {
    pub allcaps_c: usize,
    pub sin_pro: usize,
    pub plu_pro: usize,
    pub word_count: usize,
    pub char_count: usize,
}

pub struct LexicalExtractor {
    allcaps_regex: Regex,
}

impl LexicalExtractor {
    pub fn new() -> Self {
        LexicalExtractor {
            allcaps_regex: Regex::new(r"\b[A-Z]{2,}\b").expect("valid all-caps pattern"),
        }
    }

    /// Extract all lexical counts from the raw comment text.
    pub fn extract(&self, text: &str) -> LexicalFeatures {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        LexicalFeatures {
            allcaps_c: self.count_allcaps(text),
            sin_pro: count_pronouns(&words, SINGULAR_PRONOUNS),
            plu_pro: count_pronouns(&words, PLURAL_PRONOUNS),
            word_count: words.len(),
            char_count: text.chars().count(),
        }
    }

    /// Words of two or more letters written entirely in capitals.
    pub fn count_allcaps(&self, text: &str) -> usize {
        self.allcaps_regex.find_iter(text).count()
    }
}

impl Default for LexicalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Count (not deduplicate) tokens that are members of `dictionary`.
fn count_pronouns(words: &[&str], dictionary: &[&str]) -> usize {
    words
        .iter()
        .map(|word| word.trim_matches(STRIP_CHARS))
        .filter(|word| dictionary.contains(word))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shouted_comment() {
        let extractor = LexicalExtractor::new();
        let features = extractor.extract("I LOVE this!!");

        assert_eq!(features.allcaps_c, 1);
        assert_eq!(features.sin_pro, 1);
        assert_eq!(features.plu_pro, 0);
        assert_eq!(features.word_count, 3);
        assert_eq!(features.char_count, 13);
    }

    #[test]
    fn test_single_capital_not_counted() {
        let extractor = LexicalExtractor::new();
        assert_eq!(extractor.count_allcaps("I A OK WOW"), 2);
        assert_eq!(extractor.count_allcaps("LOVEly NoPE"), 0);
    }

    #[test]
    fn test_pronouns_strip_punctuation_and_repeat() {
        let extractor = LexicalExtractor::new();
        let features = extractor.extract("(We) love it, we're here... \"me\" and MY friends, us!");

        assert_eq!(features.plu_pro, 3);
        assert_eq!(features.sin_pro, 2);
    }

    #[test]
    fn test_emoji_and_whitespace_counts() {
        let extractor = LexicalExtractor::new();
        let features = extractor.extract("we love it 😍");

        assert_eq!(features.plu_pro, 1);
        assert_eq!(features.word_count, 4);
        assert_eq!(features.char_count, 12);
    }

    #[test]
    fn test_empty_text() {
        let extractor = LexicalExtractor::new();
        assert_eq!(extractor.extract(""), LexicalFeatures::default());
    }
}
