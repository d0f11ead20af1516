//! Tokenizing and stemming helpers shared by the extractor and matcher.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("valid word regex"));

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// Lower-cased word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Splits on runs of sentence terminators. Fragments are returned untrimmed.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK.split(text).collect()
}

/// Case-folds and stems the whole phrase as a single unit, so
/// "Machine Learning" becomes "machine learn". Uses Snowball English
/// (Porter2), which differs from classic Porter on some irregular forms.
pub fn stem(phrase: &str) -> String {
    STEMMER.stem(&phrase.trim().to_lowercase()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(
            tokenize("Built APIs in Rust, Go & C++!"),
            vec!["built", "apis", "in", "rust", "go", "c"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("  ... ").is_empty());
    }

    #[test]
    fn test_split_sentences_on_runs() {
        let parts = split_sentences("Know SQL... Love Python! Why?");
        assert_eq!(parts, vec!["Know SQL", " Love Python", " Why", ""]);
    }

    #[test]
    fn test_stem_reduces_inflections() {
        assert_eq!(stem("developing"), "develop");
        assert_eq!(stem("Databases"), stem("database"));
    }

    #[test]
    fn test_stem_uses_porter2_rules() {
        assert_eq!(stem("skies"), "sky");
        assert_eq!(stem("dying"), "die");
        assert_eq!(stem("generalization"), "general");
    }

    #[test]
    fn test_stem_is_case_insensitive() {
        assert_eq!(stem("PYTHON"), stem("python"));
    }
}
