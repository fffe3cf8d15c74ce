//! Word tokenizer
//!
//! Words (letters, digits, underscores) stay whole, including inner hyphens
//! and apostrophes (`"ion-pump"`, `"operator's"`) and decimal points
//! (`"3.5"`). Every other non-space character is a token of its own.

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:[-'’.]\w+)*|[^\w\s]").expect("token pattern compiles"));

/// Split text into word and punctuation tokens
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            tokenize("Check the pump, then (re)start."),
            vec!["Check", "the", "pump", ",", "then", "(", "re", ")", "start", "."]
        );
    }

    #[test]
    fn test_compound_words_stay_whole() {
        assert_eq!(
            tokenize("ion-pump operator's 3.5 bar"),
            vec!["ion-pump", "operator's", "3.5", "bar"]
        );
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t\n").is_empty());
    }

    #[test]
    fn test_unicode_letters() {
        assert_eq!(tokenize("Prüfstand Ölpumpe"), vec!["Prüfstand", "Ölpumpe"]);
    }
}
