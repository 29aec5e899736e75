use once_cell::sync::Lazy;
use regex::Regex;

static CLEANER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]+").expect("valid tokenizer regex"));

/// Splits text into vocabulary terms: runs of two or more word characters.
/// Punctuation separates terms, so "what's" yields only "what".
pub fn tokenize(input: &str) -> Vec<String> {
    let normalized = CLEANER.replace_all(input, " ").to_lowercase();

    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(|token| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_single_character_terms() {
        assert_eq!(tokenize("book a flight"), vec!["book", "flight"]);
    }

    #[test]
    fn splits_on_apostrophes() {
        assert_eq!(tokenize("What's up?"), vec!["what", "up"]);
    }
}
