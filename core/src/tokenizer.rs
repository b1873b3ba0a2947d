use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Whitespace (including vertical tab) and sentence punctuation.
    static ref DELIMITERS: Regex = Regex::new(r"[ \r\t\x0B\n,.:;?!]+").expect("valid regex");
}

/// Split document text into lowercase terms.
///
/// Runs of delimiters count as a single boundary and empty tokens are dropped.
/// Characters outside the delimiter set (apostrophes, hyphens, digits) stay
/// inside the term.
pub fn tokenize(text: &str) -> Vec<String> {
    DELIMITERS
        .split(text)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Split a decoded search query into lowercase terms on whitespace.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
