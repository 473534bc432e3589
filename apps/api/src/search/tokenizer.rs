//! Splits query and document text into lowercase tokens.
//!
//! The two splitters are intentionally different. Query terms are whatever the
//! user typed between spaces ("c++", "node.js" stay whole). Document tokens are
//! cut on the wider delimiter set so "full-stack" yields "full" and "stack".

/// Characters (besides whitespace) that separate document tokens.
const DOCUMENT_DELIMITERS: &[char] = &[',', '.', '-'];

fn is_document_delimiter(c: char) -> bool {
    c.is_whitespace() || DOCUMENT_DELIMITERS.contains(&c)
}

/// Splits a free-text query into lowercase terms on whitespace only.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

/// Splits document text into lowercase tokens on runs of whitespace, comma,
/// period and hyphen. Empty tokens are discarded.
pub fn document_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(is_document_delimiter)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
