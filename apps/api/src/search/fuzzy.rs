//! Typo-tolerant term matching against a document.

use crate::search::distance::levenshtein;
use crate::search::tokenizer::document_tokens;

/// Maximum edit distance tolerated for a term of `len` chars.
///
/// Short terms must match exactly; longer ones absorb one or two typos.
pub fn edit_threshold(len: usize) -> usize {
    match len {
        0..=3 => 0,
        4..=6 => 1,
        _ => 2,
    }
}

/// Returns true when `term` occurs in `document`, either verbatim (case
/// insensitive substring) or as a document token within the edit threshold.
///
/// An empty term never matches.
pub fn is_fuzzy_match(document: &str, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return false;
    }

    let document = document.to_lowercase();
    if document.contains(&term) {
        return true;
    }

    let term_len = term.chars().count();
    let threshold = edit_threshold(term_len);
    if threshold == 0 {
        return false;
    }

    document_tokens(&document).iter().any(|token| {
        let token_len = token.chars().count();
        if token_len.abs_diff(term_len) > threshold {
            return false;
        }
        levenshtein(token, &term) <= threshold
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_tiers() {
        assert_eq!(edit_threshold(0), 0);
        assert_eq!(edit_threshold(3), 0);
        assert_eq!(edit_threshold(4), 1);
        assert_eq!(edit_threshold(6), 1);
        assert_eq!(edit_threshold(7), 2);
        assert_eq!(edit_threshold(20), 2);
    }

    #[test]
    fn test_empty_term_never_matches() {
        assert!(!is_fuzzy_match("anything at all", ""));
        assert!(!is_fuzzy_match("", ""));
    }

    #[test]
    fn test_substring_short_circuit_is_case_insensitive() {
        assert!(is_fuzzy_match("Junior React Developer", "REACT"));
        // substring, not whole-token
        assert!(is_fuzzy_match("TypeScript", "script"));
    }

    #[test]
    fn test_short_terms_require_exact_substring() {
        assert!(is_fuzzy_match("Go developer", "go"));
        assert!(is_fuzzy_match("Python developer", "pyt"));
        assert!(!is_fuzzy_match("SQL Excel", "sqk"));
    }

    #[test]
    fn test_transposition_over_threshold_for_five_chars() {
        // distance("react", "recat") = 2 > threshold 1
        assert!(!is_fuzzy_match("React Developer", "Recat"));
    }

    #[test]
    fn test_single_typo_in_five_chars() {
        assert!(is_fuzzy_match("React Developer", "Reakt"));
    }

    #[test]
    fn test_long_term_tolerates_typo() {
        assert!(is_fuzzy_match("JavaScript Developer", "Javascrpt"));
        assert!(is_fuzzy_match("Embedded Systems Engineer", "Enginer"));
    }

    #[test]
    fn test_long_term_rejects_three_edits() {
        assert!(!is_fuzzy_match("Microcontrollers", "Mikrokontroler"));
    }

    #[test]
    fn test_tokens_split_on_document_delimiters() {
        // "firmwre" is matched against the "firmware" token out of "firmware-based"
        assert!(is_fuzzy_match("firmware-based, devices.", "firmwre"));
    }

    #[test]
    fn test_length_pruning_does_not_hide_matches() {
        // token "analyst" (7) vs term "analysts" (8): diff 1 within threshold 2
        assert!(is_fuzzy_match("Data Analyst Intern", "analysts"));
    }
}
