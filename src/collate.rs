//! Ordering for emitted lexicon lines.
//!
//! Stands in for a full locale collator: primary comparison ignores
//! case and diacritics (NFD base characters), ties break on raw code
//! points so the order is total and stable.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Case- and diacritic-insensitive primary key.
fn primary_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diacritics_sort_with_base_letter() {
        let mut words = vec!["zo", "àqua", "aba"];
        words.sort_by(|a, b| compare(a, b));
        assert_eq!(words, vec!["aba", "àqua", "zo"]);
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(compare("Gato", "gato"), Ordering::Less); // tiebreak on code points
        let mut words = vec!["gato", "Gato", "gata"];
        words.sort_by(|a, b| compare(a, b));
        assert_eq!(words, vec!["gata", "Gato", "gato"]);
    }

    #[test]
    fn test_total_order_on_equal_keys() {
        assert_eq!(compare("e", "e"), Ordering::Equal);
        assert_ne!(compare("e", "é"), Ordering::Equal);
    }
}
