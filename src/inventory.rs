//! Closed phoneme inventory with greedy coverage checking.

/// Symbols the pipeline may emit besides phonemes proper: the word
/// separator, the stress marker, and the syllable boundary.
pub const SEPARATORS: [char; 3] = [' ', 'ˈ', '.'];

/// A closed set of phoneme symbols for one language variety.
///
/// Symbols are kept sorted longest-first so that coverage scanning is
/// maximal-munch: a cluster like `t͡ʃ` must never be shadowed by its
/// leading `t`.
#[derive(Debug, Clone)]
pub struct PhonemeInventory {
    symbols: Vec<String>,
}

impl PhonemeInventory {
    /// Builds an inventory from a whitespace-separated symbol list.
    /// Multi-code-point symbols are treated as atomic clusters.
    pub fn build(symbol_list: &str) -> Self {
        let mut symbols: Vec<String> = symbol_list
            .split_whitespace()
            .map(str::to_string)
            .collect();
        for sep in SEPARATORS {
            symbols.push(sep.to_string());
        }
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        symbols.dedup();
        Self { symbols }
    }

    /// True iff `s` can be fully partitioned, left to right, into
    /// inventory symbols and separators using a longest-symbol-first
    /// scan at every position.
    pub fn covers(&self, s: &str) -> bool {
        self.first_uncovered(s).is_none()
    }

    /// Byte offset of the first position where the greedy scan finds no
    /// matching symbol, or `None` if the whole string is covered.
    pub fn first_uncovered(&self, s: &str) -> Option<usize> {
        let mut pos = 0;
        while pos < s.len() {
            let rest = &s[pos..];
            match self.symbols.iter().find(|sym| rest.starts_with(sym.as_str())) {
                Some(sym) => pos += sym.len(),
                None => return Some(pos),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_inventory() -> PhonemeInventory {
        PhonemeInventory::build(crate::data::vec_profile().unwrap().phonemes.as_str())
    }

    #[test]
    fn test_covers_simple_word() {
        let inv = vec_inventory();
        assert!(inv.covers("ˈɡa.to"));
        assert!(inv.covers("kaŋ"));
        assert!(inv.covers("t͡ʃao"));
    }

    #[test]
    fn test_covers_separators() {
        let inv = vec_inventory();
        assert!(inv.covers("ˈɡa.to e ˈɔ.ka"));
        assert!(inv.covers(""));
    }

    #[test]
    fn test_rejects_foreign_symbol() {
        let inv = vec_inventory();
        assert!(!inv.covers("ɡax̌o"));
        assert!(!inv.covers("gato")); // orthographic g is not the IPA ɡ
    }

    #[test]
    fn test_cluster_not_shadowed_by_prefix() {
        // t alone covers, t͡ʃ alone covers, and the tie-breaking must
        // not leave the combining mark stranded.
        let inv = vec_inventory();
        assert!(inv.covers("tt͡ʃt"));
        assert_eq!(inv.first_uncovered("t͡x"), Some(1));
    }

    #[test]
    fn test_first_uncovered_offset() {
        let inv = vec_inventory();
        // "ɡ" is 2 bytes; the offending "q" sits at byte 2.
        assert_eq!(inv.first_uncovered("ɡqa"), Some(2));
    }

    #[test]
    fn test_covers_is_deterministic() {
        let inv = vec_inventory();
        let s = "zɡɾaŋfiˈɲae";
        assert_eq!(inv.covers(s), inv.covers(s));
        assert!(inv.covers(s));
    }
}
