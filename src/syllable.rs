//! Syllabification and stress-marker placement.
//!
//! Orthographic stress diacritics mark the stressed vowel, but the
//! phonemic convention wants the marker before the whole syllable,
//! onset included. This module splits a phonemic word into
//! `(onset)?vowel` syllables by maximal munch and repositions the
//! stress marker at the stressed syllable's leading edge, falling back
//! to a per-language default when no marker came through.

use crate::profile::{DefaultStress, LanguageProfile};

pub const STRESS: char = 'ˈ';
pub const BOUNDARY: char = '.';

/// Stand-in for the stress marker while boundaries are inserted, so the
/// marker itself is never consumed as syllable material. Underscores
/// cannot survive the transducer (punctuation collapses to spaces).
const SENTINEL: char = '_';

#[derive(Debug, Clone)]
pub struct SyllableGrammar {
    /// Consonant clusters that may open a syllable, longest first.
    onsets: Vec<String>,
    /// Vowel nuclei, longest first.
    vowels: Vec<String>,
    default_stress: DefaultStress,
}

impl SyllableGrammar {
    pub fn build(profile: &LanguageProfile) -> Self {
        let mut onsets: Vec<String> = profile
            .onsets
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let mut vowels: Vec<String> = profile
            .vowels
            .split_whitespace()
            .map(str::to_string)
            .collect();
        onsets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        onsets.dedup();
        vowels.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        vowels.dedup();
        Self {
            onsets,
            vowels,
            default_stress: profile.default_stress,
        }
    }

    /// Longest `(onset)?vowel` match at the start of `t`, in bytes.
    /// Longer onsets are preferred, then longer vowels; an onset is
    /// dropped rather than left without a nucleus.
    fn match_onset_vowel(&self, t: &str) -> Option<usize> {
        for onset in self.onsets.iter().map(String::as_str).chain([""]) {
            if let Some(rest) = t.strip_prefix(onset) {
                if let Some(vowel) = self.vowels.iter().find(|v| rest.starts_with(v.as_str())) {
                    return Some(onset.len() + vowel.len());
                }
            }
        }
        None
    }

    /// Moves the stress marker so it precedes the longest onset cluster
    /// ending at the marker. `katˈo` becomes `kaˈto`, `ɡˈato` becomes
    /// `ˈɡato`; a marker already at a syllable edge is unaffected.
    fn anchor_stress_to_onset(&self, s: &str) -> String {
        let Some(at) = s.find(STRESS) else {
            return s.to_string();
        };
        let head = &s[..at];
        let Some(onset) = self.onsets.iter().find(|o| head.ends_with(o.as_str())) else {
            return s.to_string();
        };
        let split = at - onset.len();
        let mut out = String::with_capacity(s.len());
        out.push_str(&s[..split]);
        out.push(STRESS);
        out.push_str(onset);
        out.push_str(&s[at + STRESS.len_utf8()..]);
        out
    }

    /// Index of the default-stressed syllable among `count` syllables
    /// when no explicit marker survived. `word` is the unsegmented
    /// input used for the final-vowel check.
    fn default_stress_index(&self, word: &str, count: usize) -> usize {
        let penult = match self.default_stress {
            DefaultStress::PenultimateIfVowelFinal => {
                self.vowels.iter().any(|v| word.ends_with(v.as_str()))
            }
            DefaultStress::Penultimate => true,
            DefaultStress::Final => false,
        };
        if penult && count >= 2 { count - 2 } else { count - 1 }
    }

    /// Splits one phonemic word into syllables and repositions its
    /// stress marker; see the module docs for the contract.
    pub fn syllabify_and_restress(&self, s: &str) -> String {
        if s.chars().count() <= 1 {
            return s.to_string();
        }

        let anchored = self.anchor_stress_to_onset(s);
        let work: String = anchored.replace(STRESS, "_");

        // Insert a boundary before every (onset)?vowel unit.
        let mut marked = String::with_capacity(work.len() * 2);
        let mut pos = 0;
        while pos < work.len() {
            match self.match_onset_vowel(&work[pos..]) {
                Some(len) => {
                    marked.push(BOUNDARY);
                    marked.push_str(&work[pos..pos + len]);
                    pos += len;
                }
                None => {
                    let Some(c) = work[pos..].chars().next() else {
                        break;
                    };
                    marked.push(c);
                    pos += c.len_utf8();
                }
            }
        }

        // If the very first unit did not anchor, the onset/vowel grammar
        // does not describe this string; leave it untouched.
        if !marked.starts_with(BOUNDARY) && !marked.starts_with(SENTINEL) {
            tracing::warn!(input = s, "syllabification failed to anchor at position 0");
            return s.to_string();
        }

        // A sentinel stranded at the end of a syllable belongs to the
        // start of the next one.
        let marked = marked.replace("_.", "._");

        let syllables: Vec<&str> = marked.split(BOUNDARY).filter(|t| !t.is_empty()).collect();
        if syllables.len() == 1 {
            // Monosyllables carry no stress contrast.
            return s.replace(STRESS, "");
        }

        let stressed = syllables
            .iter()
            .position(|t| t.contains(SENTINEL))
            .unwrap_or_else(|| self.default_stress_index(s, syllables.len()));

        let mut parts: Vec<&str> = Vec::with_capacity(syllables.len() + 1);
        parts.extend(&syllables[..stressed]);
        parts.push("ˈ");
        parts.extend(&syllables[stressed..]);

        let mut out = parts.join(".");
        out = out.replace(SENTINEL, "");
        out = out.replace("ˈ.", "ˈ").replace(".ˈ", "ˈ");
        out
    }
}
