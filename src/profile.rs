use serde::{Deserialize, Serialize};

/// Where the stress marker lands when the orthography carried no
/// stress diacritic. Language-specific; loaded from the profile rather
/// than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultStress {
    /// Second-to-last syllable if the word ends in a vowel, last
    /// syllable otherwise (Venetian, most Romance varieties).
    PenultimateIfVowelFinal,
    /// Always the last syllable.
    Final,
    /// Always the second-to-last syllable.
    Penultimate,
}

/// Static per-variety configuration: the closed phoneme inventory, the
/// syllable grammar, and the default-stress policy. All fields are
/// whitespace-separated symbol lists; multi-code-point symbols are
/// atomic clusters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguageProfile {
    pub name: String,
    /// BCP-47 language tag, e.g. "vec".
    pub tag: String,
    pub phonemes: String,
    pub onsets: String,
    pub vowels: String,
    pub default_stress: DefaultStress,
}
