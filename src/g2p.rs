use unicode_normalization::UnicodeNormalization;

use crate::error::G2PError;
use crate::inventory::PhonemeInventory;
use crate::language::Language;
use crate::rules::RuleSet;
use crate::syllable::SyllableGrammar;

/// The per-form G2P pipeline: rewrite rules, then syllabification and
/// stress placement per word, then inventory validation.
///
/// Construction compiles the embedded ruleset and profile once; the
/// resulting value is immutable and safe to share across threads.
pub struct G2P {
    language: Language,
    rules: RuleSet,
    syllables: SyllableGrammar,
    inventory: PhonemeInventory,
}

impl G2P {
    pub fn new(language: Language) -> Result<Self, G2PError> {
        let profile = language.profile()?;
        Ok(Self {
            language,
            rules: RuleSet::compile(language.rules())?,
            syllables: SyllableGrammar::build(&profile),
            inventory: PhonemeInventory::build(&profile.phonemes),
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn inventory(&self) -> &PhonemeInventory {
        &self.inventory
    }

    /// Converts one orthographic form to its validated phonemic string.
    ///
    /// The transducer output may contain word boundaries (spaces) when
    /// the form had internal punctuation; each word is syllabified
    /// independently and the words are rejoined with single spaces.
    pub fn phonemize(&self, form: &str) -> Result<String, G2PError> {
        let form: String = form.nfc().collect();
        let ipa = self.rules.apply(&form)?;
        let ipa = ipa
            .split_whitespace()
            .map(|word| self.syllables.syllabify_and_restress(word))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(position) = self.inventory.first_uncovered(&ipa) {
            return Err(G2PError::UncoveredPhonemes {
                output: ipa,
                position,
            });
        }
        Ok(ipa)
    }
}
