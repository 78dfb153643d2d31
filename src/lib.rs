pub mod collate;
pub mod data;
pub mod error;
pub mod g2p;
pub mod inventory;
pub mod language;
pub mod lexicon;
pub mod profile;
pub mod rules;
pub mod syllable;

pub use error::G2PError;
pub use g2p::G2P;
pub use inventory::PhonemeInventory;
pub use language::Language;
pub use rules::RuleSet;
pub use syllable::SyllableGrammar;
