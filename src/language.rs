use serde::{Deserialize, Serialize};

use crate::data;
use crate::error::G2PError;
use crate::profile::LanguageProfile;

/// Supported language varieties. Each variant carries an embedded
/// ruleset and profile; adding a variety means adding two data files
/// and a match arm here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Language {
    Venetian,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Venetian => "vec",
        }
    }

    pub fn rules(&self) -> &'static str {
        match self {
            Language::Venetian => data::vec_rules(),
        }
    }

    pub fn profile(&self) -> Result<LanguageProfile, G2PError> {
        match self {
            Language::Venetian => data::vec_profile(),
        }
    }
}
