use crate::error::G2PError;
use crate::profile::LanguageProfile;

pub fn vec_rules() -> &'static str {
    include_str!("../data/vec.rules")
}

pub fn vec_profile() -> Result<LanguageProfile, G2PError> {
    Ok(serde_json::from_str(include_str!("../data/vec.json"))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_profile_parses() {
        let profile = vec_profile().unwrap();
        assert_eq!(profile.tag, "vec");
        assert!(profile.phonemes.split_whitespace().any(|p| p == "t͡ʃ"));
        assert!(profile.onsets.split_whitespace().any(|o| o == "zɡɾ"));
    }
}
