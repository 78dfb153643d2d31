use thiserror::Error;

/// Errors surfaced by rule compilation and the G2P pipeline.
///
/// Coverage and cursor failures are fatal by design: a lexicon with
/// unvalidated entries is worse than no lexicon at all.
#[derive(Debug, Error)]
pub enum G2PError {
    #[error("rule syntax error at line {line}: {message}")]
    RuleSyntax { line: usize, message: String },

    /// A rule matched without consuming any input. This is a
    /// rule-authoring bug, not a recoverable condition.
    #[error("rule cursor stalled in pass {pass} at byte {position} of {text:?}")]
    CursorStall {
        pass: usize,
        position: usize,
        text: String,
    },

    /// The pipeline produced a string that the phoneme inventory cannot
    /// partition into known symbols.
    #[error("phoneme string {output:?} not covered by inventory (first uncovered byte {position})")]
    UncoveredPhonemes { output: String, position: usize },

    #[error("malformed language profile: {0}")]
    Profile(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
