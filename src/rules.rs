//! Ordered, context-sensitive rewrite rules applied in passes.
//!
//! The rule text is line-oriented:
//!
//! ```text
//! # comment
//! $ei = [e é è i í ì]          named class; $refs splice, alternatives
//!                              are whitespace-separated strings
//! ::pass                       start the next pass (first is implicit)
//! key → replacement
//! left { key } right → replacement
//! ```
//!
//! Elements of a key or context: literal runs (`\x` escapes, `'…'`
//! quoting), `[…]` sets matched longest-alternative-first, `$name`
//! references, the builtin classes `@punct` and `@space`, and the
//! zero-width boundary `#` (string edge or space). A postfix `?` makes
//! the preceding element optional, `+` repeats it one or more times.
//!
//! Within a pass the cursor scans left to right; at each position rules
//! are tried in declaration order and the first match wins. Contexts are
//! checked but never consumed: the left context against the output
//! emitted so far, the right context against the unconsumed input.
//! Replacement text is emitted verbatim and never rescanned within the
//! same pass. If no rule matches, one character is copied through.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::G2PError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Alt {
    Text(String),
    /// Any single non-alphanumeric, non-whitespace, non-mark character.
    Punct,
    /// Any single whitespace character.
    Space,
    /// Zero-width: start/end of string or adjacent to a space.
    Boundary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Elem {
    Lit(String),
    Set(Vec<Alt>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    One,
    Optional,
    OneOrMore,
}

#[derive(Debug, Clone)]
struct Piece {
    elem: Elem,
    repeat: Repeat,
}

#[derive(Debug, Clone)]
struct Rule {
    left: Vec<Piece>,
    key: Vec<Piece>,
    right: Vec<Piece>,
    replacement: String,
    line: usize,
}

/// A compiled, immutable transliteration ruleset: an ordered sequence
/// of passes, each an ordered list of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    passes: Vec<Vec<Rule>>,
}

fn is_punct_char(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !is_combining_mark(c)
}

impl Alt {
    /// Bytes consumed when matching forward at `pos`, if any.
    fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        let rest = &text[pos..];
        match self {
            Alt::Text(t) => rest.starts_with(t.as_str()).then_some(t.len()),
            Alt::Punct => rest.chars().next().filter(|c| is_punct_char(*c)).map(char::len_utf8),
            Alt::Space => rest.chars().next().filter(|c| c.is_whitespace()).map(char::len_utf8),
            Alt::Boundary => {
                (pos == text.len() || rest.starts_with(' ')).then_some(0)
            }
        }
    }

    /// Bytes matched as a suffix of `text`, if any (left-context scan).
    fn match_before(&self, text: &str, pos: usize) -> Option<usize> {
        let head = &text[..pos];
        match self {
            Alt::Text(t) => head.ends_with(t.as_str()).then_some(t.len()),
            Alt::Punct => head.chars().next_back().filter(|c| is_punct_char(*c)).map(char::len_utf8),
            Alt::Space => head.chars().next_back().filter(|c| c.is_whitespace()).map(char::len_utf8),
            Alt::Boundary => (pos == 0 || head.ends_with(' ')).then_some(0),
        }
    }
}

impl Piece {
    /// Greedy forward match: longest alternative first, no backtracking
    /// across pieces. Returns bytes consumed.
    fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        let one = |p: usize| -> Option<usize> {
            match &self.elem {
                Elem::Lit(t) => text[p..].starts_with(t.as_str()).then_some(t.len()),
                Elem::Set(alts) => alts.iter().find_map(|a| a.match_at(text, p)),
            }
        };
        match self.repeat {
            Repeat::One => one(pos),
            Repeat::Optional => Some(one(pos).unwrap_or(0)),
            Repeat::OneOrMore => {
                let mut total = one(pos)?;
                if total == 0 {
                    return Some(0);
                }
                while let Some(n) = one(pos + total) {
                    if n == 0 {
                        break;
                    }
                    total += n;
                }
                Some(total)
            }
        }
    }

    fn match_before(&self, text: &str, pos: usize) -> Option<usize> {
        let one = |p: usize| -> Option<usize> {
            match &self.elem {
                Elem::Lit(t) => text[..p].ends_with(t.as_str()).then_some(t.len()),
                Elem::Set(alts) => alts.iter().find_map(|a| a.match_before(text, p)),
            }
        };
        match self.repeat {
            Repeat::One => one(pos),
            Repeat::Optional => Some(one(pos).unwrap_or(0)),
            Repeat::OneOrMore => {
                let mut total = one(pos)?;
                if total == 0 {
                    return Some(0);
                }
                while let Some(n) = one(pos - total) {
                    if n == 0 {
                        break;
                    }
                    total += n;
                }
                Some(total)
            }
        }
    }
}

fn match_pieces(pieces: &[Piece], text: &str, mut pos: usize) -> Option<usize> {
    let start = pos;
    for piece in pieces {
        pos += piece.match_at(text, pos)?;
    }
    Some(pos - start)
}

/// Matches `pieces` as a suffix of `text[..pos]`, scanning right to left.
fn match_pieces_before(pieces: &[Piece], text: &str, mut pos: usize) -> bool {
    for piece in pieces.iter().rev() {
        match piece.match_before(text, pos) {
            Some(n) => pos -= n,
            None => return false,
        }
    }
    true
}

impl Rule {
    /// Bytes of input consumed by the key if the rule applies at `pos`,
    /// with `out` being the output emitted so far in this pass.
    fn match_at(&self, text: &str, pos: usize, out: &str) -> Option<usize> {
        let consumed = match_pieces(&self.key, text, pos)?;
        if !self.right.is_empty() && match_pieces(&self.right, text, pos + consumed).is_none() {
            return None;
        }
        if !self.left.is_empty() && !match_pieces_before(&self.left, out, out.len()) {
            return None;
        }
        Some(consumed)
    }
}

struct Parser {
    vars: HashMap<String, Vec<Alt>>,
}

fn syntax(line: usize, message: impl Into<String>) -> G2PError {
    G2PError::RuleSyntax {
        line,
        message: message.into(),
    }
}

impl Parser {
    fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    fn read_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                chars.next();
            } else {
                break;
            }
        }
        name
    }

    /// Parses the interior of a `[…]` set into alternatives, splicing
    /// `$refs` and sorting longest-first.
    fn parse_set(&self, body: &str, line: usize) -> Result<Vec<Alt>, G2PError> {
        let mut alts = Vec::new();
        for item in body.split_whitespace() {
            let mut chars = item.chars().peekable();
            match chars.peek().copied() {
                Some('$') => {
                    chars.next();
                    let name = Self::read_name(&mut chars);
                    let var = self
                        .vars
                        .get(&name)
                        .ok_or_else(|| syntax(line, format!("unknown class ${name}")))?;
                    alts.extend(var.iter().cloned());
                }
                Some('@') => match item {
                    "@punct" => alts.push(Alt::Punct),
                    "@space" => alts.push(Alt::Space),
                    _ => return Err(syntax(line, format!("unknown builtin class {item}"))),
                },
                Some('#') if item == "#" => alts.push(Alt::Boundary),
                Some(_) => {
                    let mut text = String::new();
                    while let Some(c) = chars.next() {
                        if c == '\\' {
                            match chars.next() {
                                Some(e) => text.push(e),
                                None => return Err(syntax(line, "dangling escape")),
                            }
                        } else {
                            text.push(c);
                        }
                    }
                    alts.push(Alt::Text(text));
                }
                None => {}
            }
        }
        if alts.is_empty() {
            return Err(syntax(line, "empty set"));
        }
        // Longest-first so clusters are never shadowed by their prefix.
        alts.sort_by_key(|a| match a {
            Alt::Text(t) => std::cmp::Reverse(t.len()),
            _ => std::cmp::Reverse(0),
        });
        Ok(alts)
    }

    /// Parses one segment (left context, key, or right context) into a
    /// piece sequence.
    fn parse_pieces(&self, segment: &str, line: usize) -> Result<Vec<Piece>, G2PError> {
        let mut pieces: Vec<Piece> = Vec::new();
        let mut lit = String::new();
        let mut chars = segment.chars().peekable();

        let flush = |lit: &mut String, pieces: &mut Vec<Piece>| {
            if !lit.is_empty() {
                pieces.push(Piece {
                    elem: Elem::Lit(std::mem::take(lit)),
                    repeat: Repeat::One,
                });
            }
        };

        while let Some(c) = chars.next() {
            match c {
                c if c.is_whitespace() => flush(&mut lit, &mut pieces),
                '\\' => match chars.next() {
                    Some(e) => lit.push(e),
                    None => return Err(syntax(line, "dangling escape")),
                },
                '\'' => {
                    // Quoted literal run; '' is a literal quote.
                    loop {
                        match chars.next() {
                            Some('\'') => break,
                            Some(q) => lit.push(q),
                            None => return Err(syntax(line, "unterminated quote")),
                        }
                    }
                }
                '[' => {
                    flush(&mut lit, &mut pieces);
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(b) => body.push(b),
                            None => return Err(syntax(line, "unterminated set")),
                        }
                    }
                    pieces.push(Piece {
                        elem: Elem::Set(self.parse_set(&body, line)?),
                        repeat: Repeat::One,
                    });
                }
                '$' => {
                    flush(&mut lit, &mut pieces);
                    let name = Self::read_name(&mut chars);
                    let var = self
                        .vars
                        .get(&name)
                        .ok_or_else(|| syntax(line, format!("unknown class ${name}")))?;
                    pieces.push(Piece {
                        elem: Elem::Set(var.clone()),
                        repeat: Repeat::One,
                    });
                }
                '#' => {
                    flush(&mut lit, &mut pieces);
                    pieces.push(Piece {
                        elem: Elem::Set(vec![Alt::Boundary]),
                        repeat: Repeat::One,
                    });
                }
                '?' | '+' => {
                    // Postfix on the immediately preceding element.
                    if !lit.is_empty() {
                        flush(&mut lit, &mut pieces);
                    }
                    let piece = pieces
                        .last_mut()
                        .ok_or_else(|| syntax(line, format!("dangling postfix {c}")))?;
                    if piece.repeat != Repeat::One {
                        return Err(syntax(line, "double postfix"));
                    }
                    piece.repeat = if c == '?' {
                        Repeat::Optional
                    } else {
                        Repeat::OneOrMore
                    };
                }
                _ => lit.push(c),
            }
        }
        flush(&mut lit, &mut pieces);
        Ok(pieces)
    }

    fn parse_replacement(&self, segment: &str, line: usize) -> Result<String, G2PError> {
        let mut out = String::new();
        let mut chars = segment.chars();
        while let Some(c) = chars.next() {
            // Unquoted whitespace is layout, not output.
            if c.is_whitespace() {
                continue;
            }
            match c {
                '\\' => match chars.next() {
                    Some(e) => out.push(e),
                    None => return Err(syntax(line, "dangling escape")),
                },
                '\'' => loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(q) => out.push(q),
                        None => return Err(syntax(line, "unterminated quote")),
                    }
                },
                _ => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_rule(&self, lhs: &str, rhs: &str, line: usize) -> Result<Rule, G2PError> {
        let (left, key, right) = match (lhs.find('{'), lhs.find('}')) {
            (Some(open), Some(close)) if open < close => (
                self.parse_pieces(&lhs[..open], line)?,
                self.parse_pieces(&lhs[open + 1..close], line)?,
                self.parse_pieces(&lhs[close + 1..], line)?,
            ),
            (None, None) => (Vec::new(), self.parse_pieces(lhs, line)?, Vec::new()),
            _ => return Err(syntax(line, "unbalanced braces")),
        };
        if key.is_empty() {
            return Err(syntax(line, "rule has no key"));
        }
        Ok(Rule {
            left,
            key,
            right,
            replacement: self.parse_replacement(rhs, line)?,
            line,
        })
    }
}

impl RuleSet {
    /// Compiles rule text into an ordered sequence of passes.
    pub fn compile(text: &str) -> Result<Self, G2PError> {
        let mut parser = Parser::new();
        let mut passes: Vec<Vec<Rule>> = vec![Vec::new()];

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed == "::pass" {
                passes.push(Vec::new());
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix('$') {
                if let Some((name, body)) = rest.split_once('=') {
                    let name = name.trim();
                    let body = body.trim();
                    let body = body
                        .strip_prefix('[')
                        .and_then(|b| b.strip_suffix(']'))
                        .ok_or_else(|| syntax(line, "class definition must be a [ ... ] set"))?;
                    let alts = parser.parse_set(body, line)?;
                    parser.vars.insert(name.to_string(), alts);
                    continue;
                }
            }
            let (lhs, rhs) = trimmed
                .split_once('→')
                .or_else(|| trimmed.split_once("->"))
                .ok_or_else(|| syntax(line, "rule has no arrow"))?;
            let rule = parser.parse_rule(lhs.trim(), rhs.trim(), line)?;
            match passes.last_mut() {
                Some(pass) => pass.push(rule),
                None => unreachable!("passes starts non-empty"),
            }
        }

        passes.retain(|p| !p.is_empty());
        Ok(Self { passes })
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Case-folds and NFC-normalizes the input once, then runs every
    /// pass in order.
    pub fn apply(&self, input: &str) -> Result<String, G2PError> {
        let mut text: String = input.to_lowercase().nfc().collect();
        for (index, pass) in self.passes.iter().enumerate() {
            text = Self::run_pass(pass, &text, index)?;
        }
        Ok(text)
    }

    fn run_pass(pass: &[Rule], text: &str, index: usize) -> Result<String, G2PError> {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;
        while pos < text.len() {
            let matched = pass.iter().find_map(|r| {
                r.match_at(text, pos, &out).map(|consumed| (r, consumed))
            });
            match matched {
                Some((rule, 0)) => {
                    tracing::error!(line = rule.line, pass = index, "zero-width rule match");
                    return Err(G2PError::CursorStall {
                        pass: index,
                        position: pos,
                        text: text.to_string(),
                    });
                }
                Some((rule, consumed)) => {
                    out.push_str(&rule.replacement);
                    pos += consumed;
                }
                None => {
                    let Some(c) = text[pos..].chars().next() else {
                        break;
                    };
                    out.push(c);
                    pos += c.len_utf8();
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_rules() -> RuleSet {
        RuleSet::compile(crate::data::vec_rules()).unwrap()
    }

    #[test]
    fn test_compile_vec_ruleset() {
        let rules = vec_rules();
        assert_eq!(rules.pass_count(), 2);
    }

    #[test]
    fn test_plain_word_passes_through() {
        let rules = vec_rules();
        assert_eq!(rules.apply("gato").unwrap(), "ɡato");
    }

    #[test]
    fn test_stress_diacritic_becomes_marker() {
        let rules = vec_rules();
        assert_eq!(rules.apply("gàto").unwrap(), "ɡˈato");
        assert_eq!(rules.apply("caté").unwrap(), "katˈe");
    }

    #[test]
    fn test_digraph_outranks_single_letter() {
        // gh must map to ɡ, never to the palatal d͡ʒ.
        let rules = vec_rules();
        assert_eq!(rules.apply("ghe").unwrap(), "ɡe");
        assert_eq!(rules.apply("ge").unwrap(), "d͡ʒe");
    }

    #[test]
    fn test_palatal_c_with_consumed_vowel() {
        let rules = vec_rules();
        assert_eq!(rules.apply("ciao").unwrap(), "t͡ʃao");
        assert_eq!(rules.apply("ce").unwrap(), "t͡ʃe");
        assert_eq!(rules.apply("chiesa").unwrap(), "kjesa");
    }

    #[test]
    fn test_case_folding_applies_once() {
        let rules = vec_rules();
        assert_eq!(rules.apply("GATO").unwrap(), rules.apply("gato").unwrap());
    }

    #[test]
    fn test_sibilant_voicing_before_voiced_stop() {
        let rules = vec_rules();
        assert_eq!(rules.apply("sbaro").unwrap(), "zbaɾo");
    }

    #[test]
    fn test_nasal_velarization_sees_pass_one_output() {
        let rules = vec_rules();
        // Word-internal n before a consonant.
        assert_eq!(rules.apply("canta").unwrap(), "kaŋta");
        // Word-final n at the string boundary.
        assert_eq!(rules.apply("can").unwrap(), "kaŋ");
        // Intervocalic n is untouched.
        assert_eq!(rules.apply("pane").unwrap(), "pane");
    }

    #[test]
    fn test_elle_evanescente() {
        let rules = vec_rules();
        // ł deletes before front vowels, vocalizes to e̯ elsewhere.
        assert_eq!(rules.apply("bàła").unwrap(), "bˈae̯a");
        assert_eq!(rules.apply("łe").unwrap(), "e");
    }

    #[test]
    fn test_zero_width_match_is_fatal() {
        let rules = RuleSet::compile("a? → x\n").unwrap();
        assert!(matches!(
            rules.apply("b"),
            Err(G2PError::CursorStall { pass: 0, position: 0, .. })
        ));
    }

    #[test]
    fn test_punctuation_collapses_to_word_boundary() {
        let rules = vec_rules();
        assert_eq!(rules.apply("gato-–gato").unwrap(), "ɡato ɡato");
    }

    #[test]
    fn test_apply_is_deterministic() {
        let rules = vec_rules();
        let a = rules.apply("sgrànfiña").unwrap();
        let b = rules.apply("sgrànfiña").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_class_is_syntax_error() {
        let err = RuleSet::compile("$x = [$nope]\n").unwrap_err();
        assert!(matches!(err, G2PError::RuleSyntax { line: 1, .. }));
    }

    #[test]
    fn test_rule_without_arrow_is_syntax_error() {
        assert!(matches!(
            RuleSet::compile("abc def\n"),
            Err(G2PError::RuleSyntax { .. })
        ));
    }

    #[test]
    fn test_first_match_wins_in_declaration_order() {
        let rules = RuleSet::compile("a → 1\na → 2\n").unwrap();
        assert_eq!(rules.apply("aa").unwrap(), "11");
    }

    #[test]
    fn test_replacement_not_rescanned_within_pass() {
        // b → a must not be re-fed to a → b in the same pass.
        let rules = RuleSet::compile("b → a\na → b\n").unwrap();
        assert_eq!(rules.apply("ba").unwrap(), "ab");
    }

    #[test]
    fn test_left_context_checks_emitted_output() {
        let rules = RuleSet::compile("x → y\ny {a} → z\n").unwrap();
        // Input "xa": x becomes y, then a sees emitted y on its left.
        assert_eq!(rules.apply("xa").unwrap(), "yz");
        assert_eq!(rules.apply("a").unwrap(), "a");
    }
}
