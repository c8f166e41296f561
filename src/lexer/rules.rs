//! The ordered lexical rule table for Imp.
//!
//! Rules are tried in order at every scan position and the first match wins,
//! so longer punctuation (`<=`) must come before its prefixes (`<`).

use super::token::Tag;
use regex::Regex;

/// Every reserved token text, punctuation first
pub const RESERVED: &[&str] = &[
    ":=", "(", ")", ";", "+", "-", "*", "/", "<=", "<", ">=", ">", "=", "!=", "and", "or", "not",
    "if", "then", "else", "while", "do", "end",
];

/// Source patterns of the rule table, in priority order
const PATTERNS: &[(&str, Option<Tag>)] = &[
    (r"[ \n\t\r]+", None),
    (r"#[^\n]*", None),
    (r":=", Some(Tag::Reserved)),
    (r"\(", Some(Tag::Reserved)),
    (r"\)", Some(Tag::Reserved)),
    (r";", Some(Tag::Reserved)),
    (r"\+", Some(Tag::Reserved)),
    (r"-", Some(Tag::Reserved)),
    (r"\*", Some(Tag::Reserved)),
    (r"/", Some(Tag::Reserved)),
    (r"<=", Some(Tag::Reserved)),
    (r"<", Some(Tag::Reserved)),
    (r">=", Some(Tag::Reserved)),
    (r">", Some(Tag::Reserved)),
    (r"=", Some(Tag::Reserved)),
    (r"!=", Some(Tag::Reserved)),
    (r"and\b", Some(Tag::Reserved)),
    (r"or\b", Some(Tag::Reserved)),
    (r"not\b", Some(Tag::Reserved)),
    (r"if\b", Some(Tag::Reserved)),
    (r"then\b", Some(Tag::Reserved)),
    (r"else\b", Some(Tag::Reserved)),
    (r"while\b", Some(Tag::Reserved)),
    (r"do\b", Some(Tag::Reserved)),
    (r"end\b", Some(Tag::Reserved)),
    (r"[0-9]+", Some(Tag::Int)),
    (r"[A-Za-z][A-Za-z0-9_]*", Some(Tag::Id)),
];

/// A single entry of the rule table
#[derive(Debug)]
pub struct LexRule {
    /// Pattern as written in the table
    pub pattern: &'static str,
    /// Tag of produced tokens; `None` means the text is skipped
    pub tag: Option<Tag>,
    regex: Regex,
}

impl LexRule {
    fn compile(pattern: &'static str, tag: Option<Tag>) -> Self {
        // Anchor at the scan position: the scanner hands us the remaining input.
        let regex = Regex::new(&format!("^(?:{})", pattern))
            .unwrap_or_else(|e| panic!("invalid lexical rule {:?}: {}", pattern, e));
        LexRule {
            pattern,
            tag,
            regex,
        }
    }

    /// Length in bytes of this rule's match at the start of `rest`, if any
    pub fn match_len(&self, rest: &str) -> Option<usize> {
        self.regex
            .find(rest)
            .map(|m| m.end())
            .filter(|&len| len > 0)
    }
}

lazy_static::lazy_static! {
    static ref RULES: Vec<LexRule> = PATTERNS
        .iter()
        .map(|&(pattern, tag)| LexRule::compile(pattern, tag))
        .collect();
}

/// The compiled Imp rule table
pub fn rules() -> &'static [LexRule] {
    &RULES
}

/// True if `word` is reserved and cannot be used as an identifier
pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}
