use serde::{Deserialize, Serialize};
use std::fmt;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Original text of the token
    pub text: String,
    /// Lexical class of the token
    pub tag: Tag,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(text: impl Into<String>, tag: Tag, line: usize, column: usize) -> Self {
        Token {
            text: text.into(),
            tag,
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.text, self.tag)
    }
}

/// Lexical classes recognized by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Punctuation and keywords, matched by exact text
    Reserved,
    /// Maximal run of decimal digits
    Int,
    /// Letter followed by letters, digits or underscores
    Id,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tag::Reserved => write!(f, "RESERVED"),
            Tag::Int => write!(f, "INT"),
            Tag::Id => write!(f, "ID"),
        }
    }
}
