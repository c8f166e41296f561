//! Lexical analysis for Imp
//!
//! Converts source text into a stream of `(text, tag)` tokens using an ordered
//! table of regex rules.

pub mod rules;
mod scanner;
mod token;

pub use scanner::{lex, Scanner};
pub use token::{Tag, Token};
