//! Error types for the Imp interpreter

use crate::parser::ArithOp;
use thiserror::Error;

/// Imp interpreter errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Lexical errors
    /// No lexical rule matches at the current scan position
    ///
    /// **Triggered by:** A character outside the Imp alphabet
    /// **Example:** `x := 1 @ 2` (`@` is not a token)
    #[error("Illegal character '{character}' at line {line}, column {column}")]
    LexError {
        /// The offending character
        character: char,
        /// Line number where scanning stopped
        line: usize,
        /// Column number where scanning stopped
        column: usize,
    },

    // Parse errors
    /// The program parsed only partially
    ///
    /// **Triggered by:** Tokens left over after the longest statement list
    /// **Example:** `x := 1 y := 2` (missing `;`)
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number of the first unconsumed token
        line: usize,
        /// Column number of the first unconsumed token
        col: usize,
        /// Error description
        message: String,
    },

    /// General parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Program contained no tokens
    #[error("Unexpected end of file")]
    UnexpectedEof,

    // Runtime errors
    /// Division by zero error
    ///
    /// **Triggered by:** Dividing by an expression that evaluates to zero
    /// **Example:** `x := 10 / (y - y)`
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer result does not fit in 64 bits
    #[error("Arithmetic overflow in '{op}'")]
    ArithmeticOverflow {
        /// Operator whose result overflowed
        op: ArithOp,
    },

    /// A `while` loop ran longer than the configured bound
    #[error("Too many iterations (limit: {limit})")]
    TooManyIterations {
        /// Maximum allowed iterations
        limit: u64,
    },
}

impl Error {
    /// True for errors raised before evaluation started
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::LexError { .. }
                | Error::SyntaxError { .. }
                | Error::ParseError(_)
                | Error::UnexpectedEof
        )
    }
}

/// Result type for Imp operations
pub type Result<T> = std::result::Result<T, Error>;
