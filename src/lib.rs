//! # Imp - A Small Imperative Language
//!
//! An interpreter for Imp, a tiny imperative language with integer
//! variables, arithmetic and boolean expressions, conditionals and loops.
//! The parser is assembled from a generic, reusable parser-combinator
//! engine rather than written by hand.
//!
//! ## Quick Start
//!
//! Run a program from a string and inspect its final variables:
//!
//! ```rust
//! # fn main() -> imp::Result<()> {
//! let env = imp::run(r#"
//!     n := 5 ;
//!     p := 1 ;
//!     while n > 0 do
//!         p := p * n ;
//!         n := n - 1
//!     end
//! "#)?;
//!
//! assert_eq!(env.get("p"), 120);
//! assert_eq!(env.get("n"), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ### Step by Step
//!
//! ```rust
//! use imp::{Environment, Evaluator, ImpParser, Scanner};
//!
//! # fn main() -> imp::Result<()> {
//! // Tokenize (scan)
//! let mut scanner = Scanner::new("x := 2 + 3 * 4");
//! let tokens = scanner.scan_tokens()?;
//!
//! // Parse into AST
//! let program = ImpParser::new().parse(&tokens)?;
//! assert_eq!(program.to_string(), "x := (2 + (3 * 4))");
//!
//! // Execute
//! let mut env = Environment::new();
//! Evaluator::new(&mut env).execute(&program)?;
//!
//! assert_eq!(env.get("x"), 14);
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! - **Statements**: `x := e`, `s1 ; s2`, `if b then s [else s] end`,
//!   `while b do s end`
//! - **Arithmetic**: `+ - * /` over 64-bit integers, `*` and `/` binding
//!   tighter than `+` and `-`; division rounds toward negative infinity
//! - **Comparison**: `< <= > >= = !=`
//! - **Logical**: `not`, then `and`, then `or`; both sides are always evaluated
//! - Unassigned variables read as 0
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → ImpParser → AST → Evaluator → Environment
//! ```
//!
//! - [`Scanner`] - Regex rule table turning text into tokens
//! - [`parser::combinator`] - The combinator engine ([`Parser`] trait)
//! - [`parser::precedence`] - Operator-precedence layering over any value parser
//! - [`ImpParser`] - The Imp grammar
//! - [`Evaluator`] - Executes statements against an [`Environment`]
//!
//! ## Error Handling
//!
//! ```rust
//! let err = imp::run("x := 10 / (y - y)").unwrap_err();
//! assert_eq!(err, imp::Error::DivisionByZero);
//!
//! let err = imp::run("x := 1 y := 2").unwrap_err();
//! assert!(err.is_syntax());
//! ```

/// Version of the Imp interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use error::{Error, Result};
pub use lexer::{lex, Scanner, Tag, Token};
pub use parser::{parse_program, Aexp, Bexp, ImpParser, Parser, Statement};
pub use runtime::{evaluate, EvalConfig, Environment, Evaluator};

/// Lexes, parses and executes `source` in a fresh environment
pub fn run(source: &str) -> Result<Environment> {
    let tokens = lex(source)?;
    let program = parse_program(&tokens)?;
    evaluate(&program, Environment::new())
}
