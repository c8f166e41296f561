//! Imp Parser Module
//!
//! A generic parser-combinator engine, the precedence combinator built on it,
//! and the Imp grammar that turns tokens into an Abstract Syntax Tree (AST).

mod ast;
pub mod combinator;
pub mod grammar;
pub mod precedence;

pub use ast::{Aexp, ArithOp, Bexp, LogicOp, Operator, RelOp, Statement};
pub use combinator::{BoxedParser, ParseResult, Parser};
pub use grammar::{parse_program, ImpParser};
