//! Runtime execution for Imp programs

mod environment;
mod evaluator;

pub use environment::Environment;
pub use evaluator::{evaluate, EvalConfig, Evaluator};
