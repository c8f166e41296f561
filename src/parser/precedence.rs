//! Precedence climbing built from the combinator engine.

use super::ast::Operator;
use super::combinator::{fail, reserved, BoxedParser, Parser};
use crate::lexer::Tag;
use std::rc::Rc;

/// Function joining a left and right operand into one value
pub type Combiner<T> = Box<dyn FnOnce(T, T) -> T>;

/// Matches any operator of `ops`, trying them in order
pub fn any_operator_in_list<O: Operator>(ops: &[O]) -> BoxedParser<O> {
    ops.iter()
        .map(|&op| reserved(op.symbol(), Tag::Reserved).map(move |_| op).boxed())
        .reduce(|left, right| left.or(right).boxed())
        .unwrap_or_else(|| fail().boxed())
}

/// Binary operator expressions over `value_parser`
///
/// `levels` runs from the tightest-binding operators to the loosest. Each
/// level becomes a left-associative chain whose operands are the chains of
/// the level before it, so `[[*, /], [+, -]]` makes `*` bind tighter than
/// `+`. `combine` turns the matched operator into the node builder.
pub fn precedence<T, O, F>(
    value_parser: BoxedParser<T>,
    levels: &[&[O]],
    combine: F,
) -> BoxedParser<T>
where
    T: 'static,
    O: Operator,
    F: Fn(O) -> Combiner<T> + 'static,
{
    let combine = Rc::new(combine);
    levels.iter().fold(value_parser, |parser, level| {
        let combine = Rc::clone(&combine);
        let op_parser = any_operator_in_list(level).map(move |op| combine(op));
        parser.chain_left(op_parser).boxed()
    })
}
