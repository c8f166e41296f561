//! The Imp grammar, assembled from the combinator engine.
//!
//! Each function builds a fresh parser. Productions that refer back to
//! themselves (parentheses, nested statement lists, `not`) go through
//! [`lazy`] so that building the grammar terminates.

use super::ast::{Aexp, ArithOp, Bexp, LogicOp, RelOp, Statement};
use super::combinator::{lazy, reserved, tag, BoxedParser, Parser, Reserved, TagParser};
use super::precedence::{any_operator_in_list, precedence, Combiner};
use crate::error::{Error, Result};
use crate::lexer::{Tag, Token};

/// Operator levels for arithmetic, tightest first
const AEXP_PRECEDENCE_LEVELS: &[&[ArithOp]] = &[
    &[ArithOp::Mul, ArithOp::Div],
    &[ArithOp::Add, ArithOp::Sub],
];

/// Operator levels for boolean connectives, tightest first
const BEXP_PRECEDENCE_LEVELS: &[&[LogicOp]] = &[&[LogicOp::And], &[LogicOp::Or]];

/// Parser for a reserved word or punctuation token
pub fn keyword(kw: &str) -> Reserved {
    reserved(kw, Tag::Reserved)
}

/// Integer literal; digit runs that overflow `i64` do not match
fn num() -> impl Parser<Output = i64> {
    tag(Tag::Int).filter_map(|text| text.parse::<i64>().ok())
}

fn id() -> TagParser {
    tag(Tag::Id)
}

fn process_group<T>(parsed: ((String, T), String)) -> T {
    let ((_, inner), _) = parsed;
    inner
}

// ============================================================================
// Arithmetic expressions
// ============================================================================

fn aexp_value() -> BoxedParser<Aexp> {
    num().map(Aexp::Int).or(id().map(Aexp::Var)).boxed()
}

fn aexp_group() -> BoxedParser<Aexp> {
    keyword("(")
        .then(lazy(aexp))
        .then(keyword(")"))
        .map(process_group)
        .boxed()
}

fn aexp_term() -> BoxedParser<Aexp> {
    aexp_value().or(aexp_group()).boxed()
}

fn process_binop(op: ArithOp) -> Combiner<Aexp> {
    Box::new(move |left, right| Aexp::binop(op, left, right))
}

/// Arithmetic expression: `*` and `/` bind tighter than `+` and `-`
pub fn aexp() -> BoxedParser<Aexp> {
    precedence(aexp_term(), AEXP_PRECEDENCE_LEVELS, process_binop)
}

// ============================================================================
// Boolean expressions
// ============================================================================

fn bexp_not() -> BoxedParser<Bexp> {
    keyword("not")
        .then(lazy(bexp_term))
        .map(|(_, exp)| Bexp::negate(exp))
        .boxed()
}

fn bexp_relop() -> BoxedParser<Bexp> {
    aexp()
        .then(any_operator_in_list(&RelOp::ALL))
        .then(aexp())
        .map(|((left, op), right)| Bexp::relop(op, left, right))
        .boxed()
}

fn bexp_group() -> BoxedParser<Bexp> {
    keyword("(")
        .then(lazy(bexp))
        .then(keyword(")"))
        .map(process_group)
        .boxed()
}

fn bexp_term() -> BoxedParser<Bexp> {
    bexp_not().or(bexp_relop()).or(bexp_group()).boxed()
}

fn process_logic(op: LogicOp) -> Combiner<Bexp> {
    Box::new(move |left, right| Bexp::logic(op, left, right))
}

/// Boolean expression: `and` binds tighter than `or`
pub fn bexp() -> BoxedParser<Bexp> {
    precedence(bexp_term(), BEXP_PRECEDENCE_LEVELS, process_logic)
}

// ============================================================================
// Statements
// ============================================================================

fn assign_stmt() -> BoxedParser<Statement> {
    id()
        .then(keyword(":="))
        .then(aexp())
        .map(|((name, _), value)| Statement::Assign { name, value })
        .boxed()
}

fn if_stmt() -> BoxedParser<Statement> {
    keyword("if")
        .then(bexp())
        .then(keyword("then"))
        .then(lazy(stmt_list))
        .then(keyword("else").then(lazy(stmt_list)).opt())
        .then(keyword("end"))
        .map(|(((((_, condition), _), true_stmt), false_parsed), _)| {
            let false_stmt = false_parsed.map(|(_, stmt)| stmt);
            Statement::if_then(condition, true_stmt, false_stmt)
        })
        .boxed()
}

fn while_stmt() -> BoxedParser<Statement> {
    keyword("while")
        .then(bexp())
        .then(keyword("do"))
        .then(lazy(stmt_list))
        .then(keyword("end"))
        .map(|((((_, condition), _), body), _)| Statement::while_do(condition, body))
        .boxed()
}

fn stmt() -> BoxedParser<Statement> {
    assign_stmt().or(if_stmt()).or(while_stmt()).boxed()
}

/// One or more statements separated by `;`, nested to the left
pub fn stmt_list() -> BoxedParser<Statement> {
    let separator = keyword(";").map(|_| Statement::compound);
    stmt().chain_left(separator).boxed()
}

/// Whole program: a statement list that consumes every token
pub fn program() -> BoxedParser<Statement> {
    stmt_list().phrase().boxed()
}

/// Reusable Imp parser
///
/// Building the grammar allocates the whole combinator tree, so keep one
/// around when parsing many programs.
pub struct ImpParser {
    program: BoxedParser<Statement>,
    statements: BoxedParser<Statement>,
}

impl ImpParser {
    /// Builds the Imp grammar
    pub fn new() -> Self {
        ImpParser {
            program: program(),
            statements: stmt_list(),
        }
    }

    /// Parses a complete program
    ///
    /// The grammar itself only knows success or failure. When it fails, the
    /// longest parsable statement list is used to point at the first token
    /// that could not be consumed.
    pub fn parse(&self, tokens: &[Token]) -> Result<Statement> {
        if tokens.is_empty() {
            return Err(Error::UnexpectedEof);
        }

        if let Some(result) = self.program.parse(tokens, 0) {
            tracing::debug!("parsed program of {} tokens", tokens.len());
            return Ok(result.value);
        }

        let stopped_at = self
            .statements
            .parse(tokens, 0)
            .map(|partial| partial.pos)
            .unwrap_or(0);
        tracing::debug!("parse stopped at token {}", stopped_at);

        match (stopped_at, tokens.get(stopped_at)) {
            (0, Some(token)) => Err(Error::ParseError(format!(
                "expected a statement, found '{}' at line {}, column {}",
                token.text, token.line, token.column
            ))),
            (_, Some(token)) => Err(Error::SyntaxError {
                line: token.line,
                col: token.column,
                message: format!("unexpected token '{}'", token.text),
            }),
            (_, None) => Err(Error::ParseError("incomplete program".to_string())),
        }
    }
}

impl Default for ImpParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a token stream into a program
pub fn parse_program(tokens: &[Token]) -> Result<Statement> {
    ImpParser::new().parse(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse_with<T>(parser: BoxedParser<T>, source: &str) -> Option<T> {
        let tokens = lex(source).unwrap();
        parser
            .phrase()
            .parse(&tokens, 0)
            .map(|result| result.value)
    }

    fn parse_str(source: &str) -> Result<Statement> {
        let tokens = lex(source)?;
        parse_program(&tokens)
    }

    fn int(n: i64) -> Aexp {
        Aexp::Int(n)
    }

    #[test]
    fn test_aexp_precedence() {
        let exp = parse_with(aexp(), "2 + 3 * 4").unwrap();
        assert_eq!(
            exp,
            Aexp::binop(ArithOp::Add, int(2), Aexp::binop(ArithOp::Mul, int(3), int(4)))
        );
    }

    #[test]
    fn test_aexp_left_associative() {
        let exp = parse_with(aexp(), "10 - 3 - 2").unwrap();
        assert_eq!(
            exp,
            Aexp::binop(ArithOp::Sub, Aexp::binop(ArithOp::Sub, int(10), int(3)), int(2))
        );
    }

    #[test]
    fn test_aexp_group() {
        let exp = parse_with(aexp(), "(2 + 3) * 4").unwrap();
        assert_eq!(
            exp,
            Aexp::binop(ArithOp::Mul, Aexp::binop(ArithOp::Add, int(2), int(3)), int(4))
        );
        assert_eq!(parse_with(aexp(), "((((x))))"), Some(Aexp::var("x")));
        assert_eq!(parse_with(aexp(), "(1 + 2"), None);
    }

    #[test]
    fn test_aexp_value_overflow_does_not_parse() {
        assert_eq!(parse_with(aexp(), "9223372036854775807"), Some(int(i64::MAX)));
        assert_eq!(parse_with(aexp(), "9223372036854775808"), None);
    }

    #[test]
    fn test_bexp_relop() {
        let exp = parse_with(bexp(), "x + 1 <= 10").unwrap();
        assert_eq!(
            exp,
            Bexp::relop(
                RelOp::Le,
                Aexp::binop(ArithOp::Add, Aexp::var("x"), int(1)),
                int(10)
            )
        );
    }

    #[test]
    fn test_bexp_and_binds_tighter_than_or() {
        let a = Bexp::relop(RelOp::Lt, Aexp::var("a"), int(1));
        let b = Bexp::relop(RelOp::Gt, Aexp::var("b"), int(2));
        let c = Bexp::relop(RelOp::Eq, Aexp::var("c"), int(3));

        let exp = parse_with(bexp(), "a < 1 or b > 2 and c = 3").unwrap();
        assert_eq!(
            exp,
            Bexp::logic(
                LogicOp::Or,
                a.clone(),
                Bexp::logic(LogicOp::And, b.clone(), c.clone())
            )
        );

        let exp = parse_with(bexp(), "(a < 1 or b > 2) and c = 3").unwrap();
        assert_eq!(
            exp,
            Bexp::logic(LogicOp::And, Bexp::logic(LogicOp::Or, a, b), c)
        );
    }

    #[test]
    fn test_bexp_not_applies_to_term() {
        let exp = parse_with(bexp(), "not x != 0 and not not y >= 1").unwrap();
        assert_eq!(
            exp,
            Bexp::logic(
                LogicOp::And,
                Bexp::negate(Bexp::relop(RelOp::Ne, Aexp::var("x"), int(0))),
                Bexp::negate(Bexp::negate(Bexp::relop(RelOp::Ge, Aexp::var("y"), int(1))))
            )
        );
    }

    #[test]
    fn test_relop_with_parenthesized_operand() {
        let exp = parse_with(bexp(), "(x + 1) < 2").unwrap();
        assert_eq!(
            exp,
            Bexp::relop(
                RelOp::Lt,
                Aexp::binop(ArithOp::Add, Aexp::var("x"), int(1)),
                int(2)
            )
        );
    }

    #[test]
    fn test_statement_list_nests_left() {
        let program = parse_str("a := 1 ; b := 2 ; c := 3").unwrap();
        assert_eq!(
            program,
            Statement::compound(
                Statement::compound(Statement::assign("a", int(1)), Statement::assign("b", int(2))),
                Statement::assign("c", int(3))
            )
        );
    }

    #[test]
    fn test_if_without_else() {
        let program = parse_str("if x < 0 then x := 99 end").unwrap();
        assert_eq!(
            program,
            Statement::if_then(
                Bexp::relop(RelOp::Lt, Aexp::var("x"), int(0)),
                Statement::assign("x", int(99)),
                None
            )
        );
    }

    #[test]
    fn test_if_with_else_and_nested_lists() {
        let program =
            parse_str("if x = 1 then y := 1 ; z := 2 else if y > 0 then y := 0 end end").unwrap();
        let Statement::If {
            then_branch,
            else_branch,
            ..
        } = &program
        else {
            panic!("expected if statement");
        };
        assert!(matches!(**then_branch, Statement::Compound { .. }));
        assert!(matches!(else_branch.as_deref(), Some(Statement::If { .. })));
    }

    #[test]
    fn test_while() {
        let program = parse_str("while n > 0 do n := n - 1 end").unwrap();
        assert_eq!(
            program,
            Statement::while_do(
                Bexp::relop(RelOp::Gt, Aexp::var("n"), int(0)),
                Statement::assign("n", Aexp::binop(ArithOp::Sub, Aexp::var("n"), int(1)))
            )
        );
    }

    #[test]
    fn test_trailing_tokens_fail_the_phrase() {
        let tokens = lex("x := 1 ; y := 2 )").unwrap();
        assert!(program().parse(&tokens, 0).is_none());
        assert!(stmt_list().parse(&tokens, 0).is_some());

        let err = parse_program(&tokens).unwrap_err();
        assert_eq!(
            err,
            Error::SyntaxError {
                line: 1,
                col: 17,
                message: "unexpected token ')'".to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_separator_is_syntax_error() {
        let err = parse_str("x := 1 ;").unwrap_err();
        assert!(matches!(err, Error::SyntaxError { col: 8, .. }));
    }

    #[test]
    fn test_nothing_parsable() {
        assert!(matches!(parse_str("end"), Err(Error::ParseError(_))));
        assert!(matches!(parse_str("1 := x"), Err(Error::ParseError(_))));
        assert_eq!(parse_str("# nothing"), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        assert!(parse_str("do := 1").is_err());
        assert!(parse_str("done := 1").is_ok());
    }

    #[test]
    fn test_parser_is_reusable() {
        let parser = ImpParser::new();
        for source in ["x := 1", "while x < 2 do x := x + 1 end", "y := (x)"] {
            let tokens = lex(source).unwrap();
            assert!(parser.parse(&tokens).is_ok(), "{}", source);
        }
    }
}
