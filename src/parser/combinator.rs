//! Grammar-agnostic parser combinators over a token slice.
//!
//! A parser is anything implementing [`Parser`]: given the token slice and a
//! start position it either produces a [`ParseResult`] (the value and the
//! position just past what it consumed) or `None`. Failure is a plain value;
//! nothing here panics or returns an error, and a failed parser leaves the
//! caller free to retry another alternative at the same position.

use crate::lexer::{Tag, Token};
use std::cell::OnceCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Successful parse: a value and the position of the next unconsumed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<T> {
    /// Value produced by the parser
    pub value: T,
    /// Index of the first token not consumed
    pub pos: usize,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result
    pub fn new(value: T, pos: usize) -> Self {
        ParseResult { value, pos }
    }
}

impl<T: fmt::Display> fmt::Display for ParseResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Result({}, {})", self.value, self.pos)
    }
}

/// Type-erased, shareable parser
pub type BoxedParser<T> = Rc<dyn Parser<Output = T>>;

/// A parser over Imp tokens
///
/// The provided methods build combinators from `self`; they are the named
/// equivalents of sequencing, alternation, repetition and mapping.
pub trait Parser {
    /// Value produced on success
    type Output;

    /// Runs the parser at `pos`
    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>>;

    /// Runs `self` then `right`, pairing their values
    fn then<R>(self, right: R) -> Concat<Self, R>
    where
        Self: Sized,
        R: Parser,
    {
        Concat { left: self, right }
    }

    /// Tries `self`, falling back to `right` at the same position
    fn or<R>(self, right: R) -> Alternate<Self, R>
    where
        Self: Sized,
        R: Parser<Output = Self::Output>,
    {
        Alternate { left: self, right }
    }

    /// Succeeds with `None` instead of failing
    fn opt(self) -> Opt<Self>
    where
        Self: Sized,
    {
        Opt { parser: self }
    }

    /// Zero or more repetitions
    fn rep(self) -> Rep<Self>
    where
        Self: Sized,
    {
        Rep { parser: self }
    }

    /// Transforms the value of a successful parse
    fn map<U, F>(self, function: F) -> Process<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Process {
            parser: self,
            function,
        }
    }

    /// Transforms the value, turning `None` into a failure
    fn filter_map<U, F>(self, function: F) -> FilterMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Option<U>,
    {
        FilterMap {
            parser: self,
            function,
        }
    }

    /// One or more `self` separated by `separator`, folded left to right
    ///
    /// The separator's value is the function combining the running value
    /// with the next one.
    fn chain_left<S>(self, separator: S) -> Exp<Self, S>
    where
        Self: Sized,
        S: Parser,
        S::Output: FnOnce(Self::Output, Self::Output) -> Self::Output,
    {
        Exp {
            parser: self,
            separator,
        }
    }

    /// Requires the whole token stream to be consumed
    fn phrase(self) -> Phrase<Self>
    where
        Self: Sized,
    {
        Phrase { parser: self }
    }

    /// Erases the concrete combinator type
    fn boxed(self) -> BoxedParser<Self::Output>
    where
        Self: Sized + 'static,
    {
        Rc::new(self)
    }
}

impl<P: Parser + ?Sized> Parser for Rc<P> {
    type Output = P::Output;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>> {
        (**self).parse(tokens, pos)
    }
}

// ============================================================================
// Primitives
// ============================================================================

/// Matches one token with exactly this text and tag
#[derive(Debug, Clone)]
pub struct Reserved {
    text: String,
    tag: Tag,
}

impl Parser for Reserved {
    type Output = String;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<String>> {
        let token = tokens.get(pos)?;
        if token.text == self.text && token.tag == self.tag {
            Some(ParseResult::new(token.text.clone(), pos + 1))
        } else {
            None
        }
    }
}

/// Matches one token with this tag, whatever its text
#[derive(Debug, Clone)]
pub struct TagParser {
    tag: Tag,
}

impl Parser for TagParser {
    type Output = String;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<String>> {
        let token = tokens.get(pos)?;
        if token.tag == self.tag {
            Some(ParseResult::new(token.text.clone(), pos + 1))
        } else {
            None
        }
    }
}

/// Never succeeds
pub struct Fail<T> {
    _output: PhantomData<fn() -> T>,
}

impl<T> Parser for Fail<T> {
    type Output = T;

    fn parse(&self, _tokens: &[Token], _pos: usize) -> Option<ParseResult<T>> {
        None
    }
}

/// Parser for one token with exact `text` and `tag`
pub fn reserved(text: impl Into<String>, tag: Tag) -> Reserved {
    Reserved {
        text: text.into(),
        tag,
    }
}

/// Parser for one token with the given tag
pub fn tag(tag: Tag) -> TagParser {
    TagParser { tag }
}

/// Parser that always fails
pub fn fail<T>() -> Fail<T> {
    Fail {
        _output: PhantomData,
    }
}

/// Defers building a parser until its first use
///
/// Needed wherever the grammar refers to itself, otherwise constructing the
/// grammar would recurse forever.
pub fn lazy<P, F>(thunk: F) -> Lazy<P, F>
where
    P: Parser,
    F: Fn() -> P,
{
    Lazy {
        thunk,
        parser: OnceCell::new(),
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Sequence: `left` then `right`
pub struct Concat<L, R> {
    left: L,
    right: R,
}

impl<L: Parser, R: Parser> Parser for Concat<L, R> {
    type Output = (L::Output, R::Output);

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>> {
        let left = self.left.parse(tokens, pos)?;
        let right = self.right.parse(tokens, left.pos)?;
        Some(ParseResult::new((left.value, right.value), right.pos))
    }
}

/// First successful alternative
pub struct Alternate<L, R> {
    left: L,
    right: R,
}

impl<L, R> Parser for Alternate<L, R>
where
    L: Parser,
    R: Parser<Output = L::Output>,
{
    type Output = L::Output;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>> {
        self.left
            .parse(tokens, pos)
            .or_else(|| self.right.parse(tokens, pos))
    }
}

/// Optional: never fails
pub struct Opt<P> {
    parser: P,
}

impl<P: Parser> Parser for Opt<P> {
    type Output = Option<P::Output>;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>> {
        Some(match self.parser.parse(tokens, pos) {
            Some(result) => ParseResult::new(Some(result.value), result.pos),
            None => ParseResult::new(None, pos),
        })
    }
}

/// Zero or more repetitions, collected in order
///
/// Never fails. The wrapped parser must fail eventually: repeating a parser
/// that succeeds without consuming input (such as an [`Opt`]) loops forever.
pub struct Rep<P> {
    parser: P,
}

impl<P: Parser> Parser for Rep<P> {
    type Output = Vec<P::Output>;

    fn parse(&self, tokens: &[Token], mut pos: usize) -> Option<ParseResult<Self::Output>> {
        let mut values = Vec::new();
        while let Some(result) = self.parser.parse(tokens, pos) {
            values.push(result.value);
            pos = result.pos;
        }
        Some(ParseResult::new(values, pos))
    }
}

/// Applies a function to the parsed value
pub struct Process<P, F> {
    parser: P,
    function: F,
}

impl<P, F, U> Parser for Process<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<U>> {
        let result = self.parser.parse(tokens, pos)?;
        Some(ParseResult::new((self.function)(result.value), result.pos))
    }
}

/// Applies a partial function to the parsed value
pub struct FilterMap<P, F> {
    parser: P,
    function: F,
}

impl<P, F, U> Parser for FilterMap<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> Option<U>,
{
    type Output = U;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<U>> {
        let result = self.parser.parse(tokens, pos)?;
        let value = (self.function)(result.value)?;
        Some(ParseResult::new(value, result.pos))
    }
}

/// Builds its parser on first use and keeps it
pub struct Lazy<P, F> {
    thunk: F,
    parser: OnceCell<P>,
}

impl<P, F> Parser for Lazy<P, F>
where
    P: Parser,
    F: Fn() -> P,
{
    type Output = P::Output;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>> {
        self.parser
            .get_or_init(|| (self.thunk)())
            .parse(tokens, pos)
    }
}

/// Succeeds only when every token has been consumed
pub struct Phrase<P> {
    parser: P,
}

impl<P: Parser> Parser for Phrase<P> {
    type Output = P::Output;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>> {
        self.parser
            .parse(tokens, pos)
            .filter(|result| result.pos == tokens.len())
    }
}

/// Left-associative list of `parser` joined by `separator`
pub struct Exp<P, S> {
    parser: P,
    separator: S,
}

impl<P, S> Parser for Exp<P, S>
where
    P: Parser,
    S: Parser,
    S::Output: FnOnce(P::Output, P::Output) -> P::Output,
{
    type Output = P::Output;

    fn parse(&self, tokens: &[Token], pos: usize) -> Option<ParseResult<Self::Output>> {
        let mut result = self.parser.parse(tokens, pos)?;

        // A separator with nothing after it is left unconsumed.
        while let Some(separator) = self.separator.parse(tokens, result.pos) {
            let Some(right) = self.parser.parse(tokens, separator.pos) else {
                break;
            };
            let combine = separator.value;
            result = ParseResult::new(combine(result.value, right.value), right.pos);
        }

        Some(result)
    }
}
