use super::rules::{rules, LexRule};
use super::token::Token;
use crate::error::{Error, Result};

/// Table-driven scanner for Imp source text
pub struct Scanner<'a> {
    /// Source code being scanned
    source: &'a str,
    /// Rules tried in order at each position
    rules: &'static [LexRule],
    /// Current byte offset in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner over source code
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            rules: rules(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    ///
    /// Skipped text (whitespace, comments) produces no token. Scanning stops
    /// at the first character no rule accepts.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let rest = &self.source[self.current..];
            let matched = self
                .rules
                .iter()
                .find_map(|rule| rule.match_len(rest).map(|len| (rule, len)));

            let Some((rule, len)) = matched else {
                return Err(Error::LexError {
                    character: rest.chars().next().unwrap_or('\0'),
                    line: self.line,
                    column: self.column,
                });
            };

            let text = &rest[..len];
            if let Some(tag) = rule.tag {
                tokens.push(Token::new(text, tag, self.line, self.column));
            }
            self.advance(text);
        }

        tracing::debug!("scanned {} tokens", tokens.len());
        Ok(tokens)
    }

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.current += text.len();
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

/// Scans `source` into tokens with the Imp rule table
pub fn lex(source: &str) -> Result<Vec<Token>> {
    Scanner::new(source).scan_tokens()
}
