use crate::ast::{Node, Program};
use crate::lexer::{Token, TokenKind, TokenValue};
use cardstock_source::{Position, SyntaxError};
use thiserror::Error;

mod expr;
mod stmt;

/// Raised on the first token that does not fit the grammar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected} at {}:{}, got {}", .found.line, .found.col, .found.describe())]
    UnexpectedToken { expected: TokenKind, found: Token },
    #[error("expected expression at {}:{}, got {}", .found.line, .found.col, .found.describe())]
    ExpectedExpression { found: Token },
}

impl ParseError {
    /// The token the parser stopped at.
    pub fn found(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken { found, .. } => found,
            ParseError::ExpectedExpression { found } => found,
        }
    }
}

impl From<&ParseError> for SyntaxError {
    fn from(err: &ParseError) -> Self {
        let found = err.found();
        let message = match err {
            ParseError::UnexpectedToken { expected, .. } => {
                format!("expected {}, got {}", expected, found.describe())
            }
            ParseError::ExpectedExpression { .. } => {
                format!("expected expression, got {}", found.describe())
            }
        };
        SyntaxError::new(message, found.pos())
    }
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    /// Index of the current token. Only ever moves forward.
    cursor: usize,
    /// Returned by [`Self::current`] and [`Self::peek`] past the last token.
    eof: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let pos = match tokens.last() {
            Some(last) => last.end(),
            None => Position::new(1, 1),
        };
        Self {
            tokens,
            cursor: 0,
            eof: Token::new(TokenKind::Eof, TokenValue::Text("end".to_string()), pos, 0),
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses a whole program. All tokens must be consumed.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let statements = self.parse_statement_list()?;
        self.expect(TokenKind::Eof)?;
        Ok(Program { statements })
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    pub fn current(&self) -> &Token {
        self.tokens.get(self.cursor).unwrap_or(&self.eof)
    }

    pub fn peek(&self) -> &Token {
        self.tokens.get(self.cursor + 1).unwrap_or(&self.eof)
    }

    pub fn advance(&mut self) {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Predicate that tests whether the current token is of kind `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Eats and returns the current token if it is of kind `kind`.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            let token = self.current().clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(kind))
        }
    }

    /// Eats a `symbol` token and returns its name.
    fn expect_symbol(&mut self) -> Result<String, ParseError> {
        self.expect(TokenKind::Symbol).map(|token| token.value.to_string())
    }

    fn unexpected(&self, expected: TokenKind) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current().clone(),
        }
    }

    fn expected_expression(&self) -> ParseError {
        ParseError::ExpectedExpression {
            found: self.current().clone(),
        }
    }

    /// Runs a production that may not start here, failing if it did not.
    fn required(
        &mut self,
        production: fn(&mut Self) -> Result<Option<Node>, ParseError>,
    ) -> Result<Node, ParseError> {
        match production(self)? {
            Some(node) => Ok(node),
            None => Err(self.expected_expression()),
        }
    }
}

/// Parses a token sequence into a [`Program`].
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}
