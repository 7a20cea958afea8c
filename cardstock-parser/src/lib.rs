//! Tokenizer, parser and AST for the cardstock scripting language.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod visitor;

use crate::ast::Program;
use crate::lexer::{tokenize, LexError};
use crate::parser::{parse, ParseError};
use cardstock_source::SyntaxError;
use thiserror::Error;

/// Either stage failing on some input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<&Error> for SyntaxError {
    fn from(err: &Error) -> Self {
        match err {
            Error::Lex(err) => err.into(),
            Error::Parse(err) => err.into(),
        }
    }
}

/// Tokenizes and parses `input` in one go.
pub fn parse_source(input: &str) -> Result<Program, Error> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens)?)
}
