//! Source code representation and diagnostic rendering.

use console::style;
use std::fmt;

/// Represents source code.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    /// Display name (usually a file path).
    pub name: &'a str,
    /// Original source code.
    pub content: &'a str,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `name` and `content`.
    pub fn new(name: &'a str, content: &'a str) -> Self {
        Self { name, content }
    }

    /// Returns the content with a single trailing line break (`\n` or `\r\n`) removed.
    pub fn trimmed(&self) -> &'a str {
        let content = self.content;
        match content.strip_suffix('\n') {
            Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
            None => content,
        }
    }

    /// Returns the text of the 1-based line `line`, without its line break.
    pub fn line(&self, line: usize) -> Option<&'a str> {
        if line == 0 {
            return None;
        }
        self.content
            .split('\n')
            .nth(line - 1)
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new("<input>", content)
    }
}

/// A 1-based line and column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Represents a syntax error (lexing or parsing), ready to be reported.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub pos: Position,
}

impl SyntaxError {
    /// Create a new syntax error with the specified `message` and `pos`.
    pub fn new(message: impl ToString, pos: Position) -> Self {
        Self {
            message: message.to_string(),
            pos,
        }
    }
}

/// A [`SyntaxError`] paired with the [`Source`] it was raised on.
///
/// The `Display` implementation renders the error header, the location, the
/// offending line and a caret under the reported column.
pub struct Report<'a> {
    pub source: &'a Source<'a>,
    pub error: &'a SyntaxError,
}

impl<'a> Report<'a> {
    pub fn new(source: &'a Source<'a>, error: &'a SyntaxError) -> Self {
        Self { source, error }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Position { line, col } = self.error.pos;
        writeln!(
            f,
            "{}: {}",
            style("error").red().bold(),
            style(&self.error.message).bold()
        )?;
        writeln!(
            f,
            " {} {}:{}",
            style("-->").blue().bold(),
            self.source.name,
            self.error.pos
        )?;

        if let Some(text) = self.source.line(line) {
            let gutter = line.to_string();
            let pad = " ".repeat(gutter.len());
            writeln!(f, "{} {}", pad, style("|").blue().bold())?;
            writeln!(f, "{} {} {}", style(&gutter).blue().bold(), style("|").blue().bold(), text)?;
            writeln!(
                f,
                "{} {} {}{}",
                pad,
                style("|").blue().bold(),
                " ".repeat(col.saturating_sub(1)),
                style("^").red().bold()
            )?;
        }

        Ok(())
    }
}
