//! Tokenizer driven by an ordered table of anchored lexical rules.

use cardstock_source::{Position, Source, SyntaxError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Only ever produced internally; comments never reach the token stream.
    Comment,
    Inc,
    Dec,
    Let,
    Enum,
    Return,
    Lambda,
    Newline,
    False,
    True,
    Comma,
    Semicolon,
    Bang,
    Plus,
    Minus,
    Mult,
    Div,
    Num,
    Lt,
    Gt,
    Le,
    Ge,
    /// Both `==` and `!=`. The lexeme tells them apart.
    Eq,
    And,
    Or,
    #[serde(rename = "string")]
    Str,
    Func,
    While,
    For,
    If,
    Symbol,
    LBracket,
    RBracket,
    Assign,
    Period,
    /// Only generated by the parser when reading past the last token.
    Eof,
}

impl TokenKind {
    /// The canonical lowercase name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Inc => "inc",
            TokenKind::Dec => "dec",
            TokenKind::Let => "let",
            TokenKind::Enum => "enum",
            TokenKind::Return => "return",
            TokenKind::Lambda => "lambda",
            TokenKind::Newline => "newline",
            TokenKind::False => "false",
            TokenKind::True => "true",
            TokenKind::Comma => "comma",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Bang => "bang",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Mult => "mult",
            TokenKind::Div => "div",
            TokenKind::Num => "num",
            TokenKind::Lt => "lt",
            TokenKind::Gt => "gt",
            TokenKind::Le => "le",
            TokenKind::Ge => "ge",
            TokenKind::Eq => "eq",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Str => "string",
            TokenKind::Func => "func",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Symbol => "symbol",
            TokenKind::LBracket => "l_bracket",
            TokenKind::RBracket => "r_bracket",
            TokenKind::Assign => "assign",
            TokenKind::Period => "period",
            TokenKind::Eof => "eof",
        }
    }

    /// Returns `true` for the kinds that separate statements (`newline` and `;`).
    pub fn is_separator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a [`Token`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Number(n) => write!(f, "{}", n),
            TokenValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub line: usize,
    pub col: usize,
    /// Length of the lexeme in characters.
    #[serde(skip)]
    pub width: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, pos: Position, width: usize) -> Self {
        Self {
            kind,
            value,
            line: pos.line,
            col: pos.col,
            width,
        }
    }

    pub fn pos(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// The column right after the lexeme, on the same line.
    pub fn end(&self) -> Position {
        Position::new(self.line, self.col + self.width)
    }

    /// Kind and escaped value, for error messages (e.g. ``newline `\n` ``).
    pub fn describe(&self) -> String {
        format!("{} `{}`", self.kind, self.value.to_string().escape_debug())
    }

    /// The text payload, or `None` for numbers.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(s) => Some(s),
            TokenValue::Number(_) => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number(n) => Some(n),
            TokenValue::Text(_) => None,
        }
    }
}

/// A lexical rule: a token kind and the pattern recognizing it.
/// Every pattern is anchored at the start of the remaining input.
#[derive(Debug)]
pub struct Rule {
    pub kind: TokenKind,
    pub pattern: Regex,
}

/// The lexical rules, in priority order. The first rule that matches wins.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use TokenKind::*;

    let table: &[(TokenKind, &str)] = &[
        (Comment, r"^//[^\n]*"),
        (Comment, r"(?s)^/\*.*?\*/"),
        (Inc, r"^\+\+"),
        (Dec, r"^--"),
        (Let, r"^let\b"),
        (Enum, r"^enum\b"),
        (Return, r"^return\b"),
        (Lambda, r"^=>"),
        (Newline, r"^\n"),
        (False, r"^false\b"),
        (True, r"^true\b"),
        (Comma, r"^,"),
        (Semicolon, r"^;"),
        (Le, r"^<="),
        (Ge, r"^>="),
        (Eq, r"^=="),
        (Eq, r"^!="),
        (And, r"^&&"),
        (Or, r"^\|\|"),
        (Bang, r"^!"),
        (Plus, r"^\+"),
        (Minus, r"^-"),
        (Mult, r"^\*"),
        (Div, r"^/"),
        (Num, r"^[0-9]+\.?[0-9]*"),
        (Lt, r"^<"),
        (Gt, r"^>"),
        (Str, r#"^"(?:\\"|[^"\n])*""#),
        (Str, r#"^'(?:\\'|[^'\n])*'"#),
        (Func, r"^fn\b"),
        (While, r"^while\b"),
        (For, r"^for\b"),
        (If, r"^if\b"),
        (Symbol, r"^[A-Za-z_]+"),
        (LBracket, r"^\["),
        (RBracket, r"^\]"),
        (Assign, r"^="),
        (Period, r"^\."),
    ];

    table
        .iter()
        .map(|&(kind, pattern)| Rule {
            kind,
            pattern: Regex::new(pattern).expect("lexical rule pattern must be a valid regex"),
        })
        .collect()
});

/// Raised when no lexical rule matches the remaining input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("no rule matches at position {offset}: unexpected character {found:?}")]
pub struct LexError {
    /// Byte offset of the offending character.
    pub offset: usize,
    pub line: usize,
    pub col: usize,
    pub found: char,
}

impl LexError {
    pub fn pos(&self) -> Position {
        Position::new(self.line, self.col)
    }
}

impl From<&LexError> for SyntaxError {
    fn from(err: &LexError) -> Self {
        SyntaxError::new(format!("unexpected character {:?}", err.found), err.pos())
    }
}

/// Scan state for one tokenization run.
///
/// The tokenizer is an [`Iterator`] over `Result<Token, LexError>`; it stops
/// for good after yielding the first error.
pub struct Tokenizer<'a> {
    input: &'a str,
    /// Byte offset into `input`.
    cursor: usize,
    line: usize,
    col: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `source`, minus a single trailing line break.
    pub fn new(source: &Source<'a>) -> Self {
        Self {
            input: source.trimmed(),
            cursor: 0,
            line: 1,
            col: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn pos(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Moves the cursor past `lexeme`, keeping line and column in step.
    fn advance(&mut self, lexeme: &str) {
        for c in lexeme.chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.cursor += lexeme.len();
    }

    fn skip_spaces(&mut self) {
        let spaces = self.rest().len() - self.rest().trim_start_matches(' ').len();
        self.cursor += spaces;
        self.col += spaces;
    }

    fn error(&mut self) -> LexError {
        let err = LexError {
            offset: self.cursor,
            line: self.line,
            col: self.col,
            found: self.rest().chars().next().unwrap_or('\0'),
        };
        // nothing is produced after an error
        self.cursor = self.input.len();
        err
    }

    fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        loop {
            self.skip_spaces();
            let rest = self.rest();
            if rest.is_empty() {
                return None;
            }

            let matched = RULES
                .iter()
                .find_map(|rule| rule.pattern.find(rest).map(|m| (rule.kind, m.as_str())));
            let (kind, lexeme) = match matched {
                Some(matched) => matched,
                None => return Some(Err(self.error())),
            };

            let pos = self.pos();
            let offset = self.cursor;
            self.advance(lexeme);
            if kind == TokenKind::Comment {
                continue;
            }

            return match value(kind, lexeme) {
                Some(value) => Some(Ok(Token::new(kind, value, pos, lexeme.chars().count()))),
                None => {
                    self.cursor = self.input.len();
                    Some(Err(LexError {
                        offset,
                        line: pos.line,
                        col: pos.col,
                        found: lexeme.chars().next().unwrap_or('\0'),
                    }))
                }
            };
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Materializes the value of a matched lexeme.
fn value(kind: TokenKind, lexeme: &str) -> Option<TokenValue> {
    match kind {
        TokenKind::Num => lexeme.parse().ok().map(TokenValue::Number),
        TokenKind::Str => Some(TokenValue::Text(strip_quotes(lexeme).to_string())),
        _ => Some(TokenValue::Text(lexeme.to_string())),
    }
}

/// Strips the enclosing quotes of a string lexeme. Escapes are kept as written.
fn strip_quotes(lexeme: &str) -> &str {
    &lexeme[1..lexeme.len() - 1]
}

/// Tokenizes `input`, failing on the first character no rule matches.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(&Source::from(input)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn single(source: &str) -> Token {
        let mut tokens = tokenize(source).unwrap();
        assert_eq!(tokens.len(), 1, "expected a single token for {:?}", source);
        tokens.remove(0)
    }

    #[test]
    fn test_operators_one_token_per_lexeme() {
        let source = "++ -- => , ; <= >= == != && || ! + - * / < > [ ] = .";
        let expected = vec![
            TokenKind::Inc,
            TokenKind::Dec,
            TokenKind::Lambda,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::Eq,
            TokenKind::Eq,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Bang,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Mult,
            TokenKind::Div,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Assign,
            TokenKind::Period,
        ];
        assert_eq!(kinds(source), expected);

        let tokens = tokenize(source).unwrap();
        let lexemes: Vec<&str> = source.split(' ').collect();
        for (token, lexeme) in tokens.iter().zip(lexemes) {
            assert_eq!(token.text(), Some(lexeme));
            assert_eq!(token.line, 1);
        }
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("let enum return fn while for if true false"),
            vec![
                TokenKind::Let,
                TokenKind::Enum,
                TokenKind::Return,
                TokenKind::Func,
                TokenKind::While,
                TokenKind::For,
                TokenKind::If,
                TokenKind::True,
                TokenKind::False,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_symbol() {
        for source in &["fort", "letter", "iffy", "fnord", "trueish", "enums", "whiles", "returned"] {
            let token = single(source);
            assert_eq!(token.kind, TokenKind::Symbol);
            assert_eq!(token.text(), Some(*source));
        }
    }

    #[test]
    fn test_numbers() {
        let token = single("3.14");
        assert_eq!(token.kind, TokenKind::Num);
        assert_eq!(token.number(), Some(3.14));

        assert_eq!(single("42").number(), Some(42.0));
        assert_eq!(single("7.").number(), Some(7.0));
    }

    #[test]
    fn test_strings() {
        let token = single(r#""hi""#);
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.text(), Some("hi"));

        assert_eq!(single("'single'").text(), Some("single"));
        // an escaped quote does not end the string and is kept as written
        assert_eq!(single(r#""a\"b""#).text(), Some(r#"a\"b"#));
        assert_eq!(single(r#""say \"hi\"""#).text(), Some(r#"say \"hi\""#));
        assert_eq!(single(r#"'it\'s'"#).text(), Some(r"it\'s"));
        // the other quote is plain text
        assert_eq!(single(r#""it's""#).text(), Some("it's"));
        assert_eq!(single(r#""""#).text(), Some(""));
    }

    #[test]
    fn test_token_width() {
        let tokens = tokenize("let total = 12.50 + 'héllo'").unwrap();
        let widths: Vec<usize> = tokens.iter().map(|t| t.width).collect();
        assert_eq!(widths, vec![3, 5, 1, 5, 1, 7]);
        assert_eq!(tokens[3].end(), Position::new(1, 18));
        assert_eq!(tokens[5].end(), Position::new(1, 28));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("\"abc").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.found, '"');
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("let x = 1\nx = 22").unwrap();
        let positions: Vec<(TokenKind, usize, usize)> =
            tokens.iter().map(|t| (t.kind, t.line, t.col)).collect();
        assert_eq!(
            positions,
            vec![
                (TokenKind::Let, 1, 1),
                (TokenKind::Symbol, 1, 5),
                (TokenKind::Assign, 1, 7),
                (TokenKind::Num, 1, 9),
                (TokenKind::Newline, 1, 10),
                (TokenKind::Symbol, 2, 1),
                (TokenKind::Assign, 2, 3),
                (TokenKind::Num, 2, 5),
            ]
        );
    }

    #[test]
    fn test_line_numbers_never_decrease() {
        let tokens = tokenize("a\nb ; c\n\n/* x\ny */ d\n// e\nf").unwrap();
        assert!(tokens.windows(2).all(|w| w[0].line <= w[1].line));
    }

    #[test]
    fn test_comments_are_discarded() {
        assert_eq!(
            kinds("a // trailing\nb"),
            vec![TokenKind::Symbol, TokenKind::Newline, TokenKind::Symbol]
        );
        assert_eq!(kinds("/* a */ x /* b */"), vec![TokenKind::Symbol]);
        assert_eq!(kinds("// only a comment"), vec![]);
    }

    #[test]
    fn test_block_comment_tracks_lines() {
        let tokens = tokenize("/* one\ntwo\nthree */ x").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].line, 3);
        assert_eq!(tokens[0].col, 10);
    }

    #[test]
    fn test_single_trailing_newline_is_stripped() {
        assert_eq!(kinds("x\n"), vec![TokenKind::Symbol]);
        assert_eq!(kinds("x\r\n"), vec![TokenKind::Symbol]);
        assert_eq!(
            kinds("x\n\n"),
            vec![TokenKind::Symbol, TokenKind::Newline]
        );
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("@").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.found, '@');
        assert_eq!((err.line, err.col), (1, 1));

        let err = tokenize("let x =\n  1 # 2").unwrap_err();
        assert_eq!(err.offset, 12);
        assert_eq!((err.line, err.col), (2, 5));
    }

    #[test]
    fn test_tabs_are_not_skipped() {
        assert_eq!(tokenize("\tx").unwrap_err().found, '\t');
    }

    #[test]
    fn test_rule_priority() {
        let first_match = |input: &str| {
            RULES
                .iter()
                .find(|rule| rule.pattern.is_match(input))
                .map(|rule| rule.kind)
        };
        assert_eq!(first_match("<= 1"), Some(TokenKind::Le));
        assert_eq!(first_match("=> x"), Some(TokenKind::Lambda));
        assert_eq!(first_match("== x"), Some(TokenKind::Eq));
        assert_eq!(first_match("!= x"), Some(TokenKind::Eq));
        assert_eq!(first_match("// x"), Some(TokenKind::Comment));
        assert_eq!(first_match("/ x"), Some(TokenKind::Div));
        assert_eq!(first_match("for x"), Some(TokenKind::For));
        assert_eq!(first_match("x for"), Some(TokenKind::Symbol));
        assert!(RULES.iter().all(|rule| rule.pattern.as_str().contains('^')));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::LBracket.to_string(), "l_bracket");
        assert_eq!(TokenKind::Str.name(), "string");
        assert_eq!(TokenKind::Func.name(), "func");
        assert_eq!(TokenKind::Eof.name(), "eof");
    }
}
