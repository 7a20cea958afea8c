//! Command line front end: reads a source file and prints its tokens or AST.

pub mod stats;

use cardstock_parser::ast::Program;
use cardstock_parser::lexer::{Token, Tokenizer};
use cardstock_parser::parser::parse;
use cardstock_parser::pretty::Tree;
use cardstock_source::{Report, Source, SyntaxError};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::stats::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Emit {
    /// The parsed program
    Ast,
    /// The token stream
    Tokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Json,
    Tree,
    Debug,
}

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
pub struct Args {
    /// Source file to parse
    pub file: PathBuf,

    /// What to print
    #[clap(short, long, value_enum, default_value = "ast")]
    pub emit: Emit,

    /// How to print it
    #[clap(short, long, value_enum, default_value = "json")]
    pub format: Format,

    /// Report token and node counts on stderr
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A rendered syntax error report.
    #[error("{0}")]
    Syntax(String),

    #[error("could not serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn syntax(source: &Source<'_>, error: impl Into<SyntaxError>) -> Self {
        CliError::Syntax(Report::new(source, &error.into()).to_string())
    }
}

/// Renders the tokens or AST of `source` as requested by `emit` and `format`.
pub fn render(source: &Source<'_>, emit: Emit, format: Format, verbose: bool) -> Result<String, CliError> {
    let tokens: Vec<Token> = Tokenizer::new(source)
        .collect::<Result<_, _>>()
        .map_err(|err| CliError::syntax(source, &err))?;
    if verbose {
        eprintln!("{}: {} tokens", source.name, tokens.len());
    }

    if emit == Emit::Tokens {
        return render_tokens(&tokens, format);
    }

    let program = parse(&tokens).map_err(|err| CliError::syntax(source, &err))?;
    if verbose {
        let stats = Stats::collect(&program);
        eprintln!(
            "{}: {} statements, {} nodes, depth {}",
            source.name, stats.statements, stats.nodes, stats.depth
        );
    }
    render_program(&program, format)
}

fn render_tokens(tokens: &[Token], format: Format) -> Result<String, CliError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(tokens)?,
        Format::Debug => format!("{:#?}", tokens),
        Format::Tree => tokens
            .iter()
            .map(|token| format!("{}:{} {} {:?}", token.line, token.col, token.kind, token.value.to_string()))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn render_program(program: &Program, format: Format) -> Result<String, CliError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(program)?,
        Format::Debug => format!("{:#?}", program),
        Format::Tree => Tree(program).to_string().trim_end().to_string(),
    })
}

/// Reads the file named by `args` and renders it.
pub fn run(args: &Args) -> Result<String, CliError> {
    let content = fs::read_to_string(&args.file).map_err(|source| CliError::Io {
        path: args.file.clone(),
        source,
    })?;
    let name = args.file.display().to_string();
    let source = Source::new(&name, &content);
    render(&source, args.emit, args.format, args.verbose)
}
