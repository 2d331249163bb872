//! Schist - parser for a small expression-oriented functional language

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod test_support;

use thiserror::Error;

pub use ast::{Declaration, Expr, Location, Module, Pattern, TypeExpr};
pub use errors::{
    find_similar, format_header, format_location, format_snippet, levenshtein_distance,
    render_lex_error, render_parse_error, Colors, ErrorConfig, Style,
};
pub use lexer::{LexError, Lexer, SpannedToken, Token};
pub use parser::{ParseError, ParseResult, Parser, ParserConfig};

/// Any error produced on the way from source text to a module
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SourceError {
    pub fn loc(&self) -> &Location {
        match self {
            SourceError::Lex(err) => err.loc(),
            SourceError::Parse(err) => err.loc(),
        }
    }

    /// Render against the source text for display to a user
    pub fn render(&self, source: &str, config: &ErrorConfig) -> String {
        match self {
            SourceError::Lex(err) => render_lex_error(err, source, config),
            SourceError::Parse(err) => render_parse_error(err, source, config),
        }
    }
}

/// Parse a token stream into a module
pub fn parse(tokens: Vec<SpannedToken>) -> ParseResult<Module> {
    Parser::new(tokens).parse_module()
}

/// Lex and parse source text
pub fn parse_source(source: &str, filename: &str) -> Result<Module, SourceError> {
    let tokens = Lexer::new(source, filename).tokenize()?;
    Ok(parse(tokens)?)
}
