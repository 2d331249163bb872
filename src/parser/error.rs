//! Parser error types with source location and remediation hints

use crate::ast::Location;
use crate::lexer::Token;
use thiserror::Error;

/// Parser error types with source location information.
///
/// Every variant anchors at the token the parser was looking at when it gave
/// up, not at the start of the enclosing production.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The current token fits no alternative of the production
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        loc: Location,
    },

    /// A required token is missing
    #[error("expected {expected}, found {found}")]
    MissingToken {
        expected: Token,
        found: Token,
        loc: Location,
    },

    /// Syntactically recognizable but rejected construct
    #[error("{message}")]
    InvalidSyntax {
        message: String,
        hint: Option<String>,
        loc: Location,
    },

    /// A delimiter was opened but never closed
    #[error("unclosed {delimiter} opened at {opened_at}, found {found}")]
    Unclosed {
        delimiter: Token,
        opened_at: Location,
        found: Token,
        loc: Location,
    },

    #[error("expression nested too deeply (limit is {limit} levels)")]
    NestingTooDeep { limit: usize, loc: Location },

    /// A parser invariant was broken; never caused by user input
    #[error("internal parser error: {message}")]
    Internal { message: String, loc: Location },
}

impl ParseError {
    /// Get the location associated with this error
    pub fn loc(&self) -> &Location {
        match self {
            ParseError::UnexpectedToken { loc, .. } => loc,
            ParseError::MissingToken { loc, .. } => loc,
            ParseError::InvalidSyntax { loc, .. } => loc,
            ParseError::Unclosed { loc, .. } => loc,
            ParseError::NestingTooDeep { loc, .. } => loc,
            ParseError::Internal { loc, .. } => loc,
        }
    }

    /// Remediation hint, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            ParseError::InvalidSyntax { hint, .. } => hint.as_deref(),
            ParseError::Unclosed { delimiter, .. } => Some(match delimiter {
                Token::LParen => "add the missing `)`",
                Token::LBracket => "add the missing `]`",
                Token::Lt => "add the missing `>`",
                _ => "add the missing `}`",
            }),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create an UnexpectedToken error
    pub fn unexpected(expected: impl Into<String>, found: Token, loc: Location) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found,
            loc,
        }
    }

    /// Create an InvalidSyntax error without a hint
    pub fn invalid(message: impl Into<String>, loc: Location) -> Self {
        ParseError::InvalidSyntax {
            message: message.into(),
            hint: None,
            loc,
        }
    }

    /// Create an InvalidSyntax error carrying a remediation hint
    pub fn invalid_with_hint(
        message: impl Into<String>,
        hint: impl Into<String>,
        loc: Location,
    ) -> Self {
        ParseError::InvalidSyntax {
            message: message.into(),
            hint: Some(hint.into()),
            loc,
        }
    }

    pub fn internal(message: impl Into<String>, loc: Location) -> Self {
        ParseError::Internal {
            message: message.into(),
            loc,
        }
    }

    /// Attach a hint to an InvalidSyntax error; other kinds are returned unchanged
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            ParseError::InvalidSyntax { message, loc, .. } => ParseError::InvalidSyntax {
                message,
                hint: Some(hint.into()),
                loc,
            },
            other => other,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_message() {
        let err = ParseError::MissingToken {
            expected: Token::RParen,
            found: Token::Semicolon,
            loc: Location::default(),
        };
        assert_eq!(err.to_string(), "expected `)`, found `;`");
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_hint_only_on_invalid_syntax() {
        let loc = Location::default();
        let err = ParseError::invalid_with_hint("bad", "do this instead", loc.clone());
        assert_eq!(err.hint(), Some("do this instead"));

        let unexpected = ParseError::unexpected("pattern", Token::Comma, loc).with_hint("ignored");
        assert!(unexpected.hint().is_none());
    }

    #[test]
    fn test_unclosed_hint_names_delimiter() {
        let err = ParseError::Unclosed {
            delimiter: Token::LBracket,
            opened_at: Location::default(),
            found: Token::Eof,
            loc: Location::default(),
        };
        assert_eq!(err.hint(), Some("add the missing `]`"));
        assert!(err.message().contains("unclosed `[`"));
    }
}
