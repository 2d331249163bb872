//! Record field parsing shared by record types and record patterns
//!
//! Record literals and updates carry expressions and live with the expression
//! grammar; both field lists here accept a trailing comma.

use crate::ast::{Pattern, PatternKind, RecordPatternField, RecordTypeField};
use crate::lexer::Token;

use super::combinators::Combinators;
use super::cursor::TokenCursor;
use super::error::ParseResult;
use super::pattern::PatternParser;
use super::types::TypeParser;

/// Extension trait for record field parsing
pub trait RecordParser {
    /// Parse record type fields: { field1: Type1, field2: Type2, ... }
    fn parse_record_type_fields(&mut self) -> ParseResult<Vec<RecordTypeField>>;

    /// Parse record pattern fields: { field1, field2: pat, ... }
    fn parse_record_pattern_fields(&mut self) -> ParseResult<Vec<RecordPatternField>>;
}

impl RecordParser for TokenCursor {
    fn parse_record_type_fields(&mut self) -> ParseResult<Vec<RecordTypeField>> {
        self.delimited_list(
            Token::LBrace,
            Token::RBrace,
            |c| {
                let loc = c.current_loc();
                let name = c.expect_ident()?;
                c.consume(Token::Colon)?;
                let type_expr = c.parse_type_expr()?;
                Ok(RecordTypeField {
                    name,
                    type_expr,
                    loc,
                })
            },
            &Token::Comma,
        )
    }

    fn parse_record_pattern_fields(&mut self) -> ParseResult<Vec<RecordPatternField>> {
        self.delimited_list(
            Token::LBrace,
            Token::RBrace,
            |c| {
                let loc = c.current_loc();
                let name = c.expect_ident()?;
                let pattern = if c.match_token(&Token::Colon) {
                    c.parse_pattern()?
                } else {
                    // Shorthand: `{ x }` binds `x`
                    Pattern::new(PatternKind::Var(name.clone()), loc.clone())
                };
                Ok(RecordPatternField { name, pattern, loc })
            },
            &Token::Comma,
        )
    }
}
