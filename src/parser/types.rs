//! Type expression parsing

use crate::ast::{Location, TypeExpr, TypeExprKind};
use crate::lexer::Token;

use super::combinators::Combinators;
use super::cursor::TokenCursor;
use super::error::ParseResult;
use super::record::RecordParser;

/// Extension trait for type expression parsing
pub trait TypeParser {
    /// Parse a type expression (unions included)
    fn parse_type_expr(&mut self) -> ParseResult<TypeExpr>;

    /// Parse a union: A | B | C
    fn parse_union_type(&mut self) -> ParseResult<TypeExpr>;

    /// Parse a function type (right-associative): A -> B -> C, (A, B) -> C
    fn parse_function_type(&mut self) -> ParseResult<TypeExpr>;

    /// Parse a named type, type application or record type
    fn parse_primary_type(&mut self) -> ParseResult<TypeExpr>;

    /// Parse generic arguments: <A, B>, accepting a `>>` or `>=` closer
    fn parse_generic_args(&mut self) -> ParseResult<Vec<TypeExpr>>;
}

impl TypeParser for TokenCursor {
    fn parse_type_expr(&mut self) -> ParseResult<TypeExpr> {
        self.nested(|c| c.parse_union_type())
    }

    fn parse_union_type(&mut self) -> ParseResult<TypeExpr> {
        let loc = self.current_loc();
        let first = self.parse_function_type()?;

        let mut types = vec![first];
        while self.check(&Token::Pipe) && self.is_type_start_at(1) {
            self.advance();
            types.push(self.parse_function_type()?);
        }

        if types.len() == 1 {
            Ok(types.remove(0))
        } else {
            Ok(TypeExpr::new(TypeExprKind::Union { types }, loc))
        }
    }

    fn parse_function_type(&mut self) -> ParseResult<TypeExpr> {
        let loc = self.current_loc();

        let params = if self.check(&Token::LParen) {
            let group =
                self.delimited_list(Token::LParen, Token::RParen, |c| c.parse_type_expr(), &Token::Comma)?;
            if !self.check(&Token::Arrow) {
                return Ok(group_type(group, loc));
            }
            group
        } else {
            let single = self.parse_primary_type()?;
            if !self.check(&Token::Arrow) {
                return Ok(single);
            }
            vec![single]
        };

        self.consume(Token::Arrow)?;
        let return_type = self.nested(|c| c.parse_function_type())?;
        Ok(TypeExpr::new(
            TypeExprKind::Function {
                params,
                return_type: Box::new(return_type),
            },
            loc,
        ))
    }

    fn parse_primary_type(&mut self) -> ParseResult<TypeExpr> {
        let loc = self.current_loc();

        let base = match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                TypeExpr::new(TypeExprKind::Var(name), loc.clone())
            }
            Token::UpperIdent(name) => {
                self.advance();
                TypeExpr::new(TypeExprKind::Const(name), loc.clone())
            }
            Token::LBrace => {
                let fields = self.parse_record_type_fields()?;
                return Ok(TypeExpr::new(TypeExprKind::Record { fields }, loc));
            }
            _ => return Err(self.unexpected("type")),
        };

        let args = match self.peek() {
            Token::Lt => self.parse_generic_args()?,
            Token::LParen => self.delimited_list(
                Token::LParen,
                Token::RParen,
                |c| c.parse_type_expr(),
                &Token::Comma,
            )?,
            _ => return Ok(base),
        };

        Ok(TypeExpr::new(
            TypeExprKind::App {
                constructor: Box::new(base),
                args,
            },
            loc,
        ))
    }

    fn parse_generic_args(&mut self) -> ParseResult<Vec<TypeExpr>> {
        let opened_at = self.current_loc();
        self.consume(Token::Lt)?;
        let args = self.separated_list(|c| c.parse_type_expr(), &Token::Comma, true, &Token::Gt)?;
        self.split_closing_angle();
        self.expect_closing(Token::Lt, &opened_at)?;
        Ok(args)
    }
}

/// A parenthesized type list not followed by `->`
fn group_type(mut group: Vec<TypeExpr>, loc: Location) -> TypeExpr {
    match group.len() {
        0 => TypeExpr::new(TypeExprKind::Const("Unit".to_string()), loc),
        1 => group.remove(0),
        _ => TypeExpr::new(TypeExprKind::Tuple { elements: group }, loc),
    }
}
