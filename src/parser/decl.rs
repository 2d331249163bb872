//! Declaration parsing
//!
//! Each function here parses one declaration up to, but not including, its
//! terminating `;`, which the module driver consumes.

use crate::ast::*;
use crate::lexer::Token;

use super::combinators::Combinators;
use super::error::{ParseError, ParseResult};
use super::record::RecordParser;
use super::types::TypeParser;
use super::Parser;

impl Parser {
    /// `let [mut] [rec] pattern [: T] = expr (and [mut] pattern [: T] = expr)*`
    pub(crate) fn parse_let_decl(&mut self, exported: bool) -> ParseResult<Declaration> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::Let)?;
        let mutable = self.cursor.match_token(&Token::Mut);
        let recursive = self.cursor.match_token(&Token::Rec);

        let binding_loc = self.cursor.current_loc();
        let pattern = self.parse_binding_pattern()?;
        self.cursor.consume(Token::Eq)?;
        let value = self.parse_expr()?;

        if !self.cursor.check(&Token::And) {
            return Ok(Declaration::new(
                DeclKind::Let {
                    pattern,
                    value,
                    mutable,
                    recursive,
                    exported,
                },
                loc,
            ));
        }

        if !recursive {
            return Err(ParseError::invalid_with_hint(
                "`and` can only join the bindings of a recursive group",
                "use `let rec ... and ...` for mutually recursive bindings",
                self.cursor.current_loc(),
            ));
        }

        let mut bindings = vec![LetBinding {
            pattern,
            value,
            mutable,
            loc: binding_loc,
        }];
        while self.cursor.match_token(&Token::And) {
            let loc = self.cursor.current_loc();
            let mutable = self.cursor.match_token(&Token::Mut);
            let pattern = self.parse_binding_pattern()?;
            self.cursor.consume(Token::Eq)?;
            let value = self.parse_expr()?;
            bindings.push(LetBinding {
                pattern,
                value,
                mutable,
                loc,
            });
        }

        Ok(Declaration::new(
            DeclKind::LetRecGroup { bindings, exported },
            loc,
        ))
    }

    /// `type Name[<P, ...>] = definition`
    pub(crate) fn parse_type_decl(&mut self, exported: bool) -> ParseResult<Declaration> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::Type)?;
        let name = self.cursor.expect_upper_ident("type name")?;
        let params = self.parse_type_params()?;
        self.cursor.consume(Token::Eq)?;

        let definition = match self.cursor.peek().clone() {
            Token::LBrace => TypeDefinition::Record(self.cursor.parse_record_type_fields()?),
            Token::Pipe => {
                self.cursor.advance();
                TypeDefinition::Variant(self.parse_variant_constructors()?)
            }
            _ if self.at_variant_start() => {
                TypeDefinition::Variant(self.parse_variant_constructors()?)
            }
            _ => TypeDefinition::Alias(self.cursor.parse_type_expr()?),
        };

        Ok(Declaration::new(
            DeclKind::Type {
                name,
                params,
                definition,
                exported,
            },
            loc,
        ))
    }

    /// `Name(` or `Name |` opens a variant list rather than an alias
    fn at_variant_start(&self) -> bool {
        self.cursor.is_upper_ident()
            && matches!(self.cursor.peek_nth(1), Token::LParen | Token::Pipe)
    }

    /// Optional generic parameters: `<T, U>`
    fn parse_type_params(&mut self) -> ParseResult<Vec<Ident>> {
        if !self.cursor.check(&Token::Lt) {
            return Ok(Vec::new());
        }
        let opened_at = self.cursor.current_loc();
        self.cursor.advance();
        let params = self.separated_list(
            |p| p.cursor.expect_any_ident(),
            &Token::Comma,
            true,
            &Token::Gt,
        )?;
        self.cursor.split_closing_angle();
        self.cursor.expect_closing(Token::Lt, &opened_at)?;
        Ok(params)
    }

    /// `A | B(T) | C(T, U)`; a leading `|` has already been consumed
    fn parse_variant_constructors(&mut self) -> ParseResult<Vec<VariantConstructor>> {
        let mut constructors = Vec::new();
        loop {
            let loc = self.cursor.current_loc();
            let name = self.cursor.expect_upper_ident("constructor name")?;
            let args = if self.cursor.check(&Token::LParen) {
                self.delimited_list(
                    Token::LParen,
                    Token::RParen,
                    |p| p.cursor.parse_type_expr(),
                    &Token::Comma,
                )?
            } else {
                Vec::new()
            };
            constructors.push(VariantConstructor { name, args, loc });

            if !self.cursor.match_token(&Token::Pipe) {
                break;
            }
        }
        Ok(constructors)
    }

    /// `external name: T = "js" [from "m"]` or
    /// `external [from "m"] { name: T = "js"; type N<P> = T; }`
    pub(crate) fn parse_external_decl(&mut self, exported: bool) -> ParseResult<Declaration> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::External)?;

        if self.cursor.check(&Token::From) || self.cursor.check(&Token::LBrace) {
            let from = self.parse_from_clause()?;
            let items = self.parse_external_items()?;
            return Ok(Declaration::new(
                DeclKind::ExternalBlock {
                    items,
                    from,
                    exported,
                },
                loc,
            ));
        }

        let name = self.cursor.expect_ident()?;
        self.cursor.consume(Token::Colon)?;
        let type_expr = self.cursor.parse_type_expr()?;
        self.cursor.consume(Token::Eq)?;
        let js_name = self.cursor.expect_string("foreign name string")?;
        let from = self.parse_from_clause()?;

        Ok(Declaration::new(
            DeclKind::External {
                name,
                type_expr,
                js_name,
                from,
                exported,
            },
            loc,
        ))
    }

    fn parse_from_clause(&mut self) -> ParseResult<Option<String>> {
        if self.cursor.match_token(&Token::From) {
            Ok(Some(self.cursor.expect_string("module path string")?))
        } else {
            Ok(None)
        }
    }

    fn parse_external_items(&mut self) -> ParseResult<Vec<ExternalItem>> {
        let opened_at = self.cursor.current_loc();
        self.cursor.consume(Token::LBrace)?;

        let mut items = Vec::new();
        while !self.cursor.check(&Token::RBrace) && !self.cursor.is_at_end() {
            let loc = self.cursor.current_loc();
            let item = if self.cursor.match_token(&Token::Type) {
                let name = self.cursor.expect_upper_ident("type name")?;
                let params = self.parse_type_params()?;
                self.cursor.consume(Token::Eq)?;
                let type_expr = self.cursor.parse_type_expr()?;
                ExternalItem::Type {
                    name,
                    params,
                    type_expr,
                    loc,
                }
            } else {
                let name = self.cursor.expect_ident()?;
                self.cursor.consume(Token::Colon)?;
                let type_expr = self.cursor.parse_type_expr()?;
                self.cursor.consume(Token::Eq)?;
                let js_name = self.cursor.expect_string("foreign name string")?;
                ExternalItem::Value {
                    name,
                    type_expr,
                    js_name,
                    loc,
                }
            };
            items.push(item);
            self.cursor.consume(Token::Semicolon)?;
        }
        self.cursor.expect_closing(Token::LBrace, &opened_at)?;

        Ok(items)
    }

    /// `import { a, type T, b as c } from "m"` or `import * as M from "m"`
    pub(crate) fn parse_import_decl(&mut self) -> ParseResult<Declaration> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::Import)?;

        let items = if self.cursor.check(&Token::Star) {
            let item_loc = self.cursor.current_loc();
            self.cursor.advance();
            self.cursor.consume(Token::As)?;
            let alias = self.cursor.expect_any_ident()?;
            vec![ImportItem::Namespace {
                alias,
                loc: item_loc,
            }]
        } else {
            self.parse_import_items()?
        };

        self.cursor.consume(Token::From)?;
        let from = self.cursor.expect_string("module path string")?;

        Ok(Declaration::new(DeclKind::Import { items, from }, loc))
    }

    fn parse_import_items(&mut self) -> ParseResult<Vec<ImportItem>> {
        self.delimited_list(
            Token::LBrace,
            Token::RBrace,
            |p| {
                let loc = p.cursor.current_loc();
                let is_type = p.cursor.match_token(&Token::Type);
                let name = p.cursor.expect_any_ident()?;
                let alias = if p.cursor.match_token(&Token::As) {
                    Some(p.cursor.expect_any_ident()?)
                } else {
                    None
                };
                Ok(ImportItem::Named {
                    name,
                    alias,
                    is_type,
                    loc,
                })
            },
            &Token::Comma,
        )
    }

    /// `export let ...`, `export type ...`, `export external ...`,
    /// `export { ... } from "m"` or `export * from "m"`
    pub(crate) fn parse_export_decl(&mut self) -> ParseResult<Declaration> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::Export)?;

        let mut decl = match self.cursor.peek() {
            Token::Let => self.parse_let_decl(true)?,
            Token::Type => self.parse_type_decl(true)?,
            Token::External => self.parse_external_decl(true)?,
            Token::Star => {
                self.cursor.advance();
                self.cursor.consume(Token::From)?;
                let from = self.cursor.expect_string("module path string")?;
                Declaration::new(DeclKind::ReExport { items: None, from }, loc.clone())
            }
            Token::LBrace => {
                let items = self.parse_import_items()?;
                self.cursor.consume(Token::From)?;
                let from = self.cursor.expect_string("module path string")?;
                Declaration::new(
                    DeclKind::ReExport {
                        items: Some(items),
                        from,
                    },
                    loc.clone(),
                )
            }
            _ => {
                return Err(self
                    .cursor
                    .unexpected("`let`, `type`, `external`, `{` or `*` after `export`"))
            }
        };

        decl.loc = loc;
        Ok(decl)
    }
}
