//! Expression parsing
//!
//! Binary operators go through a single precedence-climbing loop driven by
//! `crate::operators`. Prefix operators are collected iteratively and
//! postfix operators (call, field access, dereference) loop left to right, so
//! neither adds native recursion per operator.

use tracing::trace;

use crate::ast::*;
use crate::lexer::Token;
use crate::operators::{self, Associativity, InfixOp};

use super::combinators::Combinators;
use super::error::{ParseError, ParseResult};
use super::pattern::PatternParser;
use super::types::TypeParser;
use super::{ExprContext, Parser};

const SECTION_HINT: &str = "write a lambda instead, e.g. `(x, y) => x + y`";

impl Parser {
    /// Parse an expression in the full context
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_in(ExprContext::Full)
    }

    /// Parse an expression in `ctx`. The context covers the operator chain
    /// at this level; anything parsed through a nested `parse_expr` is back
    /// in the full context.
    pub fn parse_expr_in(&mut self, ctx: ExprContext) -> ParseResult<Expr> {
        let outer = std::mem::replace(&mut self.context, ctx);
        let result = self.nested(|p| {
            if ctx.allows_lambda() && p.at_bare_lambda() {
                p.parse_bare_lambda()
            } else {
                p.parse_binary(1)
            }
        });
        self.context = outer;
        result
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        let mut left = self.parse_unary()?;

        loop {
            let Some((op, info)) = operators::infix(self.cursor.peek()) else {
                break;
            };
            if info.precedence < min_prec {
                break;
            }
            self.cursor.advance();

            // `(1 +)`
            if self.cursor.check(&Token::RParen) {
                return Err(section_error(self.cursor.current_loc()));
            }

            let right = match info.assoc {
                Associativity::Left => self.parse_binary(info.next_min())?,
                Associativity::Right => self.nested(|p| p.parse_binary(info.next_min()))?,
            };

            let kind = match op {
                InfixOp::Pipe => ExprKind::Pipe {
                    expr: Box::new(left),
                    func: Box::new(right),
                },
                InfixOp::Binary(op) => ExprKind::BinOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
            left = Expr::new(kind, loc.clone());
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let mut prefixes = Vec::new();
        loop {
            let op = match self.cursor.peek() {
                Token::Minus => UnaryOp::Negate,
                Token::Bang => UnaryOp::LogicalNot,
                _ => break,
            };
            prefixes.push((op, self.cursor.current_loc()));
            self.cursor.advance();
        }

        let mut expr = self.parse_postfix()?;
        for (op, loc) in prefixes.into_iter().rev() {
            expr = Expr::new(
                ExprKind::UnaryOp {
                    op,
                    expr: Box::new(expr),
                },
                loc,
            );
        }
        Ok(expr)
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        let mut expr = self.parse_primary()?;

        loop {
            let kind = match self.cursor.peek() {
                Token::LParen => {
                    let args = self.delimited_list(
                        Token::LParen,
                        Token::RParen,
                        |p| p.parse_expr(),
                        &Token::Comma,
                    )?;
                    ExprKind::App {
                        func: Box::new(expr),
                        args,
                    }
                }
                Token::Dot => {
                    self.cursor.advance();
                    let field = match self.cursor.peek().clone() {
                        Token::Ident(name) => {
                            self.cursor.advance();
                            name
                        }
                        _ => return Err(self.cursor.unexpected("field name after `.`")),
                    };
                    ExprKind::RecordAccess {
                        record: Box::new(expr),
                        field,
                    }
                }
                Token::Bang => {
                    self.cursor.advance();
                    ExprKind::UnaryOp {
                        op: UnaryOp::Deref,
                        expr: Box::new(expr),
                    }
                }
                _ => break,
            };
            expr = Expr::new(kind, loc.clone());
        }

        Ok(expr)
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();

        let literal = match self.cursor.peek().clone() {
            Token::Int(n) => Literal::Int(n),
            Token::Float(f) => Literal::Float(f),
            Token::String(s) => Literal::String(s),
            Token::True => Literal::Bool(true),
            Token::False => Literal::Bool(false),
            Token::Ident(name) | Token::UpperIdent(name) => {
                self.cursor.advance();
                return Ok(Expr::new(ExprKind::Var(name), loc));
            }
            Token::LParen if self.context.allows_lambda() && self.at_lambda_params() => {
                return self.parse_paren_lambda()
            }
            Token::LParen => return self.parse_group(),
            Token::LBracket => return self.parse_list(),
            Token::LBrace => return self.parse_brace(),
            Token::If => return self.parse_if(),
            Token::Match => return self.parse_match(),
            Token::While => return self.parse_while(),
            Token::Unsafe => return self.parse_unsafe(),
            Token::Null => {
                return Err(ParseError::invalid(
                    "`null` can only appear in patterns",
                    loc,
                ))
            }
            _ => return Err(self.cursor.unexpected("expression")),
        };

        self.cursor.advance();
        Ok(Expr::new(ExprKind::Lit(literal), loc))
    }

    // ========================================================================
    // Lambdas, groups and tuples
    // ========================================================================

    fn at_bare_lambda(&self) -> bool {
        (self.cursor.is_ident() || self.cursor.check(&Token::Underscore))
            && matches!(self.cursor.peek_nth(1), Token::FatArrow)
    }

    /// `x => body`
    fn parse_bare_lambda(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        let pattern = self.parse_param_pattern()?;
        self.cursor.consume(Token::FatArrow)?;
        let body = self.parse_expr()?;
        let params = vec![LambdaParam {
            pattern,
            type_annotation: None,
        }];
        Ok(lambda(params, None, body, loc))
    }

    /// Whether the `(` at the cursor opens something shaped like a parameter
    /// list: `()`, `(x)`, `(x,`, `(x:`
    fn at_lambda_params(&self) -> bool {
        match self.cursor.peek_nth(1) {
            Token::RParen => true,
            Token::Ident(_) | Token::Underscore => matches!(
                self.cursor.peek_nth(2),
                Token::RParen | Token::Comma | Token::Colon
            ),
            _ => false,
        }
    }

    fn at_operator_section(&self) -> bool {
        match self.cursor.peek() {
            // `(-x)` is negation, `(-)` is a section
            Token::Minus => matches!(self.cursor.peek_nth(1), Token::RParen),
            token => operators::is_infix(token),
        }
    }

    /// A `(` shaped like a parameter list: try it as a lambda head and fall
    /// back to a group
    fn parse_paren_lambda(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        match self.speculate(|p| p.parse_lambda_head()) {
            Some((params, return_type)) => {
                let body = self.parse_expr()?;
                Ok(lambda(params, return_type, body, loc))
            }
            None => self.parse_group(),
        }
    }

    /// `()`, `(e)`, `(e: T)` or a tuple of two or more elements. A group
    /// followed by `=>` becomes a lambda unless lambdas are off, as in a guard.
    fn parse_group(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::LParen)?;
        if self.at_operator_section() {
            return Err(section_error(self.cursor.current_loc()));
        }
        if self.cursor.match_token(&Token::RParen) {
            return Ok(Expr::new(ExprKind::Lit(Literal::Unit), loc));
        }

        let mut elements = vec![self.parse_group_element()?];
        while self.cursor.match_token(&Token::Comma) {
            if self.cursor.check(&Token::RParen) {
                break;
            }
            elements.push(self.parse_group_element()?);
        }
        self.cursor.expect_closing(Token::LParen, &loc)?;

        if self.context.allows_lambda() && self.cursor.check(&Token::FatArrow) {
            return self.lambda_from_group(elements, loc);
        }

        // `(a,)` is just `a`
        if elements.len() >= 2 {
            Ok(Expr::new(ExprKind::Tuple { elements }, loc))
        } else {
            Ok(elements.remove(0))
        }
    }

    /// `(params) [: ReturnType] =>`
    fn parse_lambda_head(&mut self) -> ParseResult<(Vec<LambdaParam>, Option<TypeExpr>)> {
        let params = self.delimited_list(
            Token::LParen,
            Token::RParen,
            |p| {
                let pattern = p.parse_param_pattern()?;
                let type_annotation = p.parse_annotation()?;
                Ok(LambdaParam {
                    pattern,
                    type_annotation,
                })
            },
            &Token::Comma,
        )?;
        let return_type = self.parse_annotation()?;
        self.cursor.consume(Token::FatArrow)?;
        Ok((params, return_type))
    }

    /// An optional `: Type`
    fn parse_annotation(&mut self) -> ParseResult<Option<TypeExpr>> {
        self.optional(
            |p| {
                p.cursor.advance();
                p.cursor.parse_type_expr()
            },
            |cursor| cursor.check(&Token::Colon),
        )
    }

    fn parse_param_pattern(&mut self) -> ParseResult<Pattern> {
        let loc = self.cursor.current_loc();
        match self.cursor.peek().clone() {
            Token::Ident(name) => {
                self.cursor.advance();
                Ok(Pattern::new(PatternKind::Var(name), loc))
            }
            Token::Underscore => {
                self.cursor.advance();
                Ok(Pattern::new(PatternKind::Wildcard, loc))
            }
            _ => Err(self.cursor.unexpected("parameter name")),
        }
    }

    /// One element of a parenthesized group, optionally annotated: `e: T`
    fn parse_group_element(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr()?;
        let Some(type_expr) = self.parse_annotation()? else {
            return Ok(expr);
        };
        let loc = expr.loc.clone();
        Ok(Expr::new(
            ExprKind::TypeAnnotation {
                expr: Box::new(expr),
                type_expr,
            },
            loc,
        ))
    }

    /// A group followed by `=>`: every element must be a plain variable,
    /// optionally annotated
    fn lambda_from_group(&mut self, elements: Vec<Expr>, loc: Location) -> ParseResult<Expr> {
        let params = elements
            .into_iter()
            .map(param_from_expr)
            .collect::<ParseResult<Vec<_>>>()?;
        self.cursor.consume(Token::FatArrow)?;
        let body = self.parse_expr()?;
        Ok(lambda(params, None, body, loc))
    }

    // ========================================================================
    // Lists, records and blocks
    // ========================================================================

    fn parse_list(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        let elements = self.delimited_list(
            Token::LBracket,
            Token::RBracket,
            |p| {
                if p.cursor.match_token(&Token::Spread) {
                    Ok(ListElement::Spread(p.parse_expr()?))
                } else {
                    Ok(ListElement::Element(p.parse_expr()?))
                }
            },
            &Token::Comma,
        )?;
        Ok(Expr::new(ExprKind::List { elements }, loc))
    }

    /// Decide between record, record update and block for a `{`
    fn parse_brace(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();

        match self.cursor.peek_nth(1) {
            Token::RBrace => {
                self.cursor.advance();
                self.cursor.advance();
                return Ok(Expr::new(ExprKind::Record { fields: Vec::new() }, loc));
            }
            Token::If | Token::Match | Token::Unsafe | Token::Let | Token::While => {
                return self.parse_block();
            }
            Token::Spread => return self.parse_spread_update(loc),
            Token::Ident(_) => match self.cursor.peek_nth(2) {
                Token::Pipe => return self.parse_base_update(loc),
                Token::Colon | Token::Comma | Token::RBrace => {
                    let fields = self.parse_record_entries()?;
                    return Ok(Expr::new(ExprKind::Record { fields }, loc));
                }
                _ => {}
            },
            _ => {}
        }

        self.parse_ambiguous_brace(loc)
    }

    /// `{ expr ... }`: parse one expression and look at what follows it.
    /// A `;` commits to a block that starts with that expression; on any
    /// error the cursor goes back to the `{`.
    fn parse_ambiguous_brace(&mut self, loc: Location) -> ParseResult<Expr> {
        let checkpoint = self.cursor.checkpoint();
        self.cursor.advance();

        let result = match self.parse_expr() {
            Ok(first) => match self.cursor.peek().clone() {
                Token::Semicolon => {
                    self.cursor.advance();
                    return self.parse_block_rest(vec![first], loc);
                }
                Token::RBrace => Err(ParseError::invalid_with_hint(
                    "a single expression in braces is ambiguous",
                    "add `;` after the expression for a block, or write `name: value` for a record",
                    self.cursor.current_loc(),
                )),
                Token::Eof => Err(self.cursor.unclosed(Token::LBrace, &loc)),
                next => Err(ParseError::unexpected(
                    "`;` or `}`",
                    next,
                    self.cursor.current_loc(),
                )),
            },
            Err(err) => Err(err),
        };

        self.cursor.rewind(checkpoint);
        trace!(loc = %loc, "rolled back brace expression");
        result
    }

    fn parse_record_entries(&mut self) -> ParseResult<Vec<RecordEntry>> {
        self.delimited_list(
            Token::LBrace,
            Token::RBrace,
            |p| p.parse_record_entry(),
            &Token::Comma,
        )
    }

    /// `name: value`, `name` or `...expr`
    fn parse_record_entry(&mut self) -> ParseResult<RecordEntry> {
        if self.cursor.match_token(&Token::Spread) {
            return Ok(RecordEntry::Spread(self.parse_expr()?));
        }
        let loc = self.cursor.current_loc();
        let name = match self.cursor.peek().clone() {
            Token::Ident(name) => {
                self.cursor.advance();
                name
            }
            _ => return Err(self.cursor.unexpected("record field")),
        };
        let value = if self.cursor.match_token(&Token::Colon) {
            self.parse_expr()?
        } else {
            Expr::new(ExprKind::Var(name.clone()), loc.clone())
        };
        Ok(RecordEntry::Field { name, value, loc })
    }

    /// `{ ...base, x: 1, ...other }`: the first spread is the base record,
    /// everything after it is applied in order
    fn parse_spread_update(&mut self, loc: Location) -> ParseResult<Expr> {
        let mut entries = self.parse_record_entries()?.into_iter();
        let record = match entries.next() {
            Some(RecordEntry::Spread(base)) => base,
            _ => {
                return Err(ParseError::internal(
                    "record update without a leading spread",
                    loc,
                ))
            }
        };
        Ok(Expr::new(
            ExprKind::RecordUpdate {
                record: Box::new(record),
                updates: entries.collect(),
            },
            loc,
        ))
    }

    /// `{ base | x: 1, y: 2 }`
    fn parse_base_update(&mut self, loc: Location) -> ParseResult<Expr> {
        self.cursor.consume(Token::LBrace)?;
        let base_loc = self.cursor.current_loc();
        let base = self.cursor.expect_ident()?;
        self.cursor.consume(Token::Pipe)?;
        let updates = self.separated_list(
            |p| p.parse_record_entry(),
            &Token::Comma,
            true,
            &Token::RBrace,
        )?;
        self.cursor.expect_closing(Token::LBrace, &loc)?;
        Ok(Expr::new(
            ExprKind::RecordUpdate {
                record: Box::new(Expr::new(ExprKind::Var(base), base_loc)),
                updates,
            },
            loc,
        ))
    }

    /// `{ stmt; stmt; ... }`; every statement ends with `;`
    pub fn parse_block(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::LBrace)?;
        self.parse_block_rest(Vec::new(), loc)
    }

    /// The statements of a block after `{` and any already-parsed ones
    fn parse_block_rest(&mut self, mut exprs: Vec<Expr>, loc: Location) -> ParseResult<Expr> {
        while !self.cursor.check(&Token::RBrace) && !self.cursor.is_at_end() {
            exprs.push(self.parse_statement()?);
            if self.cursor.match_token(&Token::Semicolon) || self.cursor.is_at_end() {
                continue;
            }
            return Err(ParseError::invalid_with_hint(
                format!("expected `;` after statement, found {}", self.cursor.peek()),
                "end every statement in a block with `;`",
                self.cursor.current_loc(),
            ));
        }
        self.cursor.expect_closing(Token::LBrace, &loc)?;

        Ok(Expr::new(ExprKind::Block { exprs }, loc))
    }

    fn parse_statement(&mut self) -> ParseResult<Expr> {
        if !self.cursor.check(&Token::Let) {
            return self.parse_expr();
        }

        let loc = self.cursor.current_loc();
        self.cursor.advance();
        let mutable = self.cursor.match_token(&Token::Mut);
        let recursive = self.cursor.match_token(&Token::Rec);
        let pattern = self.parse_binding_pattern()?;
        self.cursor.consume(Token::Eq)?;
        let value = self.parse_expr()?;

        Ok(Expr::new(
            ExprKind::Let {
                pattern,
                value: Box::new(value),
                mutable,
                recursive,
            },
            loc,
        ))
    }

    /// The pattern of a `let`, with an optional `: Type`
    pub(crate) fn parse_binding_pattern(&mut self) -> ParseResult<Pattern> {
        let pattern = self.cursor.parse_pattern()?;
        let Some(type_expr) = self.parse_annotation()? else {
            return Ok(pattern);
        };
        let loc = pattern.loc.clone();
        Ok(Pattern::new(
            PatternKind::TypeAnnotated {
                pattern: Box::new(pattern),
                type_expr,
            },
            loc,
        ))
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn parse_if(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::If)?;

        let condition = self.parse_expr()?;
        self.cursor.consume(Token::Then)?;
        // the branches end the enclosing expression, so a guard's rules apply
        let then_branch = self.parse_expr_in(self.context)?;
        let else_branch = if self.cursor.match_token(&Token::Else) {
            self.parse_expr_in(self.context)?
        } else {
            // Missing else: unit at the token after the then-branch
            Expr::new(ExprKind::Lit(Literal::Unit), self.cursor.current_loc())
        };

        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            loc,
        ))
    }

    fn parse_match(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::Match)?;

        let scrutinee = self.parse_expr()?;
        let opened_at = self.cursor.current_loc();
        self.cursor.consume(Token::LBrace)?;

        let mut cases = Vec::new();
        while !self.cursor.check(&Token::RBrace) && !self.cursor.is_at_end() {
            cases.push(self.parse_match_case()?);
        }
        if cases.is_empty() && self.cursor.check(&Token::RBrace) {
            return Err(ParseError::invalid_with_hint(
                "a match expression needs at least one case",
                "add a case such as `| _ => ...`",
                self.cursor.current_loc(),
            ));
        }
        self.cursor.expect_closing(Token::LBrace, &opened_at)?;

        Ok(Expr::new(
            ExprKind::Match {
                expr: Box::new(scrutinee),
                cases,
            },
            loc,
        ))
    }

    /// `| pattern [when guard] => body`
    fn parse_match_case(&mut self) -> ParseResult<MatchCase> {
        let loc = self.cursor.current_loc();
        if !self.cursor.match_token(&Token::Pipe) {
            return Err(ParseError::invalid_with_hint(
                format!("expected `|` to start a match case, found {}", self.cursor.peek()),
                "write each case as `| pattern => body`",
                loc,
            ));
        }

        let pattern = self.cursor.parse_pattern()?;
        let guard = if self.cursor.match_token(&Token::When) {
            Some(self.parse_expr_in(ExprContext::Guard)?)
        } else {
            None
        };
        self.cursor.consume(Token::FatArrow)?;
        let body = self.parse_expr()?;

        Ok(MatchCase {
            pattern,
            guard,
            body,
            loc,
        })
    }

    fn parse_unsafe(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::Unsafe)?;
        let body = self.parse_block()?;
        Ok(Expr::new(
            ExprKind::Unsafe {
                expr: Box::new(body),
            },
            loc,
        ))
    }

    fn parse_while(&mut self) -> ParseResult<Expr> {
        let loc = self.cursor.current_loc();
        self.cursor.consume(Token::While)?;

        let condition = self.parse_expr()?;
        let body = self.parse_block()?;

        Ok(Expr::new(
            ExprKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
            },
            loc,
        ))
    }
}

fn lambda(
    params: Vec<LambdaParam>,
    return_type: Option<TypeExpr>,
    body: Expr,
    loc: Location,
) -> Expr {
    Expr::new(
        ExprKind::Lambda {
            params,
            return_type,
            body: Box::new(body),
        },
        loc,
    )
}

fn section_error(loc: Location) -> ParseError {
    ParseError::invalid_with_hint("operator sections are not supported", SECTION_HINT, loc)
}

fn param_from_expr(expr: Expr) -> ParseResult<LambdaParam> {
    let (inner, type_annotation) = match expr.node {
        ExprKind::TypeAnnotation { expr, type_expr } => (*expr, Some(type_expr)),
        node => (Expr::new(node, expr.loc), None),
    };
    match inner.node {
        ExprKind::Var(name) => Ok(LambdaParam {
            pattern: Pattern::new(PatternKind::Var(name), inner.loc),
            type_annotation,
        }),
        _ => Err(ParseError::invalid_with_hint(
            "lambda parameters must be plain names",
            "take the argument by name and destructure it with `match` in the body",
            inner.loc,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(input: &str) -> Expr {
        let tokens = Lexer::new(input, "test.sch").tokenize().unwrap();
        Parser::new(tokens).parse_expression().unwrap()
    }

    fn parse_err(input: &str) -> ParseError {
        let tokens = Lexer::new(input, "test.sch").tokenize().unwrap();
        Parser::new(tokens).parse_expression().unwrap_err()
    }

    #[test]
    fn test_binop_location_is_leftmost_operand() {
        let expr = parse("a + b * c");
        assert_eq!(expr.loc.column, 1);
        let ExprKind::BinOp { right, .. } = &expr.node else {
            panic!("expected binop");
        };
        assert_eq!(right.loc.column, 5);
    }

    #[test]
    fn test_prefix_location_is_operator() {
        let expr = parse("  -x");
        assert_eq!(expr.loc.column, 3);
    }

    #[test]
    fn test_pipe_node() {
        let expr = parse("x |> f |> g");
        let ExprKind::Pipe { expr: inner, func } = &expr.node else {
            panic!("expected pipe");
        };
        assert!(matches!(inner.node, ExprKind::Pipe { .. }));
        assert!(matches!(&func.node, ExprKind::Var(g) if g == "g"));
    }

    #[test]
    fn test_missing_else_location() {
        let expr = parse("(if c then x)");
        let ExprKind::If { else_branch, .. } = &expr.node else {
            panic!("expected if");
        };
        assert_eq!(else_branch.node, ExprKind::Lit(Literal::Unit));
        assert_eq!(else_branch.loc.column, 13);
    }

    #[test]
    fn test_guard_does_not_swallow_case_arrow() {
        let expr = parse("match x { | y when ready => y }");
        let ExprKind::Match { cases, .. } = &expr.node else {
            panic!("expected match");
        };
        assert!(matches!(&cases[0].guard, Some(g) if g.node == ExprKind::Var("ready".into())));
    }

    #[test]
    fn test_annotated_group() {
        let expr = parse("(x: Int)");
        assert!(matches!(expr.node, ExprKind::TypeAnnotation { .. }));
    }

    #[test]
    fn test_lambda_with_types() {
        let expr = parse("(x: Int, y): Int => x");
        let ExprKind::Lambda {
            params,
            return_type,
            ..
        } = &expr.node
        else {
            panic!("expected lambda");
        };
        assert_eq!(params.len(), 2);
        assert!(params[0].type_annotation.is_some());
        assert!(params[1].type_annotation.is_none());
        assert!(return_type.is_some());
    }

    #[test]
    fn test_group_lambda_with_non_variable_param() {
        let err = parse_err("(x + 1) => x");
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_null_rejected_in_expression() {
        let err = parse_err("null");
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_base_pipe_update() {
        let expr = parse("{ r | x: 1, y }");
        let ExprKind::RecordUpdate { record, updates } = &expr.node else {
            panic!("expected record update");
        };
        assert!(matches!(&record.node, ExprKind::Var(r) if r == "r"));
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn test_block_missing_semicolon() {
        let err = parse_err("{ let x = 1; x }");
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
        assert_eq!(err.loc().column, 16);
    }
}
