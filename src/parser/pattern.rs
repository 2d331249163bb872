//! Pattern parsing: or-patterns over primary patterns

use crate::ast::{Literal, Pattern, PatternKind};
use crate::lexer::Token;

use super::combinators::Combinators;
use super::cursor::TokenCursor;
use super::error::{ParseError, ParseResult};
use super::record::RecordParser;
use super::types::TypeParser;

/// Extension trait for pattern parsing
pub trait PatternParser {
    /// Parse a full pattern (or-alternatives allowed)
    fn parse_pattern(&mut self) -> ParseResult<Pattern>;

    /// Parse `p1 | p2 | ...`. A `|` is only taken as an alternative separator
    /// when the token after it can start a pattern; otherwise it is left for
    /// the caller (a match case separator, typically).
    fn parse_or_pattern(&mut self) -> ParseResult<Pattern>;

    /// Parse a single pattern without alternatives
    fn parse_primary_pattern(&mut self) -> ParseResult<Pattern>;

    /// Parse `()`, `(p)`, `(p: T)` or `(p, q, ...)`
    fn parse_paren_pattern(&mut self) -> ParseResult<Pattern>;

    /// Parse `[p, q, ...rest]`
    fn parse_list_pattern(&mut self) -> ParseResult<Pattern>;
}

impl PatternParser for TokenCursor {
    fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        self.nested(|c| c.parse_or_pattern())
    }

    fn parse_or_pattern(&mut self) -> ParseResult<Pattern> {
        let loc = self.current_loc();
        let first = self.parse_primary_pattern()?;

        let mut patterns = vec![first];
        while self.check(&Token::Pipe) && self.is_pattern_start_at(1) {
            self.advance();
            patterns.push(self.parse_primary_pattern()?);
        }

        if patterns.len() == 1 {
            Ok(patterns.remove(0))
        } else {
            Ok(Pattern::new(PatternKind::Or { patterns }, loc))
        }
    }

    fn parse_primary_pattern(&mut self) -> ParseResult<Pattern> {
        let loc = self.current_loc();

        let literal = match self.peek().clone() {
            Token::Underscore => {
                self.advance();
                return Ok(Pattern::new(PatternKind::Wildcard, loc));
            }
            Token::Ident(name) => {
                self.advance();
                return Ok(Pattern::new(PatternKind::Var(name), loc));
            }
            Token::UpperIdent(name) => {
                // Only `Name(` is a constructor; a bare capitalized name binds
                if !matches!(self.peek_nth(1), Token::LParen) {
                    self.advance();
                    return Ok(Pattern::new(PatternKind::Var(name), loc));
                }
                self.advance();
                let args = self.delimited_list(
                    Token::LParen,
                    Token::RParen,
                    |c| c.parse_pattern(),
                    &Token::Comma,
                )?;
                return Ok(Pattern::new(
                    PatternKind::Constructor {
                        constructor: name,
                        args,
                    },
                    loc,
                ));
            }
            Token::LParen => return self.parse_paren_pattern(),
            Token::LBracket => return self.parse_list_pattern(),
            Token::LBrace => {
                let fields = self.parse_record_pattern_fields()?;
                return Ok(Pattern::new(PatternKind::Record { fields }, loc));
            }
            Token::Int(n) => Literal::Int(n),
            Token::Float(f) => Literal::Float(f),
            Token::String(s) => Literal::String(s),
            Token::True => Literal::Bool(true),
            Token::False => Literal::Bool(false),
            Token::Null => Literal::Null,
            Token::Minus => match self.peek_nth(1).clone() {
                Token::Int(n) => {
                    self.advance();
                    Literal::Int(-n)
                }
                Token::Float(f) => {
                    self.advance();
                    Literal::Float(-f)
                }
                _ => return Err(self.unexpected("pattern")),
            },
            _ => return Err(self.unexpected("pattern")),
        };

        self.advance();
        Ok(Pattern::new(PatternKind::Literal(literal), loc))
    }

    fn parse_paren_pattern(&mut self) -> ParseResult<Pattern> {
        let loc = self.current_loc();
        self.consume(Token::LParen)?;

        if self.match_token(&Token::RParen) {
            return Ok(Pattern::new(PatternKind::Literal(Literal::Unit), loc));
        }

        let mut elements = vec![parse_annotated(self)?];
        while self.match_token(&Token::Comma) {
            if self.check(&Token::RParen) {
                break;
            }
            elements.push(parse_annotated(self)?);
        }
        self.expect_closing(Token::LParen, &loc)?;

        if elements.len() >= 2 {
            Ok(Pattern::new(PatternKind::Tuple { elements }, loc))
        } else {
            Ok(elements.remove(0))
        }
    }

    fn parse_list_pattern(&mut self) -> ParseResult<Pattern> {
        let loc = self.current_loc();
        self.consume(Token::LBracket)?;

        let mut elements = Vec::new();
        let mut rest = None;

        while !self.check(&Token::RBracket) {
            if self.check(&Token::Spread) {
                self.advance();
                rest = Some(Box::new(parse_rest_binding(self)?));
                self.match_token(&Token::Comma);
                if !self.check(&Token::RBracket) && !self.is_at_end() {
                    return Err(ParseError::invalid_with_hint(
                        "a rest pattern must be the last element of a list pattern",
                        "move the `...rest` binding to the end of the list",
                        self.current_loc(),
                    ));
                }
                break;
            }
            elements.push(self.parse_pattern()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect_closing(Token::LBracket, &loc)?;

        Ok(Pattern::new(PatternKind::List { elements, rest }, loc))
    }
}

/// A pattern inside parentheses, optionally annotated: `p: T`
fn parse_annotated(cursor: &mut TokenCursor) -> ParseResult<Pattern> {
    let pattern = cursor.parse_pattern()?;
    if !cursor.match_token(&Token::Colon) {
        return Ok(pattern);
    }
    let type_expr = cursor.parse_type_expr()?;
    let loc = pattern.loc.clone();
    Ok(Pattern::new(
        PatternKind::TypeAnnotated {
            pattern: Box::new(pattern),
            type_expr,
        },
        loc,
    ))
}

/// The binding after `...` in a list pattern: a name or `_`
fn parse_rest_binding(cursor: &mut TokenCursor) -> ParseResult<Pattern> {
    let loc = cursor.current_loc();
    match cursor.peek().clone() {
        Token::Ident(name) => {
            cursor.advance();
            Ok(Pattern::new(PatternKind::Var(name), loc))
        }
        Token::Underscore => {
            cursor.advance();
            Ok(Pattern::new(PatternKind::Wildcard, loc))
        }
        _ => Err(cursor.unexpected("name or `_` after `...`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn cursor(input: &str) -> TokenCursor {
        let tokens = Lexer::new(input, "test.sch").tokenize().unwrap();
        TokenCursor::new(tokens)
    }

    fn parse_pat(input: &str) -> Pattern {
        cursor(input).parse_pattern().unwrap()
    }

    #[test]
    fn test_wildcard() {
        let pat = parse_pat("_");
        assert!(matches!(pat.node, PatternKind::Wildcard));
    }

    #[test]
    fn test_var() {
        let pat = parse_pat("x");
        assert!(matches!(pat.node, PatternKind::Var(ref s) if s == "x"));
    }

    #[test]
    fn test_literals() {
        assert!(matches!(parse_pat("42").node, PatternKind::Literal(Literal::Int(42))));
        assert!(matches!(parse_pat("-3").node, PatternKind::Literal(Literal::Int(-3))));
        assert!(matches!(parse_pat("null").node, PatternKind::Literal(Literal::Null)));
        assert!(matches!(parse_pat("true").node, PatternKind::Literal(Literal::Bool(true))));
        assert!(matches!(parse_pat("()").node, PatternKind::Literal(Literal::Unit)));
    }

    #[test]
    fn test_bare_upper_name_is_binding() {
        let pat = parse_pat("None");
        assert!(matches!(pat.node, PatternKind::Var(ref s) if s == "None"));
    }

    #[test]
    fn test_constructor_with_args() {
        let pat = parse_pat("Pair(x, _)");
        if let PatternKind::Constructor { constructor, args } = &pat.node {
            assert_eq!(constructor, "Pair");
            assert_eq!(args.len(), 2);
        } else {
            panic!("expected constructor pattern");
        }

        let pat = parse_pat("None()");
        assert!(matches!(&pat.node, PatternKind::Constructor { args, .. } if args.is_empty()));
    }

    #[test]
    fn test_or_pattern_inside_constructor() {
        let pat = parse_pat(r#"Some(Ok("a" | "b"))"#);
        let PatternKind::Constructor { args, .. } = &pat.node else {
            panic!("expected constructor pattern");
        };
        let PatternKind::Constructor { args, .. } = &args[0].node else {
            panic!("expected nested constructor");
        };
        assert!(matches!(&args[0].node, PatternKind::Or { patterns } if patterns.len() == 2));
    }

    #[test]
    fn test_or_pattern_leaves_case_pipe() {
        let mut c = cursor("1 | 2 | => x");
        let pat = c.parse_pattern().unwrap();
        assert!(matches!(&pat.node, PatternKind::Or { patterns } if patterns.len() == 2));
        assert!(c.check(&Token::Pipe));
    }

    #[test]
    fn test_tuple_pattern() {
        let pat = parse_pat("(x, y, z)");
        assert!(matches!(&pat.node, PatternKind::Tuple { elements } if elements.len() == 3));
        assert!(matches!(parse_pat("(x)").node, PatternKind::Var(_)));
        assert!(matches!(parse_pat("(x,)").node, PatternKind::Var(_)));
    }

    #[test]
    fn test_annotated_pattern() {
        let pat = parse_pat("(x: Int)");
        assert!(matches!(pat.node, PatternKind::TypeAnnotated { .. }));
    }

    #[test]
    fn test_list_pattern_with_rest() {
        let pat = parse_pat("[a, b, ...rest]");
        if let PatternKind::List { elements, rest } = &pat.node {
            assert_eq!(elements.len(), 2);
            assert!(matches!(rest.as_deref().map(|p| &p.node), Some(PatternKind::Var(r)) if r == "rest"));
        } else {
            panic!("expected list pattern");
        }

        let pat = parse_pat("[x, ..._]");
        assert!(matches!(&pat.node, PatternKind::List { rest: Some(r), .. } if r.node == PatternKind::Wildcard));
    }

    #[test]
    fn test_rest_must_be_last() {
        let err = cursor("[...rest, x]").parse_pattern().unwrap_err();
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_empty_list_pattern() {
        let pat = parse_pat("[]");
        assert!(matches!(&pat.node, PatternKind::List { elements, rest: None } if elements.is_empty()));
    }

    #[test]
    fn test_record_pattern() {
        let pat = parse_pat("{ x, y: Some(z) | None() }");
        let PatternKind::Record { fields } = &pat.node else {
            panic!("expected record pattern");
        };
        assert_eq!(fields.len(), 2);
        assert!(matches!(&fields[1].pattern.node, PatternKind::Or { .. }));
    }
}
