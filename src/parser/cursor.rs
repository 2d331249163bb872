//! Token stream cursor with lookahead, checkpoints and a nesting-depth guard

use crate::ast::{Ident, Location};
use crate::lexer::{SpannedToken, Token};

use super::error::{ParseError, ParseResult};

/// Default limit for nested expressions, patterns and types.
///
/// Sized so that a debug build stays inside a 2 MiB thread stack at the
/// limit; raise it through `ParserConfig` when parsing on a larger stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Saved cursor state for speculative parsing.
///
/// Rewinding also undoes any closing-angle splits performed after the
/// checkpoint was taken, so the token buffer is exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    splits: usize,
}

/// A compound token that was split in two, kept so the split can be undone
#[derive(Debug)]
struct Split {
    index: usize,
    original: SpannedToken,
}

/// Token stream cursor providing lookahead and location tracking
pub struct TokenCursor {
    tokens: Vec<SpannedToken>,
    pos: usize,
    splits: Vec<Split>,
    depth: usize,
    max_depth: usize,
}

impl TokenCursor {
    /// Create a new cursor over a token stream.
    ///
    /// A trailing EOF token is synthesized if the stream lacks one, so the
    /// cursor can always answer `peek` with a real token.
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.token == Token::Eof) {
            let loc = tokens.last().map(|t| t.loc.clone()).unwrap_or_default();
            tokens.push(SpannedToken {
                token: Token::Eof,
                loc,
            });
        }
        Self {
            tokens,
            pos: 0,
            splits: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    // ========================================================================
    // Position and lookahead
    // ========================================================================

    /// Get the current token without consuming it
    pub fn peek(&self) -> &Token {
        &self.current().token
    }

    /// Peek at a token n positions ahead (0 = current); EOF past the end
    pub fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)].token
    }

    /// The current token with its location
    pub fn current(&self) -> &SpannedToken {
        &self.tokens[self.pos]
    }

    /// Location of the current token
    pub fn current_loc(&self) -> Location {
        self.current().loc.clone()
    }

    /// Check if we've reached the end of the token stream
    pub fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    /// Number of tokens in the stream, EOF included
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            splits: self.splits.len(),
        }
    }

    /// Return to a checkpoint, undoing any token splits made since
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        while self.splits.len() > checkpoint.splits {
            if let Some(split) = self.splits.pop() {
                self.tokens.remove(split.index + 1);
                self.tokens[split.index] = split.original;
            }
        }
        self.pos = checkpoint.pos;
    }

    // ========================================================================
    // Token consumption
    // ========================================================================

    /// Consume the current token and return it. At EOF the cursor does not
    /// move and the EOF token is returned again.
    pub fn advance(&mut self) -> &SpannedToken {
        let idx = self.pos;
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    /// Check if the current token matches the expected token
    pub fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    /// Check if the current token is any of the given tokens
    pub fn check_any(&self, tokens: &[Token]) -> bool {
        tokens.iter().any(|t| self.check(t))
    }

    /// If the current token matches, consume it and return true
    pub fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the expected token or return an error at the current token
    pub fn consume(&mut self, expected: Token) -> ParseResult<&SpannedToken> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(ParseError::MissingToken {
                expected,
                found: self.peek().clone(),
                loc: self.current_loc(),
            })
        }
    }

    /// Consume a closing delimiter.
    ///
    /// Reaching EOF or a different closer means the construct opened at
    /// `opened_at` was never terminated, which is reported as `Unclosed`.
    pub fn expect_closing(&mut self, open: Token, opened_at: &Location) -> ParseResult<()> {
        let close = match open {
            Token::LParen => Token::RParen,
            Token::LBracket => Token::RBracket,
            Token::LBrace => Token::RBrace,
            Token::Lt => Token::Gt,
            other => {
                return Err(ParseError::internal(
                    format!("{} is not an opening delimiter", other),
                    self.current_loc(),
                ))
            }
        };
        if self.match_token(&close) {
            return Ok(());
        }
        if self.is_at_end() || self.check_any(&[Token::RParen, Token::RBracket, Token::RBrace]) {
            return Err(self.unclosed(open, opened_at));
        }
        Err(ParseError::MissingToken {
            expected: close,
            found: self.peek().clone(),
            loc: self.current_loc(),
        })
    }

    /// `open` at `opened_at` was never closed; reported at the current token
    pub fn unclosed(&self, open: Token, opened_at: &Location) -> ParseError {
        ParseError::Unclosed {
            delimiter: open,
            opened_at: opened_at.clone(),
            found: self.peek().clone(),
            loc: self.current_loc(),
        }
    }

    /// Create an error for unexpected token at current position
    pub fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, self.peek().clone(), self.current_loc())
    }

    /// Consume a lowercase identifier
    pub fn expect_ident(&mut self) -> ParseResult<Ident> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Consume an uppercase-leading name
    pub fn expect_upper_ident(&mut self, what: &str) -> ParseResult<Ident> {
        match self.peek().clone() {
            Token::UpperIdent(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// Consume a name of either case
    pub fn expect_any_ident(&mut self) -> ParseResult<Ident> {
        match self.peek().clone() {
            Token::Ident(name) | Token::UpperIdent(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("name")),
        }
    }

    /// Consume a string literal
    pub fn expect_string(&mut self, what: &str) -> ParseResult<String> {
        match self.peek().clone() {
            Token::String(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    // ========================================================================
    // Closing angle brackets
    // ========================================================================

    /// Split a compound token that begins with `>` so a generic argument list
    /// can close on it: `>>` becomes `>` `>` and `>=` becomes `>` `=`.
    ///
    /// The first half keeps the original location, the second half sits one
    /// column to the right. Returns whether a split happened.
    pub fn split_closing_angle(&mut self) -> bool {
        let rest = match self.peek() {
            Token::GtGt => Token::Gt,
            Token::GtEq => Token::Eq,
            _ => return false,
        };
        let original = self.tokens[self.pos].clone();
        let second = SpannedToken {
            token: rest,
            loc: original.loc.shifted(1),
        };
        self.tokens[self.pos] = SpannedToken {
            token: Token::Gt,
            loc: original.loc.clone(),
        };
        self.tokens.insert(self.pos + 1, second);
        self.splits.push(Split {
            index: self.pos,
            original,
        });
        true
    }

    // ========================================================================
    // Nesting depth
    // ========================================================================

    /// Enter one level of nesting, failing once the configured limit is reached
    pub fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                loc: self.current_loc(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of nesting
    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    // ========================================================================
    // Token predicates
    // ========================================================================

    pub fn is_ident(&self) -> bool {
        matches!(self.peek(), Token::Ident(_))
    }

    pub fn is_upper_ident(&self) -> bool {
        matches!(self.peek(), Token::UpperIdent(_))
    }

    /// Check if the token `n` positions ahead could start a pattern
    pub fn is_pattern_start_at(&self, n: usize) -> bool {
        match self.peek_nth(n) {
            Token::Ident(_)
            | Token::UpperIdent(_)
            | Token::Underscore
            | Token::Int(_)
            | Token::Float(_)
            | Token::String(_)
            | Token::True
            | Token::False
            | Token::Null
            | Token::LParen
            | Token::LBrace
            | Token::LBracket => true,
            Token::Minus => matches!(self.peek_nth(n + 1), Token::Int(_) | Token::Float(_)),
            _ => false,
        }
    }

    /// Check if the token `n` positions ahead could start a type
    pub fn is_type_start_at(&self, n: usize) -> bool {
        matches!(
            self.peek_nth(n),
            Token::Ident(_) | Token::UpperIdent(_) | Token::LParen | Token::LBrace
        )
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

    #[test]
    fn test_basic_navigation() {
        let mut c = cursor("let x = 42");
        assert!(c.check(&Token::Let));
        c.advance();
        assert!(matches!(c.peek(), Token::Ident(s) if s == "x"));
        c.advance();
        assert!(c.check(&Token::Eq));
    }

    #[test]
    fn test_lookahead_past_end_is_eof() {
        let c = cursor("a b");
        assert!(matches!(c.peek_nth(1), Token::Ident(s) if s == "b"));
        assert!(matches!(c.peek_nth(2), Token::Eof));
        assert!(matches!(c.peek_nth(100), Token::Eof));
    }

    #[test]
    fn test_advance_at_eof_is_stable() {
        let mut c = cursor("a");
        c.advance();
        assert!(c.is_at_end());
        let at_end = c.checkpoint();
        assert_eq!(c.advance().token, Token::Eof);
        assert_eq!(c.advance().token, Token::Eof);
        assert_eq!(c.checkpoint(), at_end);
    }

    #[test]
    fn test_empty_stream_gets_eof() {
        let mut c = TokenCursor::new(Vec::new());
        assert!(c.is_at_end());
        assert_eq!(c.advance().token, Token::Eof);
    }

    #[test]
    fn test_match_and_consume() {
        let mut c = cursor("let x");
        assert!(c.match_token(&Token::Let));
        assert!(!c.match_token(&Token::Let));
        assert!(c.consume(Token::Ident("x".to_string())).is_ok());
    }

    #[test]
    fn test_consume_error_anchors_at_current_token() {
        let mut c = cursor("let\n  x");
        c.advance();
        let err = c.consume(Token::Eq).unwrap_err();
        assert!(matches!(err, ParseError::MissingToken { expected: Token::Eq, .. }));
        assert_eq!(err.loc().line, 2);
        assert_eq!(err.loc().column, 3);
    }

    #[test]
    fn test_expect_closing_reports_unclosed_at_eof() {
        let mut c = cursor("(a");
        let open = c.current_loc();
        c.advance();
        c.advance();
        let err = c.expect_closing(Token::LParen, &open).unwrap_err();
        assert!(matches!(err, ParseError::Unclosed { delimiter: Token::LParen, .. }));
    }

    #[test]
    fn test_checkpoint_rewind() {
        let mut c = cursor("a b c");
        let saved = c.checkpoint();
        c.advance();
        c.advance();
        assert!(matches!(c.peek(), Token::Ident(s) if s == "c"));
        c.rewind(saved);
        assert!(matches!(c.peek(), Token::Ident(s) if s == "a"));
    }

    #[test]
    fn test_split_closing_angle() {
        let mut c = cursor(">> x");
        let loc = c.current_loc();
        assert!(c.split_closing_angle());
        assert_eq!(c.peek(), &Token::Gt);
        assert_eq!(c.peek_nth(1), &Token::Gt);
        assert_eq!(c.current_loc(), loc);
        c.advance();
        assert_eq!(c.current_loc().column, loc.column + 1);
    }

    #[test]
    fn test_rewind_undoes_split() {
        let mut c = cursor("a >> b");
        let saved = c.checkpoint();
        c.advance();
        assert!(c.split_closing_angle());
        assert_eq!(c.token_count(), 5);
        c.rewind(saved);
        assert_eq!(c.token_count(), 4);
        c.advance();
        assert_eq!(c.peek(), &Token::GtGt);
    }

    #[test]
    fn test_split_greater_equal() {
        let mut c = cursor(">= 1");
        assert!(c.split_closing_angle());
        assert_eq!(c.peek(), &Token::Gt);
        assert_eq!(c.peek_nth(1), &Token::Eq);
    }

    #[test]
    fn test_depth_limit() {
        let mut c = cursor("x").with_max_depth(2);
        assert!(c.descend().is_ok());
        assert!(c.descend().is_ok());
        let err = c.descend().unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { limit: 2, .. }));
        c.ascend();
        assert_eq!(c.depth(), 1);
        assert!(c.descend().is_ok());
    }

    #[test]
    fn test_pattern_start_predicate() {
        let c = cursor("| -1 | x");
        assert!(!c.is_pattern_start_at(0));
        assert!(c.is_pattern_start_at(1));
        assert!(c.is_pattern_start_at(4));
    }
}
