//! Generic parsing combinators for reusable parsing patterns

use tracing::trace;

use crate::lexer::Token;

use super::cursor::TokenCursor;
use super::error::ParseResult;

/// Extension trait providing combinator methods over anything that owns a
/// `TokenCursor`. Implemented by the cursor itself and by the expression parser.
pub trait Combinators: Sized {
    /// The underlying token cursor
    fn tokens(&mut self) -> &mut TokenCursor;

    /// Parse a separated list of items: item (sep item)*
    /// Returns the items as a Vec; an immediately present terminator yields
    /// an empty list. The terminator itself is not consumed.
    fn separated_list<T, F>(
        &mut self,
        mut parse_item: F,
        separator: &Token,
        allow_trailing: bool,
        terminator: &Token,
    ) -> ParseResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> ParseResult<T>,
    {
        let mut items = Vec::new();

        if self.tokens().check(terminator) {
            return Ok(items);
        }

        items.push(parse_item(self)?);

        while self.tokens().match_token(separator) {
            if self.tokens().check(terminator) {
                if allow_trailing {
                    break;
                }
                return Err(self.tokens().unexpected("item after separator"));
            }
            items.push(parse_item(self)?);
        }

        Ok(items)
    }

    /// Parse a delimited list: open item (sep item)* [sep] close.
    /// Running out of input before the closer reports the opener as unclosed.
    fn delimited_list<T, F>(
        &mut self,
        open: Token,
        close: Token,
        parse_item: F,
        separator: &Token,
    ) -> ParseResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> ParseResult<T>,
    {
        let opened_at = self.tokens().current_loc();
        self.tokens().consume(open.clone())?;
        let items = self.separated_list(parse_item, separator, true, &close)?;
        self.tokens().expect_closing(open, &opened_at)?;
        Ok(items)
    }

    /// Parse an optional item based on a condition
    fn optional<T, F, P>(&mut self, parse_item: F, condition: P) -> ParseResult<Option<T>>
    where
        F: FnOnce(&mut Self) -> ParseResult<T>,
        P: Fn(&TokenCursor) -> bool,
    {
        if condition(self.tokens()) {
            Ok(Some(parse_item(self)?))
        } else {
            Ok(None)
        }
    }

    /// Run a parse one nesting level deeper. The depth counter is restored
    /// whether or not the inner parse succeeds.
    fn nested<T, F>(&mut self, parse: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Self) -> ParseResult<T>,
    {
        self.tokens().descend()?;
        let result = parse(self);
        self.tokens().ascend();
        result
    }

    /// Try a parse, rewinding the cursor to where it started if it fails.
    fn speculate<T, F>(&mut self, parse: F) -> Option<T>
    where
        F: FnOnce(&mut Self) -> ParseResult<T>,
    {
        let checkpoint = self.tokens().checkpoint();
        let depth = self.tokens().depth();
        match parse(self) {
            Ok(value) => Some(value),
            Err(err) => {
                trace!(error = %err, "speculative parse rolled back");
                self.tokens().rewind(checkpoint);
                debug_assert_eq!(self.tokens().depth(), depth);
                None
            }
        }
    }
}

impl Combinators for TokenCursor {
    fn tokens(&mut self) -> &mut TokenCursor {
        self
    }
}
