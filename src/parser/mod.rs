//! Recursive descent parser for schist
//!
//! Turns the token stream produced by the lexer into a [`Module`]. Binary
//! operators are handled by precedence climbing over the table in
//! `crate::operators`; everything else is plain recursive descent with
//! bounded lookahead and a few checkpointed trial parses.
//!
//! # Module Structure
//!
//! - `cursor` - Token stream navigation, lookahead and checkpoints
//! - `combinators` - Reusable parsing patterns and the nesting-depth scope
//! - `error` - Error types with source location tracking
//! - `types` - Type expression parsing
//! - `pattern` - Pattern parsing
//! - `record` - Record field parsing for record types and patterns
//! - `expr` - Expression parsing
//! - `decl` - Declaration parsing

pub mod combinators;
pub mod cursor;
pub mod decl;
pub mod error;
pub mod expr;
pub mod pattern;
pub mod record;
pub mod types;

// Re-export main types for convenience
pub use cursor::{Checkpoint, TokenCursor, DEFAULT_MAX_DEPTH};
pub use error::{ParseError, ParseResult};

use tracing::{debug, trace};

use crate::ast::*;
use crate::errors::find_similar;
use crate::lexer::{SpannedToken, Token};

use combinators::Combinators;
use pattern::PatternParser;
use types::TypeParser;

/// Keywords that can begin a top-level declaration
const DECLARATION_KEYWORDS: [&str; 5] = ["let", "type", "external", "import", "export"];

/// What expression forms are allowed in the current parsing context.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExprContext {
    /// Full language, including lambdas.
    /// Used for: declaration values, lambda and case bodies, arguments
    Full,
    /// No lambdas in the operator chain, so in `when ok =>` and
    /// `when (n > 0) =>` the `=>` is the case arrow.
    /// Used for: match guards
    Guard,
}

impl ExprContext {
    fn allows_lambda(self) -> bool {
        matches!(self, ExprContext::Full)
    }
}

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of expressions, patterns and types before the parser
    /// gives up with `NestingTooDeep`
    pub max_depth: usize,
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The schist parser
pub struct Parser {
    cursor: TokenCursor,
    context: ExprContext,
}

impl Combinators for Parser {
    fn tokens(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }
}

impl Parser {
    /// Create a new parser from a token stream
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(tokens: Vec<SpannedToken>, config: ParserConfig) -> Self {
        Self {
            cursor: TokenCursor::new(tokens).with_max_depth(config.max_depth),
            context: ExprContext::Full,
        }
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Parse a whole module, stopping at the first error
    pub fn parse_module(&mut self) -> ParseResult<Module> {
        let loc = self.cursor.current_loc();
        debug!(tokens = self.cursor.token_count(), file = %loc.file, "parsing module");

        let mut declarations = Vec::new();
        while !self.cursor.is_at_end() {
            declarations.push(self.parse_terminated_declaration()?);
        }

        debug!(declarations = declarations.len(), "parsed module");
        Ok(partition_imports(declarations, loc))
    }

    /// Parse a whole module, collecting every declaration-level error.
    ///
    /// After a failed declaration the parser skips ahead to the next
    /// declaration keyword or past the next `;` and carries on. The module
    /// holds every declaration that parsed cleanly.
    pub fn parse_module_recovering(&mut self) -> (Module, Vec<ParseError>) {
        let loc = self.cursor.current_loc();
        debug!(tokens = self.cursor.token_count(), file = %loc.file, "parsing module with recovery");

        let mut declarations = Vec::new();
        let mut errors = Vec::new();
        while !self.cursor.is_at_end() {
            let start = self.cursor.checkpoint();
            match self.parse_terminated_declaration() {
                Ok(decl) => declarations.push(decl),
                Err(err) => {
                    errors.push(err);
                    self.synchronize(start);
                }
            }
        }

        debug!(
            declarations = declarations.len(),
            errors = errors.len(),
            "parsed module with recovery"
        );
        (partition_imports(declarations, loc), errors)
    }

    /// Parse a standalone expression spanning the whole token stream
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr()?;
        self.expect_end()?;
        Ok(expr)
    }

    /// Parse a standalone pattern spanning the whole token stream
    pub fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        let pattern = self.cursor.parse_pattern()?;
        self.expect_end()?;
        Ok(pattern)
    }

    /// Parse a standalone type expression spanning the whole token stream
    pub fn parse_type_expression(&mut self) -> ParseResult<TypeExpr> {
        let type_expr = self.cursor.parse_type_expr()?;
        self.expect_end()?;
        Ok(type_expr)
    }

    // ========================================================================
    // Module driver
    // ========================================================================

    /// A declaration followed by its mandatory `;`
    fn parse_terminated_declaration(&mut self) -> ParseResult<Declaration> {
        let decl = self.parse_declaration()?;
        if !self.cursor.match_token(&Token::Semicolon) {
            return Err(ParseError::invalid_with_hint(
                format!("expected `;` after declaration, found {}", self.cursor.peek()),
                "every top-level declaration ends with `;`",
                self.cursor.current_loc(),
            ));
        }
        trace!(loc = %decl.loc, "parsed declaration");
        Ok(decl)
    }

    fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        match self.cursor.peek().clone() {
            Token::Let => self.parse_let_decl(false),
            Token::Type => self.parse_type_decl(false),
            Token::External => self.parse_external_decl(false),
            Token::Import => self.parse_import_decl(),
            Token::Export => self.parse_export_decl(),
            Token::Ident(word) => {
                let similar = find_similar(&word, DECLARATION_KEYWORDS, 2);
                let err = self.cursor.unexpected("declaration");
                match similar.first() {
                    Some(keyword) => Err(ParseError::invalid_with_hint(
                        err.message(),
                        format!("did you mean `{}`?", keyword),
                        err.loc().clone(),
                    )),
                    None => Err(err),
                }
            }
            _ => Err(self.cursor.unexpected("declaration")),
        }
    }

    /// Skip to a point where parsing can resume after an error: just past a
    /// `;`, or at a declaration keyword. Scanning restarts at `start`, taken at
    /// the first token of the failed declaration, and only stops outside braces,
    /// so `let` and `;` inside a block are passed over.
    fn synchronize(&mut self, start: Checkpoint) {
        let error_loc = self.cursor.current_loc();
        self.cursor.rewind(start);
        self.cursor.advance();

        let mut braces = 0usize;
        while !self.cursor.is_at_end() {
            let token = self.cursor.peek().clone();
            if braces == 0 && is_declaration_start(&token) {
                break;
            }
            match token {
                Token::LBrace => braces += 1,
                Token::RBrace => braces = braces.saturating_sub(1),
                Token::Semicolon if braces == 0 => {
                    self.cursor.advance();
                    break;
                }
                _ => {}
            }
            self.cursor.advance();
        }
        debug!(
            loc = %error_loc,
            resume = %self.cursor.current_loc(),
            "resynchronized after parse error"
        );
    }

    fn expect_end(&self) -> ParseResult<()> {
        if self.cursor.is_at_end() {
            Ok(())
        } else {
            Err(self.cursor.unexpected("end of input"))
        }
    }
}

fn is_declaration_start(token: &Token) -> bool {
    matches!(
        token,
        Token::Let | Token::Type | Token::External | Token::Import | Token::Export
    )
}

/// Split imports from the rest, keeping source order within each group
fn partition_imports(declarations: Vec<Declaration>, loc: Location) -> Module {
    let (imports, declarations) = declarations
        .into_iter()
        .partition(|decl| decl.node.is_import());
    Module {
        imports,
        declarations,
        loc,
    }
}
