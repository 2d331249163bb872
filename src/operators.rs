//! Operator precedence and associativity for the binary tiers of the expression grammar.
//!
//! The table is closed: every infix operator is produced by exactly one token.
//! Levels, loosest to tightest:
//!
//! | level | operators            | assoc |
//! |-------|----------------------|-------|
//! | 1     | `|>`                 | left  |
//! | 2     | `:=`                 | right |
//! | 3     | `||` `>>` `<<`       | left  |
//! | 4     | `&&`                 | left  |
//! | 5     | `==` `!=`            | left  |
//! | 6     | `<` `<=` `>` `>=`    | left  |
//! | 7     | `::`                 | right |
//! | 8     | `&` `+` `-`          | left  |
//! | 9     | `*` `/` `%`          | left  |
//!
//! Unary prefix and postfix operators bind tighter than all of these and are
//! handled directly by the expression parser.

use crate::ast::BinOp;
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// An infix operator: `|>` builds a `Pipe` node, everything else a `BinOp`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Pipe,
    Binary(BinOp),
}

/// Information about an operator's fixity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpInfo {
    /// Precedence level (higher binds tighter)
    pub precedence: u8,
    pub assoc: Associativity,
}

impl OpInfo {
    const fn left(precedence: u8) -> Self {
        Self {
            precedence,
            assoc: Associativity::Left,
        }
    }

    const fn right(precedence: u8) -> Self {
        Self {
            precedence,
            assoc: Associativity::Right,
        }
    }

    /// Minimum precedence for the right operand
    pub fn next_min(self) -> u8 {
        match self.assoc {
            Associativity::Left => self.precedence + 1,
            Associativity::Right => self.precedence,
        }
    }
}

/// Look up the infix operator a token denotes, if any
pub fn infix(token: &Token) -> Option<(InfixOp, OpInfo)> {
    use BinOp::*;

    let entry = match token {
        Token::PipeGt => (InfixOp::Pipe, OpInfo::left(1)),
        Token::ColonEq => (InfixOp::Binary(RefAssign), OpInfo::right(2)),
        Token::OrOr => (InfixOp::Binary(LogicalOr), OpInfo::left(3)),
        Token::GtGt => (InfixOp::Binary(ForwardCompose), OpInfo::left(3)),
        Token::LtLt => (InfixOp::Binary(BackwardCompose), OpInfo::left(3)),
        Token::AndAnd => (InfixOp::Binary(LogicalAnd), OpInfo::left(4)),
        Token::EqEq => (InfixOp::Binary(Equal), OpInfo::left(5)),
        Token::NotEq => (InfixOp::Binary(NotEqual), OpInfo::left(5)),
        Token::Lt => (InfixOp::Binary(LessThan), OpInfo::left(6)),
        Token::LtEq => (InfixOp::Binary(LessEqual), OpInfo::left(6)),
        Token::Gt => (InfixOp::Binary(GreaterThan), OpInfo::left(6)),
        Token::GtEq => (InfixOp::Binary(GreaterEqual), OpInfo::left(6)),
        Token::Cons => (InfixOp::Binary(Cons), OpInfo::right(7)),
        Token::Amp => (InfixOp::Binary(Concat), OpInfo::left(8)),
        Token::Plus => (InfixOp::Binary(Add), OpInfo::left(8)),
        Token::Minus => (InfixOp::Binary(Subtract), OpInfo::left(8)),
        Token::Star => (InfixOp::Binary(Multiply), OpInfo::left(9)),
        Token::Slash => (InfixOp::Binary(Divide), OpInfo::left(9)),
        Token::Percent => (InfixOp::Binary(Modulo), OpInfo::left(9)),
        _ => return None,
    };
    Some(entry)
}

/// Whether the token is an infix operator
pub fn is_infix(token: &Token) -> bool {
    infix(token).is_some()
}
