//! Handwritten lexer for schist

use crate::ast::Location;
use std::fmt;
use std::iter::Peekable;
use std::rc::Rc;
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Float(f64),
    String(String),
    True,
    False,
    Null,

    // Identifiers
    Ident(String),      // lowercase start
    UpperIdent(String), // uppercase start (constructors, types)
    Underscore,         // _

    // Keywords
    Let,
    Mut,
    Rec,
    And,
    Type,
    Match,
    When,
    If,
    Then,
    Else,
    While,
    Unsafe,
    External,
    Import,
    Export,
    From,
    As,

    // Delimiters
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :
    Dot,       // .
    Spread,    // ...

    // Operators
    FatArrow,    // =>
    Arrow,       // ->
    Eq,          // =
    EqEq,        // ==
    NotEq,       // !=
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Percent,     // %
    Amp,         // &
    AndAnd,      // &&
    OrOr,        // ||
    Bang,        // !
    ColonEq,     // :=
    Cons,        // ::
    PipeGt,      // |>
    Pipe,        // |
    GtGt,        // >>
    LtLt,        // <<

    // Special
    Eof,
}

impl Token {
    /// Keyword spelling, if this token is a keyword
    pub fn keyword(&self) -> Option<&'static str> {
        let kw = match self {
            Token::Let => "let",
            Token::Mut => "mut",
            Token::Rec => "rec",
            Token::And => "and",
            Token::Type => "type",
            Token::Match => "match",
            Token::When => "when",
            Token::If => "if",
            Token::Then => "then",
            Token::Else => "else",
            Token::While => "while",
            Token::Unsafe => "unsafe",
            Token::External => "external",
            Token::Import => "import",
            Token::Export => "export",
            Token::From => "from",
            Token::As => "as",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            _ => return None,
        };
        Some(kw)
    }

    /// Source spelling of punctuation and operator tokens
    pub fn symbol(&self) -> Option<&'static str> {
        let sym = match self {
            Token::Underscore => "_",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Dot => ".",
            Token::Spread => "...",
            Token::FatArrow => "=>",
            Token::Arrow => "->",
            Token::Eq => "=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Amp => "&",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Bang => "!",
            Token::ColonEq => ":=",
            Token::Cons => "::",
            Token::PipeGt => "|>",
            Token::Pipe => "|",
            Token::GtGt => ">>",
            Token::LtLt => "<<",
            _ => return None,
        };
        Some(sym)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "integer `{}`", n),
            Token::Float(x) => write!(f, "float `{}`", x),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Ident(name) | Token::UpperIdent(name) => write!(f, "identifier `{}`", name),
            Token::Eof => write!(f, "end of file"),
            other => match (other.keyword(), other.symbol()) {
                (Some(kw), _) => write!(f, "keyword `{}`", kw),
                (_, Some(sym)) => write!(f, "`{}`", sym),
                _ => write!(f, "{:?}", other),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub loc: Location,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character: {0:?}")]
    UnexpectedChar(char, Location),
    #[error("unterminated string")]
    UnterminatedString(Location),
    #[error("unterminated block comment")]
    UnterminatedComment(Location),
    #[error("invalid escape sequence: \\{0}")]
    InvalidEscape(char, Location),
    #[error("invalid number: {0}")]
    InvalidNumber(String, Location),
}

impl LexError {
    /// Get the source location where this error occurred
    pub fn loc(&self) -> &Location {
        match self {
            LexError::UnexpectedChar(_, loc) => loc,
            LexError::UnterminatedString(loc) => loc,
            LexError::UnterminatedComment(loc) => loc,
            LexError::InvalidEscape(_, loc) => loc,
            LexError::InvalidNumber(_, loc) => loc,
        }
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    file: Rc<str>,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, filename: &str) -> Self {
        Self {
            chars: input.chars().peekable(),
            file: Rc::from(filename),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.token == Token::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn location(&self) -> Location {
        Location::new(self.file.clone(), self.line, self.column, self.pos)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    /// Consume `expected` if it is the next character
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let start = self.location();
                    self.advance();
                    self.advance();
                    self.skip_block_comment(start)?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self, start: Location) -> Result<(), LexError> {
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some('/') if self.peek() == Some('*') => {
                    self.advance();
                    depth += 1;
                }
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    depth -= 1;
                }
                Some(_) => {}
                None => return Err(LexError::UnterminatedComment(start)),
            }
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        self.skip_trivia()?;

        let loc = self.location();

        let Some(c) = self.advance() else {
            return Ok(SpannedToken {
                token: Token::Eof,
                loc,
            });
        };

        let token = match c {
            // Single-char delimiters
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '_' if !self.peek().map_or(false, is_ident_continue) => Token::Underscore,
            '.' => {
                if self.peek() == Some('.') && self.peek_second() == Some('.') {
                    self.advance();
                    self.advance();
                    Token::Spread
                } else {
                    Token::Dot
                }
            }

            // Operators that might be multi-char
            ':' => {
                if self.eat(':') {
                    Token::Cons
                } else if self.eat('=') {
                    Token::ColonEq
                } else {
                    Token::Colon
                }
            }
            '=' => {
                if self.eat('=') {
                    Token::EqEq
                } else if self.eat('>') {
                    Token::FatArrow
                } else {
                    Token::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    Token::LtEq
                } else if self.eat('<') {
                    Token::LtLt
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    Token::GtEq
                } else if self.eat('>') {
                    Token::GtGt
                } else {
                    Token::Gt
                }
            }
            '-' => {
                if self.eat('>') {
                    Token::Arrow
                } else {
                    Token::Minus
                }
            }
            '+' => Token::Plus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '&' => {
                if self.eat('&') {
                    Token::AndAnd
                } else {
                    Token::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    Token::OrOr
                } else if self.eat('>') {
                    Token::PipeGt
                } else {
                    Token::Pipe
                }
            }

            '"' => self.lex_string(&loc)?,

            c if c.is_ascii_digit() => self.lex_number(c, &loc)?,

            // Identifier or keyword
            c if c.is_alphabetic() || c == '_' => self.lex_ident(c),

            _ => return Err(LexError::UnexpectedChar(c, loc)),
        };

        Ok(SpannedToken { token, loc })
    }

    fn lex_string(&mut self, start: &Location) -> Result<Token, LexError> {
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(c) => return Err(LexError::InvalidEscape(c, self.location())),
                        None => return Err(LexError::UnterminatedString(start.clone())),
                    };
                    s.push(escaped);
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString(start.clone())),
            }
        }
        Ok(Token::String(s))
    }

    fn lex_number(&mut self, first: char, start: &Location) -> Result<Token, LexError> {
        let mut s = String::new();
        s.push(first);
        self.take_digits(&mut s);

        let mut is_float = false;

        // `1.5` is a float, `1.foo` is field access on an int
        if self.peek() == Some('.') && self.peek_second().map_or(false, |c| c.is_ascii_digit()) {
            is_float = true;
            s.push('.');
            self.advance();
            self.take_digits(&mut s);
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut ahead = self.chars.clone();
            ahead.next();
            let exponent_follows = match ahead.next() {
                Some('+') | Some('-') => ahead.next().map_or(false, |c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if exponent_follows {
                is_float = true;
                s.push('e');
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    s.push(sign);
                    self.advance();
                }
                self.take_digits(&mut s);
            }
        }

        if is_float {
            let f: f64 = s
                .parse()
                .map_err(|_| LexError::InvalidNumber(s.clone(), start.clone()))?;
            return Ok(Token::Float(f));
        }

        let n: i64 = s
            .parse()
            .map_err(|_| LexError::InvalidNumber(s.clone(), start.clone()))?;
        Ok(Token::Int(n))
    }

    fn take_digits(&mut self, s: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn lex_ident(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);

        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match s.as_str() {
            "let" => Token::Let,
            "mut" => Token::Mut,
            "rec" => Token::Rec,
            "and" => Token::And,
            "type" => Token::Type,
            "match" => Token::Match,
            "when" => Token::When,
            "if" => Token::If,
            "then" => Token::Then,
            "else" => Token::Else,
            "while" => Token::While,
            "unsafe" => Token::Unsafe,
            "external" => Token::External,
            "import" => Token::Import,
            "export" => Token::Export,
            "from" => Token::From,
            "as" => Token::As,
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            _ => {
                if first.is_uppercase() {
                    Token::UpperIdent(s)
                } else {
                    Token::Ident(s)
                }
            }
        }
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input, "test.sch")
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_basic() {
        assert_eq!(
            tokens("let x = 42;"),
            vec![
                Token::Let,
                Token::Ident("x".into()),
                Token::Eq,
                Token::Int(42),
                Token::Semicolon,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("x |> f >> g := a :: b"),
            vec![
                Token::Ident("x".into()),
                Token::PipeGt,
                Token::Ident("f".into()),
                Token::GtGt,
                Token::Ident("g".into()),
                Token::ColonEq,
                Token::Ident("a".into()),
                Token::Cons,
                Token::Ident("b".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_nested_generic_closes_as_one_token() {
        let toks = tokens("Option<List<Int>>");
        assert_eq!(toks[toks.len() - 2], Token::GtGt);
    }

    #[test]
    fn test_spread_and_dot() {
        assert_eq!(
            tokens("...r.x"),
            vec![
                Token::Spread,
                Token::Ident("r".into()),
                Token::Dot,
                Token::Ident("x".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            tokens("x // comment\n/* block /* nested */ */ y"),
            vec![Token::Ident("x".into()), Token::Ident("y".into()), Token::Eof]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("/* open", "t.sch").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment(_)));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1 2.5 1e3 1.foo"),
            vec![
                Token::Int(1),
                Token::Float(2.5),
                Token::Float(1000.0),
                Token::Int(1),
                Token::Dot,
                Token::Ident("foo".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#""a\n\"b\"""#),
            vec![Token::String("a\n\"b\"".into()), Token::Eof]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            tokens("let mut rec and Some _ _x"),
            vec![
                Token::Let,
                Token::Mut,
                Token::Rec,
                Token::And,
                Token::UpperIdent("Some".into()),
                Token::Underscore,
                Token::Ident("_x".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_locations() {
        let toks = Lexer::new("let\n  x", "loc.sch").tokenize().unwrap();
        assert_eq!((toks[0].loc.line, toks[0].loc.column), (1, 1));
        assert_eq!((toks[1].loc.line, toks[1].loc.column), (2, 3));
        assert_eq!(toks[1].loc.offset, 6);
        assert_eq!(&*toks[1].loc.file, "loc.sch");
    }

    #[test]
    fn test_unexpected_char() {
        let err = Lexer::new("let x = @", "t.sch").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar('@', _)));
        assert_eq!(err.loc().column, 9);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::RParen.to_string(), "`)`");
        assert_eq!(Token::Let.to_string(), "keyword `let`");
        assert_eq!(Token::Ident("x".into()).to_string(), "identifier `x`");
        assert_eq!(Token::Eof.to_string(), "end of file");
    }
}
