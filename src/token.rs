use std::fmt::{self, Display};

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) literal: String,
    pub(crate) line: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, literal: S, line: usize) -> Self {
        Token { kind, literal: literal.into(), line }
    }

    pub(crate) fn end_of_file(line: usize) -> Self {
        Token::new(TokenKind::EndOfFile, "", line)
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EndOfFile, Illegal,

    Identifier, Integer,

    Equal, Plus, Minus, Bang, Star, Slash,
    Less, Greater, EqualEqual, BangEqual,

    Comma, Semicolon,
    LeftParen, RightParen, LeftBrace, RightBrace,

    Fn, Let, If, Else, Return, True, False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            EndOfFile => "EOF",
            Illegal => "ILLEGAL",
            Identifier => "ident",
            Integer => "int",
            Equal => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Star => "*",
            Slash => "/",
            Less => "<",
            Greater => ">",
            EqualEqual => "==",
            BangEqual => "!=",
            Comma => ",",
            Semicolon => ";",
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            Fn => "fn",
            Let => "let",
            If => "if",
            Else => "else",
            Return => "return",
            True => "true",
            False => "false",
        };
        write!(f, "{}", s)
    }
}
