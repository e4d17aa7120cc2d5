use std::result;
use std::fmt::{self, Display};

use crate::token::{Token, TokenKind};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    Syntactic { token: Token },
    UnterminatedBlock { token: Token },
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn syntactic<S: Into<String>>(token: Token, message: S) -> Error {
        let kind = ErrorKind::Syntactic { token };
        Error { kind, message: message.into() }
    }

    pub fn unterminated_block(token: Token) -> Error {
        let kind = ErrorKind::UnterminatedBlock { token };
        Error { kind, message: "Unexpected end of input inside a block.".into() }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The bare diagnostic, without location information.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnterminatedBlock { .. })
    }

    fn token(&self) -> &Token {
        match self.kind() {
            ErrorKind::Syntactic { token } | ErrorKind::UnterminatedBlock { token } => token,
        }
    }

    fn loc(&self) -> String {
        let token = self.token();
        if token.kind == TokenKind::EndOfFile {
            " at end".to_string()
        } else {
            format!(" at {}", token.literal)
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.token().line, self.loc(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line_and_token() {
        let token = Token::new(TokenKind::Identifier, "foo", 3);
        let e = Error::syntactic(token, "something broke");
        assert_eq!("[line 3] Error at foo: something broke", e.to_string());
        assert_eq!("something broke", e.message());
        assert!(!e.is_fatal());
        assert!(matches!(e.kind(), ErrorKind::Syntactic { token } if token.literal() == "foo"));
    }

    #[test]
    fn display_reports_end_of_input() {
        let e = Error::unterminated_block(Token::end_of_file(7));
        assert_eq!(
            "[line 7] Error at end: Unexpected end of input inside a block.",
            e.to_string()
        );
        assert!(e.is_fatal());
    }
}
