use crate::token::{Token, TokenKind};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::str::Chars;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "fn" => TokenKind::Fn,
    "if" => TokenKind::If,
    "let" => TokenKind::Let,
    "return" => TokenKind::Return,
    "true" => TokenKind::True,
};

/// Pull-based token source. Yields a single `EndOfFile` token once the
/// input is exhausted and `None` after that.
pub struct Scanner<'a> {
    src: PeekMoreIterator<Chars<'a>>,
    lexeme_buffer: String,
    line: usize,
    finished: bool,
}

impl <'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished { return None }

        self.skip_whitespace();

        let kind = match self.next_token_kind() {
            Some(kind) => kind,
            None => {
                self.finished = true;
                return Some(Token::end_of_file(self.line))
            },
        };

        let literal = self.lexeme_buffer.clone();
        self.lexeme_buffer.clear();

        Some(Token::new(kind, literal, self.line))
    }
}

impl <'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.chars().peekmore(),
            lexeme_buffer: String::new(),
            line: 1,
            finished: false,
        }
    }

    pub fn scan_tokens(self) -> Vec<Token> {
        self.collect()
    }

    fn next_token_kind(&mut self) -> Option<TokenKind> {
        let next_char = self.src.next()?;
        self.lexeme_buffer.push(next_char);

        use TokenKind::*;
        Some(match next_char {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            ';' => Semicolon,
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => Slash,
            '<' => Less,
            '>' => Greater,
            '!' => if self.does_next_match('=') { BangEqual } else { Bang },
            '=' => if self.does_next_match('=') { EqualEqual } else { Equal },
            c if c.is_ascii_digit() => {
                self.advance_while(|n| n.is_ascii_digit());
                Integer
            },
            c if can_start_identifier(&c) => self.extract_identifier(),
            _ => Illegal,
        })
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.src.peek() {
            match c {
                '\n' => self.line += 1,
                ' ' | '\r' | '\t' => {},
                _ => break,
            }
            self.src.next();
        }
    }

    fn does_next_match(&mut self, c: char) -> bool {
        match self.src.peek() {
            Some(&next) if c == next => {
                self.src.next();
                self.lexeme_buffer.push(next);
                true
            }
            _ => false,
        }
    }

    fn extract_identifier(&mut self) -> TokenKind {
        self.advance_while(is_part_of_valid_identifier);

        match KEYWORDS.get(self.lexeme_buffer.as_str()) {
            Some(kind) => *kind,
            None => TokenKind::Identifier,
        }
    }

    fn advance_while(&mut self, should_continue: impl Fn(&char) -> bool) {
        while let Some(next) = self.src.peek() {
            if !should_continue(next) { break }
            let next = *next;
            self.src.next();
            self.lexeme_buffer.push(next);
        }
    }
}

fn can_start_identifier(c: &char) -> bool {
    c.is_ascii_alphabetic() || c == &'_'
}

fn is_part_of_valid_identifier(c: &char) -> bool {
    can_start_identifier(c) || c.is_ascii_digit()
}
