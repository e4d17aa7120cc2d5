use std::{mem, rc::Rc};

use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    expr::{self, Expr},
    stmt::{self, Program, Stmt},
    token::*,
};

const EQUALITY_TOKENS: &[TokenKind] = &[
    TokenKind::EqualEqual,
    TokenKind::BangEqual,
];

const COMPARISON_TOKENS: &[TokenKind] = &[
    TokenKind::Less,
    TokenKind::Greater,
];

const TERM_TOKENS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
];

const FACTOR_TOKENS: &[TokenKind] = &[
    TokenKind::Star,
    TokenKind::Slash,
];

const CALL_TOKENS: &[TokenKind] = &[
    TokenKind::LeftParen,
];

/// Binding power of an operator, weakest first.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

const PRECEDENCES: &[(Precedence, &[TokenKind])] = &[
    (Precedence::Equals, EQUALITY_TOKENS),
    (Precedence::LessGreater, COMPARISON_TOKENS),
    (Precedence::Sum, TERM_TOKENS),
    (Precedence::Product, FACTOR_TOKENS),
    (Precedence::Call, CALL_TOKENS),
];

fn precedence_of(kind: &TokenKind) -> Precedence {
    PRECEDENCES.iter()
        .find(|(_, kinds)| kinds.contains(kind))
        .map(|(precedence, _)| *precedence)
        .unwrap_or(Precedence::Lowest)
}

type PrefixParseFn<T> = fn(&mut Parser<T>) -> Result<Expr>;
type InfixParseFn<T> = fn(&mut Parser<T>, Expr) -> Result<Expr>;

/// Pratt parser over a pull-based token source.
///
/// Every parse function starts with `current` on the first token of its
/// construct and leaves `current` on the construct's last token.
pub struct Parser<T> {
    tokens: T,
    current: Token,
    peek: Token,
    errors: Vec<Error>,
}

impl <T: Iterator<Item = Token>> Parser<T> {
    pub fn new(tokens: T) -> Self {
        let mut parser = Parser {
            tokens,
            current: Token::end_of_file(1),
            peek: Token::end_of_file(1),
            errors: Vec::new(),
        };
        parser.next_token();
        parser.next_token();
        parser
    }

    /// Parses every statement in the token stream.
    ///
    /// Malformed statements are recorded in [`Parser::errors`] and skipped.
    /// The only `Err` is an end of input inside an open block.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.current_is(&TokenKind::EndOfFile) {
            match self.declaration()? {
                Some(statement) => statements.push(statement),
                // A stray `}` can never start a statement at the top level.
                None if self.current_is(&TokenKind::RightBrace) => self.next_token(),
                None => {},
            }
        }

        Ok(Program { statements })
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Parses one statement and moves past it. On a syntax error the error is
    /// recorded and `current` is left on the first token of the next statement.
    fn declaration(&mut self) -> Result<Option<Stmt>> {
        match self.statement() {
            Ok(statement) => {
                self.next_token();
                Ok(Some(statement))
            },
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!(error = %e, "recording syntax error");
                self.errors.push(e);
                self.synchronise();
                Ok(None)
            },
        }
    }

    fn statement(&mut self) -> Result<Stmt> {
        trace!(kind = %self.current.kind, literal = %self.current.literal, "statement");
        match self.current.kind {
            TokenKind::Let => self.let_statement(),
            TokenKind::Return => self.return_statement(),
            _ => self.expression_statement(),
        }
    }

    fn let_statement(&mut self) -> Result<Stmt> {
        let token = self.current.clone();

        self.expect_peek(&TokenKind::Identifier)?;
        let name = expr::Identifier::from_token(self.current.clone());

        self.expect_peek(&TokenKind::Equal)?;
        self.next_token();

        let value = self.expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Stmt::new_let(token, name, value))
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let token = self.current.clone();
        self.next_token();

        let value = self.expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Stmt::new_return(token, value))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let token = self.current.clone();
        let expression = self.expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Ok(Stmt::new_expression(token, expression))
    }

    /// Parses statements from `{` up to the matching `}`.
    fn block(&mut self) -> Result<stmt::Block> {
        let token = self.current.clone();
        self.next_token();

        let mut statements = Vec::new();
        while !self.current_is(&TokenKind::RightBrace) {
            if self.current_is(&TokenKind::EndOfFile) {
                return Err(Error::unterminated_block(self.current.clone()))
            }
            if let Some(statement) = self.declaration()? {
                statements.push(statement);
            }
        }

        Ok(stmt::Block { token, statements })
    }

    fn expression(&mut self, precedence: Precedence) -> Result<Expr> {
        let prefix = Self::prefix_parse_fn(&self.current.kind)
            .ok_or_else(|| Error::syntactic(
                self.current.clone(),
                format!("No prefixParse function for {}", self.current.kind),
            ))?;
        let mut left = prefix(self)?;

        while !self.peek_is(&TokenKind::Semicolon) && precedence < precedence_of(&self.peek.kind) {
            let infix = match Self::infix_parse_fn(&self.peek.kind) {
                Some(infix) => infix,
                None => return Ok(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn prefix_parse_fn(kind: &TokenKind) -> Option<PrefixParseFn<T>> {
        use TokenKind::*;
        let parse: PrefixParseFn<T> = match kind {
            Identifier => Self::identifier,
            Integer => Self::integer_literal,
            True | False => Self::boolean_literal,
            Bang | Minus => Self::prefix_expression,
            LeftParen => Self::grouped_expression,
            If => Self::if_expression,
            Fn => Self::function_literal,
            _ => return None,
        };
        Some(parse)
    }

    fn infix_parse_fn(kind: &TokenKind) -> Option<InfixParseFn<T>> {
        use TokenKind::*;
        let parse: InfixParseFn<T> = match kind {
            Plus | Minus | Star | Slash
            | Less | Greater
            | EqualEqual | BangEqual => Self::infix_expression,
            LeftParen => Self::call_expression,
            _ => return None,
        };
        Some(parse)
    }

    fn identifier(&mut self) -> Result<Expr> {
        Ok(Expr::Identifier(expr::Identifier::from_token(self.current.clone())))
    }

    fn integer_literal(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Ok(Expr::new_integer(token, value)),
            Err(_) => {
                let message = format!("{} is not a valid integer", token.literal);
                Err(Error::syntactic(token, message))
            },
        }
    }

    fn boolean_literal(&mut self) -> Result<Expr> {
        let value = self.current_is(&TokenKind::True);
        Ok(Expr::new_boolean(self.current.clone(), value))
    }

    fn prefix_expression(&mut self) -> Result<Expr> {
        let token = self.current.clone();
        self.next_token();
        let right = self.expression(Precedence::Prefix)?;
        Ok(Expr::new_prefix(token.clone(), token.kind, Box::new(right)))
    }

    fn infix_expression(&mut self, left: Expr) -> Result<Expr> {
        let token = self.current.clone();
        let precedence = precedence_of(&token.kind);
        self.next_token();
        let right = self.expression(precedence)?;
        Ok(Expr::new_infix(token.clone(), Box::new(left), token.kind, Box::new(right)))
    }

    fn grouped_expression(&mut self) -> Result<Expr> {
        self.next_token();
        let expression = self.expression(Precedence::Lowest)?;

        if self.peek_is(&TokenKind::RightParen) {
            self.next_token();
            Ok(expression)
        } else {
            Err(Error::syntactic(self.peek.clone(), format!("no ) after {}", expression)))
        }
    }

    fn if_expression(&mut self) -> Result<Expr> {
        let token = self.current.clone();

        self.expect_peek(&TokenKind::LeftParen)?;
        let condition = self.grouped_expression()?;

        self.expect_peek(&TokenKind::LeftBrace)?;
        let consequence = self.block()?;

        let alternative = if self.peek_is(&TokenKind::Else) {
            self.next_token();
            self.expect_peek(&TokenKind::LeftBrace)?;
            Some(self.block()?)
        } else {
            None
        };

        Ok(Expr::new_if(token, Box::new(condition), consequence, alternative))
    }

    fn function_literal(&mut self) -> Result<Expr> {
        let token = self.current.clone();

        self.expect_peek(&TokenKind::LeftParen)?;
        let parameters = self.function_parameters()?;

        self.expect_peek(&TokenKind::LeftBrace)?;
        let body = self.block()?;

        Ok(Expr::new_function(token, parameters, Rc::new(body)))
    }

    fn function_parameters(&mut self) -> Result<Vec<expr::Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(&TokenKind::RightParen) {
            self.next_token();
            return Ok(parameters)
        }

        self.expect_peek(&TokenKind::Identifier)?;
        parameters.push(expr::Identifier::from_token(self.current.clone()));

        while self.peek_is(&TokenKind::Comma) {
            self.next_token();
            self.expect_peek(&TokenKind::Identifier)?;
            parameters.push(expr::Identifier::from_token(self.current.clone()));
        }

        self.expect_peek(&TokenKind::RightParen)?;
        Ok(parameters)
    }

    fn call_expression(&mut self, callee: Expr) -> Result<Expr> {
        let token = self.current.clone();
        let arguments = self.call_arguments()?;
        Ok(Expr::new_call(token, Box::new(callee), arguments))
    }

    fn call_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut arguments = Vec::new();

        if self.peek_is(&TokenKind::RightParen) {
            self.next_token();
            return Ok(arguments)
        }

        self.next_token();
        arguments.push(self.expression(Precedence::Lowest)?);

        while self.peek_is(&TokenKind::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.expression(Precedence::Lowest)?);
        }

        self.expect_peek(&TokenKind::RightParen)?;
        Ok(arguments)
    }

    fn next_token(&mut self) {
        let line = self.peek.line;
        let next = self.tokens.next().unwrap_or_else(|| Token::end_of_file(line));
        self.current = mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        &self.peek.kind == kind
    }

    fn expect_peek(&mut self, kind: &TokenKind) -> Result<()> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(())
        } else {
            let message = format!(
                "expect {}, get {} instead. current token is {}",
                kind, self.peek.literal, self.current.literal,
            );
            Err(Error::syntactic(self.peek.clone(), message))
        }
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_is(&TokenKind::Semicolon) {
            self.next_token();
        }
    }

    /// Skips the remainder of a malformed statement. Stops on a closing
    /// brace or end of input without consuming it, just after a `;`, or on
    /// a token that starts a new statement.
    fn synchronise(&mut self) {
        loop {
            match self.current.kind {
                TokenKind::EndOfFile | TokenKind::RightBrace => return,
                TokenKind::Semicolon => {
                    self.next_token();
                    return
                },
                _ => {},
            }

            self.next_token();

            if let TokenKind::Let | TokenKind::Return = self.current.kind {
                return
            }
        }
    }
}
