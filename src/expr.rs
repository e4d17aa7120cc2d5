use std::{fmt::{self, Display}, rc::Rc};

use crate::{
    printer,
    stmt,
    token::{Token, TokenKind},
};
use astgen::generate_ast;

generate_ast!(
    Expr { token: Token },
    [
        Identifier => { name: String };
        Integer    => { value: i64 };
        Boolean    => { value: bool };
        Prefix     => { operator: TokenKind, right: Box<Expr> };
        Infix      => { left: Box<Expr>, operator: TokenKind, right: Box<Expr> };
        If         => { condition: Box<Expr>, consequence: stmt::Block, alternative: Option<stmt::Block> };
        Function   => { parameters: Vec<Identifier>, body: Rc<stmt::Block> };
        Call       => { callee: Box<Expr>, arguments: Vec<Expr> };
    ]
);

impl Expr {
    pub fn token_literal(&self) -> &str {
        self.token().literal()
    }
}

impl Identifier {
    pub(crate) fn from_token(token: Token) -> Self {
        let name = token.literal.clone();
        Identifier { token, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::print(self))
    }
}
