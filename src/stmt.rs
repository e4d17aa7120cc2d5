use std::fmt::{self, Display};

use astgen::generate_ast;
use crate::{
    expr::{self, Expr},
    printer,
    token::Token,
};

generate_ast!(
    Stmt { token: Token },
    [
        Let        => { name: expr::Identifier, value: Expr };
        Return     => { value: Expr };
        Expression => { expression: Expr };
        Block      => { statements: Vec<Stmt> };
    ]
);

impl Stmt {
    pub fn token_literal(&self) -> &str {
        self.token().literal()
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::print_stmt(self))
    }
}

/// The root of a parse: every top-level statement, in source order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub(crate) statements: Vec<Stmt>,
}

impl Program {
    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    pub fn token_literal(&self) -> &str {
        self.statements.first()
            .map(|s| s.token_literal())
            .unwrap_or("")
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::print_program(self))
    }
}
