use crate::{
    expr::{self, Expr},
    stmt::{self, Program, Stmt},
};

/// Renders an expression fully parenthesised, e.g. `(a + (b * c))`.
pub fn print(e: &Expr) -> String {
    let mut printer = AstPrinter {};
    e.accept(&mut printer)
}

pub fn print_stmt(s: &Stmt) -> String {
    let mut printer = AstPrinter {};
    s.accept(&mut printer)
}

pub fn print_program(p: &Program) -> String {
    let mut printer = AstPrinter {};
    p.statements.iter()
        .map(|s| s.accept(&mut printer))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn print_function(f: &expr::Function) -> String {
    let mut printer = AstPrinter {};
    expr::Visitor::visit_function_expr(&mut printer, f)
}

struct AstPrinter;

impl AstPrinter {
    fn comma_separated<'a>(&mut self, exprs: impl Iterator<Item = &'a Expr>) -> String {
        exprs.map(|e| e.accept(self))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn block(&mut self, b: &stmt::Block) -> String {
        let mut lines = vec!["{".to_string()];
        lines.extend(b.statements.iter().map(|s| s.accept(self)));
        lines.push("}".to_string());
        lines.join("\n")
    }
}

impl expr::Visitor<String> for AstPrinter {
    fn visit_identifier_expr(&mut self, e: &expr::Identifier) -> String {
        e.name.clone()
    }

    fn visit_integer_expr(&mut self, e: &expr::Integer) -> String {
        e.token.literal.clone()
    }

    fn visit_boolean_expr(&mut self, e: &expr::Boolean) -> String {
        e.value.to_string()
    }

    fn visit_prefix_expr(&mut self, e: &expr::Prefix) -> String {
        format!("({}{})", e.operator, e.right.accept(self))
    }

    fn visit_infix_expr(&mut self, e: &expr::Infix) -> String {
        format!("({} {} {})", e.left.accept(self), e.operator, e.right.accept(self))
    }

    fn visit_if_expr(&mut self, e: &expr::If) -> String {
        let mut s = format!("if {} {}", e.condition.accept(self), self.block(&e.consequence));
        if let Some(alternative) = &e.alternative {
            s.push_str(" else ");
            s.push_str(&self.block(alternative));
        }
        s
    }

    fn visit_function_expr(&mut self, e: &expr::Function) -> String {
        let params = e.parameters.iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("fn({}) {}", params, self.block(&e.body))
    }

    fn visit_call_expr(&mut self, e: &expr::Call) -> String {
        let callee = e.callee.accept(self);
        format!("{}({})", callee, self.comma_separated(e.arguments.iter()))
    }
}

impl stmt::Visitor<String> for AstPrinter {
    fn visit_let_stmt(&mut self, e: &stmt::Let) -> String {
        format!("let {} = {}", e.name.name, e.value.accept(self))
    }

    fn visit_return_stmt(&mut self, e: &stmt::Return) -> String {
        format!("return {}", e.value.accept(self))
    }

    fn visit_expression_stmt(&mut self, e: &stmt::Expression) -> String {
        e.expression.accept(self)
    }

    fn visit_block_stmt(&mut self, e: &stmt::Block) -> String {
        self.block(e)
    }
}
