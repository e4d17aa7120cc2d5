use std::{
    cell::RefCell,
    mem,
    rc::Rc,
};

use tracing::{debug, warn};

use crate::{
    environment::Environment,
    expr::{self, Expr},
    stmt::{self, Program, Stmt},
    token::TokenKind,
    value::{Function, Value},
};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Hands a `return` straight back up to the caller instead of letting it be
/// used as an operand.
macro_rules! propagate {
    ($value:expr) => {
        match $value {
            signal @ Value::ReturnSignal(_) => return signal,
            value => value,
        }
    };
}

pub struct Interpreter {
    environment: Rc<RefCell<Environment>>,
    depth: usize,
    max_call_depth: usize,
    exhausted: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_environment(Rc::new(RefCell::new(Environment::new())))
    }

    pub fn with_environment(environment: Rc<RefCell<Environment>>) -> Self {
        Interpreter {
            environment,
            depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            exhausted: false,
        }
    }

    /// Caps how deeply calls may nest. The call that would go deeper yields
    /// Null, and so does every later call in the same `interpret` run, even a
    /// shallow one made after the runaway chain has unwound.
    pub fn max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn environment(&self) -> &Rc<RefCell<Environment>> {
        &self.environment
    }

    /// Evaluates every statement of `program` in the global environment and
    /// yields the last value produced. A top-level `return` stops the program
    /// with its operand.
    pub fn interpret(&mut self, program: &Program) -> Value {
        self.depth = 0;
        self.exhausted = false;
        match self.execute_block(&program.statements) {
            Value::ReturnSignal(value) => *value,
            value => value,
        }
    }

    fn execute(&mut self, s: &Stmt) -> Value {
        s.accept(self)
    }

    fn evaluate(&mut self, e: &Expr) -> Value {
        e.accept(self)
    }

    // Signals are passed through untouched; only `interpret` and calls unwrap them.
    fn execute_block(&mut self, statements: &[Stmt]) -> Value {
        let mut result = Value::Null;
        for statement in statements {
            result = self.execute(statement);
            if let Value::ReturnSignal(_) = result {
                break;
            }
        }
        result
    }

    /// Runs `statements` with `environment` as the current scope, restoring
    /// the caller's scope afterwards.
    pub(crate) fn execute_in(&mut self, statements: &[Stmt], environment: Environment) -> Value {
        let previous = mem::replace(&mut self.environment, Rc::new(RefCell::new(environment)));
        let result = self.execute_block(statements);
        self.environment = previous;
        result
    }
}

impl stmt::Visitor<Value> for Interpreter {
    fn visit_let_stmt(&mut self, s: &stmt::Let) -> Value {
        let value = propagate!(self.evaluate(&s.value));
        self.environment.borrow_mut().define(s.name.name(), value);
        Value::Null
    }

    fn visit_return_stmt(&mut self, s: &stmt::Return) -> Value {
        let value = propagate!(self.evaluate(&s.value));
        Value::ReturnSignal(Box::new(value))
    }

    fn visit_expression_stmt(&mut self, s: &stmt::Expression) -> Value {
        self.evaluate(&s.expression)
    }

    fn visit_block_stmt(&mut self, b: &stmt::Block) -> Value {
        self.execute_block(&b.statements)
    }
}

impl expr::Visitor<Value> for Interpreter {
    fn visit_identifier_expr(&mut self, e: &expr::Identifier) -> Value {
        self.environment.borrow()
            .get(&e.name)
            .unwrap_or_else(|| {
                debug!(name = %e.name, line = e.token.line, "unbound identifier");
                Value::Null
            })
    }

    fn visit_integer_expr(&mut self, e: &expr::Integer) -> Value {
        Value::Integer(e.value)
    }

    fn visit_boolean_expr(&mut self, e: &expr::Boolean) -> Value {
        Value::from(e.value)
    }

    fn visit_prefix_expr(&mut self, e: &expr::Prefix) -> Value {
        let right = propagate!(self.evaluate(&e.right));

        match (e.operator, right) {
            (TokenKind::Bang, right) => Value::from(!right.is_true()),
            (TokenKind::Minus, Value::Integer(n)) => n.checked_neg().map_or(Value::Null, Value::Integer),
            _ => Value::Null,
        }
    }

    fn visit_infix_expr(&mut self, e: &expr::Infix) -> Value {
        let left = propagate!(self.evaluate(&e.left));
        let right = propagate!(self.evaluate(&e.right));

        use TokenKind::*;
        match e.operator {
            Plus => compute_if_integers(left, right, i64::checked_add),
            Minus => compute_if_integers(left, right, i64::checked_sub),
            Star => compute_if_integers(left, right, i64::checked_mul),
            // checked_div covers both a zero divisor and MIN / -1.
            Slash => compute_if_integers(left, right, i64::checked_div),
            Less => compute_if_integers(left, right, |l, r| Some(l < r)),
            Greater => compute_if_integers(left, right, |l, r| Some(l > r)),
            EqualEqual => left.is_equal(&right).map_or(Value::Null, Value::from),
            BangEqual => left.is_equal(&right).map_or(Value::Null, |eq| Value::from(!eq)),
            _ => Value::Null,
        }
    }

    fn visit_if_expr(&mut self, e: &expr::If) -> Value {
        let condition = propagate!(self.evaluate(&e.condition));

        if condition.is_true() {
            self.execute_block(&e.consequence.statements)
        } else if let Some(alternative) = &e.alternative {
            self.execute_block(&alternative.statements)
        } else {
            Value::Null
        }
    }

    fn visit_function_expr(&mut self, e: &expr::Function) -> Value {
        let function = Function::new(e.clone(), Rc::clone(&self.environment));
        Value::Function(Rc::new(function))
    }

    fn visit_call_expr(&mut self, e: &expr::Call) -> Value {
        let callee = propagate!(self.evaluate(&e.callee));
        let function = match callee.callable() {
            Some(function) => function,
            None => {
                debug!(callee = %callee, line = e.token.line, "called a {}", callee.type_name());
                return Value::Null;
            }
        };

        // Arguments bind to parameters by position; any past the last
        // parameter are never evaluated.
        let mut args = Vec::with_capacity(function.arity());
        for argument in e.arguments.iter().take(function.arity()) {
            args.push(propagate!(self.evaluate(argument)));
        }

        if self.exhausted {
            return Value::Null;
        }
        if self.depth >= self.max_call_depth {
            warn!(max_call_depth = self.max_call_depth, line = e.token.line, "call depth exceeded");
            self.exhausted = true;
            return Value::Null;
        }

        debug!(depth = self.depth, callee = ?callee, "calling");
        self.depth += 1;
        let result = function.call(self, args);
        self.depth -= 1;
        result
    }
}

fn compute_if_integers<T: Into<Value>>(
    left: Value,
    right: Value,
    f: impl Fn(i64, i64) -> Option<T>,
) -> Value {
    if let Value::Integer(left) = left {
        if let Value::Integer(right) = right {
            return f(left, right).map_or(Value::Null, Into::into);
        }
    }
    Value::Null
}

/// Evaluates `program` against `env`, so bindings made by one program are
/// visible to the next one run against the same environment.
pub fn eval(program: &Program, env: &Rc<RefCell<Environment>>) -> Value {
    Interpreter::with_environment(Rc::clone(env)).interpret(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::Parser, scanner::Scanner};
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Program {
        let mut parser = Parser::new(Scanner::new(src));
        let program = parser.parse_program().expect("no fatal parse error");
        assert!(parser.errors().is_empty(), "unexpected errors: {:?}", parser.errors());
        program
    }

    fn run(src: &str) -> Value {
        Interpreter::new().interpret(&parse(src))
    }

    #[test]
    fn integer_arithmetic() {
        let cases = [
            ("5", 5),
            ("-5", -5),
            ("--5", 5),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("5 - 5 * 5", -20),
            ("(5 - 5) * 5", 0),
            ("50 / 2 * 2 + 10", 60),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ];
        for (src, expected) in cases.iter() {
            assert_eq!(Value::Integer(*expected), run(src), "{}", src);
        }
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(Value::Integer(3), run("7 / 2"));
        assert_eq!(Value::Integer(-3), run("-7 / 2"));
        assert_eq!(Value::Integer(-3), run("7 / -2"));
    }

    #[test]
    fn undefined_arithmetic_is_null() {
        assert_eq!(Value::Null, run("1 / 0"));
        assert_eq!(Value::Null, run("9223372036854775807 + 1"));
        assert_eq!(Value::Null, run("-9223372036854775807 - 1 - 1"));
        assert_eq!(Value::Null, run("(-9223372036854775807 - 1) / -1"));
        assert_eq!(Value::Null, run("-(-9223372036854775807 - 1)"));
    }

    #[test]
    fn boolean_expressions() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("true == true", true),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 > 2) == true", false),
        ];
        for (src, expected) in cases.iter() {
            let value = run(src);
            assert!(matches!(value, Value::Boolean(_)), "{}", src);
            assert_eq!(*expected, value.is_true(), "{}", src);
        }
    }

    #[test]
    fn bang_negates_truthiness() {
        assert_eq!(Value::from(false), run("!true"));
        assert_eq!(Value::from(true), run("!false"));
        assert_eq!(Value::from(true), run("!5"));
        assert_eq!(Value::from(false), run("!!true"));
        assert_eq!(Value::from(false), run("!!5"));
    }

    #[test]
    fn mismatched_operands_are_null() {
        assert_eq!(Value::Null, run("-true"));
        assert_eq!(Value::Null, run("1 + true"));
        assert_eq!(Value::Null, run("true < false"));
        assert_eq!(Value::Null, run("1 == true"));
        assert_eq!(Value::Null, run("fn(x) { x } == 1"));
    }

    #[test]
    fn only_true_takes_the_consequence() {
        assert_eq!(Value::Integer(10), run("if (true) { 10 }"));
        assert_eq!(Value::Null, run("if (false) { 10 }"));
        assert_eq!(Value::Integer(10), run("if (1 + 2) { 5 } else { 10 }"));
        assert_eq!(Value::Integer(10), run("if (1 < 2) { 10 } else { 20 }"));
        assert_eq!(Value::Integer(20), run("if (1 > 2) { 10 } else { 20 }"));
        assert_eq!(Value::Null, run("if (x) { 10 }"));
    }

    #[test]
    fn return_stops_the_program() {
        assert_eq!(Value::Integer(10), run("return 10;"));
        assert_eq!(Value::Integer(10), run("return 10; 9;"));
        assert_eq!(Value::Integer(10), run("9; return 2 * 5; 9;"));
    }

    #[test]
    fn return_escapes_nested_blocks() {
        assert_eq!(Value::Integer(5), run("if (true) { if (true) { return 5; } return 10; }"));
        let src = "let f = fn() { if (true) { if (true) { return 1; } } 2 }; f() + 10";
        assert_eq!(Value::Integer(11), run(src));
    }

    #[test]
    fn return_inside_an_operand_unwinds_the_call() {
        let src = "let f = fn() { 1 + if (true) { return 7; }; 99 }; f()";
        assert_eq!(Value::Integer(7), run(src));
        let src = "let g = fn() { let x = if (true) { return 3; }; x + 1 }; g()";
        assert_eq!(Value::Integer(3), run(src));
    }

    #[test]
    fn let_bindings() {
        assert_eq!(Value::Integer(5), run("let a = 5; a;"));
        assert_eq!(Value::Integer(25), run("let a = 5; let b = a; a * b"));
        assert_eq!(Value::Integer(15), run("let a = 5; let b = a; let c = a + b + 5; c;"));
        assert_eq!(Value::Null, run("let a = 5;"));
        assert_eq!(Value::Null, run("nope"));
    }

    #[test]
    fn functions_apply_and_close_over_their_scope() {
        assert_eq!(Value::Integer(5), run("let identity = fn(x) { x; }; identity(5);"));
        assert_eq!(Value::Integer(10), run("let double = fn(x) { x * 2; }; double(5);"));
        assert_eq!(Value::Integer(20), run("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));"));
        assert_eq!(Value::Integer(5), run("fn(x) { x; }(5)"));

        let src = "let adder = fn(x) { fn(y) { x + y } }; let addTwo = adder(2); addTwo(3)";
        assert_eq!(Value::Integer(5), run(src));
    }

    #[test]
    fn arguments_evaluate_in_the_callers_scope() {
        let src = "let a = fn(x){x + 1}; let b = fn(x, increment){increment(x)}; b(10, a)";
        assert_eq!(Value::Integer(11), run(src));
    }

    #[test]
    fn function_bodies_do_not_leak_bindings() {
        let src = "let x = 1; let f = fn() { let x = 2; x }; f() + x";
        assert_eq!(Value::Integer(3), run(src));
        assert_eq!(Value::Null, run("let f = fn() { let inner = 2; }; f(); inner"));
    }

    #[test]
    fn closures_see_scope_not_caller() {
        let src = "let x = 10; let f = fn() { x }; let g = fn(x) { f() }; g(99)";
        assert_eq!(Value::Integer(10), run(src));
    }

    #[test]
    fn recursion() {
        let src = "
            let fib = fn(n) {
                if (n < 2) { return n; }
                fib(n - 1) + fib(n - 2)
            };
            fib(10)";
        assert_eq!(Value::Integer(55), run(src));
    }

    #[test]
    fn non_functions_are_not_callable() {
        assert_eq!(Value::Null, run("5(1)"));
        assert_eq!(Value::Null, run("let x = true; x()"));
    }

    #[test]
    fn arguments_bind_by_position() {
        assert_eq!(Value::Integer(1), run("let f = fn(x, y) { x }; f(1)"));
        assert_eq!(Value::Null, run("let f = fn(x, y) { y }; f(1)"));
        assert_eq!(Value::Integer(1), run("let f = fn(x) { x }; f(1, 2)"));
        assert_eq!(Value::Null, run("let f = fn(x) { x }; f()"));
    }

    #[test]
    fn surplus_arguments_are_not_evaluated() {
        let src = "let f = fn(x) { x }; f(1, if (true) { return 9; })";
        assert_eq!(Value::Integer(1), run(src));
    }

    #[test]
    fn runaway_recursion_is_cut_off() {
        let program = parse("let f = fn(n) { f(n + 1) + f(n + 1) }; f(0)");
        let mut interpreter = Interpreter::new().max_call_depth(50);
        assert_eq!(Value::Null, interpreter.interpret(&program));

        // The rest of the run stays cut off, shallow calls included.
        let program = parse("f(0); let id = fn(x) { x }; id(7)");
        assert!(interpreter.interpret(&program).is_null());
        assert!(interpreter.environment().borrow().get("id").is_some());

        // The bound is reset for the next run.
        let program = parse("let g = fn(n) { if (n < 1) { 0 } else { 1 + g(n - 1) } }; g(40)");
        assert_eq!(Some(40), interpreter.interpret(&program).as_integer());
        assert_eq!(Some(7), interpreter.interpret(&parse("id(7)")).as_integer());
    }

    #[test]
    fn functions_inspect_as_their_literal() {
        let value = run("fn(x) { x + 2; }");
        assert!(matches!(value, Value::Function(_)));
        assert_eq!("fn(x) {\n(x + 2)\n}", value.inspect());
    }

    #[test]
    fn shared_environment_persists_between_programs() {
        let env = Rc::new(RefCell::new(Environment::new()));
        assert_eq!(Value::Null, eval(&parse("let a = 2;"), &env));
        assert_eq!(Value::Null, eval(&parse("let double = fn(x) { x * 2 };"), &env));
        assert_eq!(Value::Integer(4), eval(&parse("double(a)"), &env));
        assert_eq!(Some(Value::Integer(2)), env.borrow().get("a"));
    }

    #[test]
    fn empty_program_is_null() {
        assert_eq!(Value::Null, run(""));
    }
}
