use tracing::debug;

use crate::{
    environment::Environment,
    interpreter::Interpreter,
    value::{Function, Value},
};

pub(crate) trait Callable {
    fn arity(&self) -> usize;
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Value;
}

impl Value {
    pub(crate) fn callable(&self) -> Option<&dyn Callable> {
        match self {
            Value::Function(f) => Some(f.as_ref()),
            _ => None,
        }
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        self.declaration.parameters.len()
    }

    /// Runs the body in a fresh scope whose parent is the defining scope,
    /// not the caller's. A parameter with no matching argument is bound to
    /// Null.
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Value {
        let mut environment = Environment::enclosed(&self.closure);
        let mut args = args.into_iter();
        for parameter in self.declaration.parameters.iter() {
            environment.define(parameter.name(), args.next().unwrap_or(Value::Null));
        }
        debug!(function = ?self, "entering function body");

        match interpreter.execute_in(&self.declaration.body.statements, environment) {
            Value::ReturnSignal(value) => *value,
            value => value,
        }
    }
}
