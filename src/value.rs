use std::{
    cell::RefCell,
    fmt::{self, Debug, Display},
    ptr,
    rc::Rc,
};

use crate::{
    environment::Environment,
    expr,
    printer,
};

/// A canonical boolean. `TRUE` and `FALSE` are the only instances, so two
/// booleans are equal exactly when they are the same object.
#[derive(Debug)]
pub struct Boolean {
    value: bool,
}

pub static TRUE: Boolean = Boolean { value: true };
pub static FALSE: Boolean = Boolean { value: false };

impl Boolean {
    pub fn value(&self) -> bool {
        self.value
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(&'static Boolean),
    Null,
    /// Unwinding marker produced by `return`. Unwrapped at the program root
    /// and at call boundaries, so it never escapes the interpreter.
    ReturnSignal(Box<Value>),
    Function(Rc<Function>),
}

impl Value {
    /// Whether this is the canonical `TRUE`; every other value is falsy.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Boolean(b) => ptr::eq(*b, &TRUE),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(b.value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Null => "null",
            Value::ReturnSignal(_) => "return",
            Value::Function(_) => "function",
        }
    }

    /// `==` semantics: integers by value, booleans by identity, and no
    /// answer at all for any other pairing.
    pub(crate) fn is_equal(&self, other: &Value) -> Option<bool> {
        use Value::*;
        match (self, other) {
            (Integer(s), Integer(o)) => Some(s == o),
            (Boolean(s), Boolean(o)) => Some(ptr::eq(*s, *o)),
            _ => None,
        }
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(if b { &TRUE } else { &FALSE })
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Integer(s), Integer(o)) => s == o,
            (Boolean(s), Boolean(o)) => ptr::eq(*s, *o),
            (Null, Null) => true,
            (ReturnSignal(s), ReturnSignal(o)) => s == o,
            (Function(s), Function(o)) => Rc::ptr_eq(s, o),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Value::*;
        match self {
            Integer(n) => write!(f, "{}", n),
            Boolean(b) => write!(f, "{}", b.value),
            Null => write!(f, "null"),
            ReturnSignal(v) => write!(f, "{}", v),
            Function(fnc) => write!(f, "{}", fnc),
        }
    }
}

/// A function literal paired with the environment it was evaluated in.
pub struct Function {
    pub(crate) declaration: expr::Function,
    pub(crate) closure: Rc<RefCell<Environment>>,
}

impl Function {
    pub(crate) fn new(declaration: expr::Function, closure: Rc<RefCell<Environment>>) -> Self {
        Function { declaration, closure }
    }
}

// The closure may hold this very function, so it is left out.
impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.declaration.parameters.iter().map(|p| p.name()).collect();
        write!(f, "<fn({})>", params.join(", "))
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::print_function(&self.declaration))
    }
}
