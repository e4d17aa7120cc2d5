use std::{
    collections::HashMap,
    rc::Rc,
    cell::RefCell,
};
use crate::value::Value;

/// One lexical scope. A scope lives as long as the call that created it or
/// the longest-lived function value that closed over it.
#[derive(Debug, Default)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self { enclosing: None, values: HashMap::new() }
    }

    pub fn enclosed(e: &Rc<RefCell<Environment>>) -> Self {
        Self { enclosing: Some(Rc::clone(e)), values: HashMap::new() }
    }

    /// Looks `name` up here, then in each enclosing scope in turn.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name)
            .cloned()
            .or_else(|| {
                self.enclosing.as_ref()
                    .and_then(|e| e.borrow().get(name))
            })
    }

    pub fn define<S: Into<String>>(&mut self, name: S, value: Value) {
        self.values.insert(name.into(), value);
    }
}
