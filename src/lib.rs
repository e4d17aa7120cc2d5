mod callable;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

pub use crate::{
    environment::Environment,
    error::{Error, Result},
    interpreter::{eval, Interpreter},
    parser::Parser,
    scanner::Scanner,
    stmt::Program,
    value::Value,
};
