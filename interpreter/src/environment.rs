use std::collections::HashMap;

use crate::{
    parser::{parse_statement, EvalError},
    value::{Binding, Statement, Value},
    Identifier,
};

/// Variable and function bindings shared by the lines of one document.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<Identifier, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.bindings.clear();
    }

    /// Evaluates one statement. Assignments and definitions update the
    /// bindings; blank input and definitions produce no value.
    pub fn evaluate(&mut self, input: &str) -> Result<Option<Value>, EvalError> {
        #[cfg(feature = "tracy")]
        profiling::scope!("Environment::evaluate");
        match parse_statement(input)? {
            Statement::Empty => Ok(None),
            Statement::Expr(expr) => Ok(Some(expr.evaluate(&self.bindings, 0)?)),
            Statement::Assignment(name, expr) => {
                let value = expr.evaluate(&self.bindings, 0)?;
                self.bindings.insert(name, Binding::Value(value.clone()));
                Ok(Some(value))
            }
            Statement::Define(name, def) => {
                self.bindings.insert(name, Binding::Function(def));
                Ok(None)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn bound_names(&self) -> impl Iterator<Item = &Identifier> {
        self.bindings.keys()
    }
}
