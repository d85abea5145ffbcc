use std::collections::HashMap;

use crate::Identifier;

use super::{Binding, Expr, Runtime, Value};

/// A user defined function, `f(x, y) = expr`.
#[derive(Clone, Debug, PartialEq)]
pub struct Define {
    pub args: Vec<Identifier>,
    pub expr: Expr,
}

impl From<(Vec<Identifier>, Expr)> for Define {
    fn from((args, expr): (Vec<Identifier>, Expr)) -> Define {
        Define { args, expr }
    }
}

impl Define {
    pub fn call(
        &self,
        name: &Identifier,
        args: Vec<Value>,
        bindings: &HashMap<Identifier, Binding>,
        depth: usize,
    ) -> Result<Value, Runtime> {
        if args.len() != self.args.len() {
            return Err(Runtime::ArgumentCount {
                name: name.to_string(),
                expected: self.args.len().to_string(),
                found: args.len(),
            });
        }
        let mut defs = bindings.clone();
        for (id, arg) in self.args.iter().zip(args) {
            defs.insert(id.clone(), Binding::Value(arg));
        }
        self.expr.evaluate(&defs, depth + 1)
    }
}

