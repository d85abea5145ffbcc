use std::collections::HashMap;

use crate::{
    parser::{EqualityOperator, Operator},
    Identifier,
};

use super::{Binding, Define, Func, Quantity, Runtime, Unit, Value};

/// Counts every level of the tree and every call.
const MAX_DEPTH: usize = 512;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Identifier(Identifier),
    Neg(Box<Expr>),
    Binary(Operator, Box<Expr>, Box<Expr>),
    Compare(EqualityOperator, Box<Expr>, Box<Expr>),
    Call(Identifier, Vec<Expr>),
    Convert(Box<Expr>, Unit),
}

impl From<f64> for Expr {
    fn from(num: f64) -> Self {
        Expr::Number(num)
    }
}

impl From<Identifier> for Expr {
    fn from(id: Identifier) -> Self {
        Expr::Identifier(id)
    }
}

impl Expr {
    pub fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn evaluate(
        &self,
        bindings: &HashMap<Identifier, Binding>,
        depth: usize,
    ) -> Result<Value, Runtime> {
        if depth > MAX_DEPTH {
            return Err(Runtime::RecursionLimit);
        }
        let inner = depth + 1;
        match self {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Identifier(id) => resolve(id, bindings),
            Expr::Neg(expr) => expr.evaluate(bindings, inner)?.neg(),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.evaluate(bindings, inner)?;
                let rhs = rhs.evaluate(bindings, inner)?;
                match op {
                    Operator::Add => lhs.add(rhs),
                    Operator::Sub => lhs.sub(rhs),
                    Operator::Mul => lhs.mul(rhs),
                    Operator::Div => lhs.div(rhs),
                    Operator::Mod => lhs.rem(rhs),
                    Operator::Pow => lhs.pow(rhs),
                }
            }
            Expr::Compare(op, lhs, rhs) => {
                let lhs = lhs.evaluate(bindings, inner)?;
                let rhs = rhs.evaluate(bindings, inner)?;
                lhs.test(*op, &rhs)
            }
            Expr::Call(id, args) => {
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(bindings, inner))
                    .collect::<Result<Vec<_>, _>>()?;
                match (bindings.get(id), Func::from_str(id.as_str())) {
                    (Some(Binding::Function(def)), _) => def.call(id, args, bindings, inner),
                    (_, Some(func)) => func.evaluate(args),
                    _ if bindings.contains_key(id) => Err(Runtime::NotAFunction(id.clone())),
                    _ => Err(Runtime::UndefinedSymbol(id.clone())),
                }
            }
            Expr::Convert(expr, unit) => match expr.evaluate(bindings, inner)? {
                Value::Quantity(q) => Ok(Value::Quantity(q.to(unit)?)),
                other => Err(Runtime::IncompatibleUnits(other.to_string(), unit.to_string())),
            },
        }
    }
}

/// Variables shadow constants, which shadow units.
fn resolve(id: &Identifier, bindings: &HashMap<Identifier, Binding>) -> Result<Value, Runtime> {
    match bindings.get(id) {
        Some(Binding::Value(value)) => Ok(value.clone()),
        Some(Binding::Function(_)) => Err(Runtime::NotANumber(id.to_string())),
        None => id
            .associated_value()
            .map(Value::Number)
            .or_else(|| Unit::find(id.as_str()).map(|unit| Value::Quantity(Quantity::new(1.0, unit))))
            .ok_or_else(|| Runtime::UndefinedSymbol(id.clone())),
    }
}

/// A parsed line.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Empty,
    Expr(Expr),
    Assignment(Identifier, Expr),
    Define(Identifier, Define),
}
