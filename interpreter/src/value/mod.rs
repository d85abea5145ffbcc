use std::{cmp::Ordering, fmt::Display};

use num::Zero;

use crate::{identifier::Identifier, parser::EqualityOperator};

mod define;
mod expr;
mod func;
mod unit;

pub use define::Define;
pub use expr::{Expr, Statement};
pub use func::Func;
pub use unit::{Dimensions, Unit, UnitDef};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Runtime {
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(Identifier),
    #[error("`{0}` is not a function")]
    NotAFunction(Identifier),
    #[error("`{name}` expects {expected} argument(s), got {found}")]
    ArgumentCount {
        name: String,
        expected: String,
        found: usize,
    },
    #[error("incompatible units `{0}` and `{1}`")]
    IncompatibleUnits(String, String),
    #[error("expected a number, found `{0}`")]
    NotANumber(String),
    #[error("unit exponent must be an integer")]
    NonIntegralExponent,
    #[error("unit exponent out of range")]
    ExponentOverflow,
    #[error("maximum call depth exceeded")]
    RecursionLimit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    pub fn to(&self, unit: &Unit) -> Result<Quantity, Runtime> {
        if self.unit.dimensions() != unit.dimensions() {
            return Err(Runtime::IncompatibleUnits(
                self.unit.to_string(),
                unit.to_string(),
            ));
        }
        Ok(Quantity {
            value: self.value * self.unit.scale() / unit.scale(),
            unit: unit.clone(),
        })
    }

    /// Collapses a quantity whose units cancel out into a plain number.
    fn normalize(self) -> Value {
        if self.unit.is_empty() {
            Value::Number(self.value)
        } else if self.unit.dimensions().is_dimensionless() {
            Value::Number(self.value * self.unit.scale())
        } else {
            Value::Quantity(self)
        }
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Quantity(Quantity),
    Bool(bool),
}

impl From<f64> for Value {
    fn from(num: f64) -> Self {
        Value::Number(num)
    }
}

impl From<Quantity> for Value {
    fn from(quantity: Quantity) -> Self {
        quantity.normalize()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(num) => write!(f, "{}", num),
            Value::Quantity(quantity) => write!(f, "{}", quantity),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// What a name is bound to in an environment.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    Value(Value),
    Function(Define),
}

impl Value {
    pub fn as_number(&self) -> Result<f64, Runtime> {
        match self {
            Value::Number(num) => Ok(*num),
            other => Err(Runtime::NotANumber(other.to_string())),
        }
    }

    fn incompatible(&self, other: &Value) -> Runtime {
        let describe = |value: &Value| match value {
            Value::Quantity(q) => q.unit.to_string(),
            Value::Number(_) => "number".to_owned(),
            Value::Bool(_) => "boolean".to_owned(),
        };
        Runtime::IncompatibleUnits(describe(self), describe(other))
    }

    pub fn neg(self) -> Result<Value, Runtime> {
        match self {
            Value::Number(num) => Ok(Value::Number(-num)),
            Value::Quantity(q) => Ok(Value::Quantity(Quantity::new(-q.value, q.unit))),
            other => Err(Runtime::NotANumber(other.to_string())),
        }
    }

    pub fn add(self, rhs: Value) -> Result<Value, Runtime> {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Quantity(a), Value::Quantity(b)) => {
                let b = b.to(&a.unit)?;
                Ok(Quantity::new(a.value + b.value, a.unit).into())
            }
            (a, b) => Err(a.incompatible(&b)),
        }
    }

    pub fn sub(self, rhs: Value) -> Result<Value, Runtime> {
        self.add(rhs.neg()?)
    }

    pub fn mul(self, rhs: Value) -> Result<Value, Runtime> {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            (Value::Number(n), Value::Quantity(q)) | (Value::Quantity(q), Value::Number(n)) => {
                Ok(Quantity::new(q.value * n, q.unit).into())
            }
            (Value::Quantity(a), Value::Quantity(b)) => {
                Ok(Quantity::new(a.value * b.value, a.unit.mul(&b.unit)?).into())
            }
            (a, b) => Err(a.incompatible(&b)),
        }
    }

    pub fn div(self, rhs: Value) -> Result<Value, Runtime> {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
            (Value::Quantity(q), Value::Number(n)) => Ok(Quantity::new(q.value / n, q.unit).into()),
            (Value::Number(n), Value::Quantity(q)) => {
                Ok(Quantity::new(n / q.value, q.unit.inverse()?).into())
            }
            (Value::Quantity(a), Value::Quantity(b)) => {
                Ok(Quantity::new(a.value / b.value, a.unit.mul(&b.unit.inverse()?)?).into())
            }
            (a, b) => Err(a.incompatible(&b)),
        }
    }

    /// Floored modulo; `x % 0` is `x`.
    pub fn rem(self, rhs: Value) -> Result<Value, Runtime> {
        let (a, b) = (self.as_number()?, rhs.as_number()?);
        if b.is_zero() {
            return Ok(Value::Number(a));
        }
        Ok(Value::Number(a - b * (a / b).floor()))
    }

    pub fn pow(self, rhs: Value) -> Result<Value, Runtime> {
        let exponent = rhs.as_number()?;
        match self {
            Value::Number(base) => Ok(Value::Number(base.powf(exponent))),
            Value::Quantity(q) => {
                if !exponent.fract().is_zero() {
                    return Err(Runtime::NonIntegralExponent);
                }
                let n = exponent as i32;
                Ok(Quantity::new(q.value.powi(n), q.unit.powi(n)?).into())
            }
            other => Err(Runtime::NotANumber(other.to_string())),
        }
    }

    pub fn compare(&self, other: &Value) -> Result<Option<Ordering>, Runtime> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(a.partial_cmp(b)),
            (Value::Quantity(a), Value::Quantity(b)) => {
                let b = b.to(&a.unit)?;
                Ok(a.value.partial_cmp(&b.value))
            }
            (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
            (a, b) => Err(a.incompatible(b)),
        }
    }

    pub fn test(&self, op: EqualityOperator, other: &Value) -> Result<Value, Runtime> {
        let ordering = self.compare(other)?;
        let result = match op {
            EqualityOperator::Equal => ordering == Some(Ordering::Equal),
            EqualityOperator::NotEqual => ordering != Some(Ordering::Equal),
            EqualityOperator::Less => ordering == Some(Ordering::Less),
            EqualityOperator::LessOrEqual => {
                matches!(ordering, Some(Ordering::Less | Ordering::Equal))
            }
            EqualityOperator::Greater => ordering == Some(Ordering::Greater),
            EqualityOperator::GreaterOrEqual => {
                matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
            }
        };
        Ok(Value::Bool(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantity(value: f64, unit: &str) -> Value {
        Value::Quantity(Quantity::new(value, Unit::find(unit).unwrap()))
    }

    #[test]
    fn adds_in_left_unit() {
        let sum = quantity(1.0, "km").add(quantity(500.0, "m")).unwrap();
        assert_eq!(sum, quantity(1.5, "km"));
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(matches!(
            quantity(1.0, "km").add(quantity(1.0, "kg")),
            Err(Runtime::IncompatibleUnits(_, _))
        ));
        assert!(quantity(1.0, "km").add(Value::Number(1.0)).is_err());
    }

    #[test]
    fn cancelling_units_yield_numbers() {
        let ratio = quantity(2.0, "km").div(quantity(500.0, "m")).unwrap();
        assert_eq!(ratio, Value::Number(4.0));
    }

    #[test]
    fn huge_unit_exponents_are_errors() {
        assert_eq!(
            quantity(2.0, "m").pow(Value::Number(256.0)),
            Err(Runtime::ExponentOverflow)
        );
        assert_eq!(
            quantity(1.0, "L").pow(Value::Number(1e9)),
            Err(Runtime::ExponentOverflow)
        );
        let square = quantity(3.0, "m").pow(Value::Number(2.0)).unwrap();
        assert_eq!(square.to_string(), "9 m^2");
    }

    #[test]
    fn floored_modulo() {
        let rem = |a: f64, b: f64| Value::Number(a).rem(Value::Number(b)).unwrap();
        assert_eq!(rem(7.0, 3.0), Value::Number(1.0));
        assert_eq!(rem(-1.0, 3.0), Value::Number(2.0));
        assert_eq!(rem(5.0, 0.0), Value::Number(5.0));
    }

    #[test]
    fn comparisons() {
        let less = quantity(1.0, "m")
            .test(EqualityOperator::Less, &quantity(1.0, "ft"))
            .unwrap();
        assert_eq!(less, Value::Bool(false));
        let equal = Value::Number(2.0)
            .test(EqualityOperator::Equal, &Value::Number(2.0))
            .unwrap();
        assert_eq!(equal, Value::Bool(true));
    }
}
