use std::{cmp::Ordering, fmt::Display};

use super::{Dimensions, Quantity, Runtime, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Func {
    Abs,
    Sqrt,
    Cbrt,
    Exp,
    Ln,
    Log,
    Log10,
    Log2,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Floor,
    Ceil,
    Round,
    Sign,
    Min,
    Max,
}

impl Func {
    const fn get_func(&self) -> Option<fn(f64) -> f64> {
        match self {
            Func::Sqrt => Some(f64::sqrt),
            Func::Cbrt => Some(f64::cbrt),
            Func::Exp => Some(f64::exp),
            Func::Ln => Some(f64::ln),
            Func::Log10 => Some(f64::log10),
            Func::Log2 => Some(f64::log2),
            Func::Sin => Some(f64::sin),
            Func::Cos => Some(f64::cos),
            Func::Tan => Some(f64::tan),
            Func::Asin => Some(f64::asin),
            Func::Acos => Some(f64::acos),
            Func::Atan => Some(f64::atan),
            _ => None,
        }
    }

    pub fn from_str(string: &str) -> Option<Self> {
        match string {
            "abs" => Some(Func::Abs),
            "sqrt" => Some(Func::Sqrt),
            "cbrt" => Some(Func::Cbrt),
            "exp" => Some(Func::Exp),
            "ln" => Some(Func::Ln),
            "log" => Some(Func::Log),
            "log10" => Some(Func::Log10),
            "log2" => Some(Func::Log2),
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "asin" => Some(Func::Asin),
            "acos" => Some(Func::Acos),
            "atan" => Some(Func::Atan),
            "floor" => Some(Func::Floor),
            "ceil" => Some(Func::Ceil),
            "round" => Some(Func::Round),
            "sign" => Some(Func::Sign),
            "min" => Some(Func::Min),
            "max" => Some(Func::Max),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Func::Abs => "abs",
            Func::Sqrt => "sqrt",
            Func::Cbrt => "cbrt",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Log => "log",
            Func::Log10 => "log10",
            Func::Log2 => "log2",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Floor => "floor",
            Func::Ceil => "ceil",
            Func::Round => "round",
            Func::Sign => "sign",
            Func::Min => "min",
            Func::Max => "max",
        }
    }

    fn arity_error(&self, expected: &str, found: usize) -> Runtime {
        Runtime::ArgumentCount {
            name: self.as_str().to_owned(),
            expected: expected.to_owned(),
            found,
        }
    }

    pub fn evaluate(&self, args: Vec<Value>) -> Result<Value, Runtime> {
        match self {
            Func::Min | Func::Max => return self.extremum(args),
            Func::Log | Func::Round => {
                if !(1..=2).contains(&args.len()) {
                    return Err(self.arity_error("1 or 2", args.len()));
                }
            }
            _ => {
                if args.len() != 1 {
                    return Err(self.arity_error("1", args.len()));
                }
            }
        }

        let mut args = args.into_iter();
        let Some(arg) = args.next() else {
            return Err(self.arity_error("1", 0));
        };
        let second = args.next().map(|v| v.as_number()).transpose()?;

        match (self, arg) {
            (Func::Abs | Func::Floor | Func::Ceil | Func::Round, Value::Quantity(q)) => {
                let mut inner = vec![Value::Number(q.value)];
                inner.extend(second.map(Value::Number));
                let value = self.evaluate(inner)?.as_number()?;
                Ok(Value::Quantity(Quantity::new(value, q.unit)))
            }
            (Func::Sin | Func::Cos | Func::Tan, Value::Quantity(q))
                if q.unit.dimensions() == Dimensions::ANGLE =>
            {
                self.evaluate(vec![Value::Number(q.value * q.unit.scale())])
            }
            (func, arg) => {
                let x = arg.as_number()?;
                let result = match func {
                    Func::Abs => x.abs(),
                    Func::Floor => x.floor(),
                    Func::Ceil => x.ceil(),
                    Func::Round => match second {
                        Some(digits) => {
                            let factor = 10f64.powi(digits as i32);
                            (x * factor).round() / factor
                        }
                        None => x.round(),
                    },
                    Func::Sign => {
                        if x == 0.0 || x.is_nan() {
                            x
                        } else {
                            x.signum()
                        }
                    }
                    Func::Log => match second {
                        Some(base) => x.log(base),
                        None => x.ln(),
                    },
                    func => func.get_func().map_or(f64::NAN, |f| f(x)),
                };
                Ok(Value::Number(result))
            }
        }
    }

    fn extremum(&self, args: Vec<Value>) -> Result<Value, Runtime> {
        let wanted = if *self == Func::Min {
            Ordering::Less
        } else {
            Ordering::Greater
        };
        let mut args = args.into_iter();
        let mut best = args.next().ok_or_else(|| self.arity_error("at least 1", 0))?;
        for arg in args {
            if arg.compare(&best)? == Some(wanted) {
                best = arg;
            }
        }
        Ok(best)
    }
}

impl Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
