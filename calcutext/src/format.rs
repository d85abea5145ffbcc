use std::fmt::Display;

use interpreter::{Quantity, Value};
use num::Zero;

/// Digits after the decimal point for fractional results.
pub const PRECISION: usize = 2;

const EXPONENTIAL_THRESHOLD: f64 = 1_000_000.0;

/// A line result ready for display.
#[derive(Clone, Debug, PartialEq)]
pub enum FormattedValue {
    Integer(i64),
    Decimal(String),
    Quantity(String),
}

impl Display for FormattedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormattedValue::Integer(n) => write!(f, "{}", n),
            FormattedValue::Decimal(s) | FormattedValue::Quantity(s) => write!(f, "{}", s),
        }
    }
}

/// Formats an evaluation result. Values that are neither numbers nor
/// quantities have no displayable result.
pub fn format_value(value: &Value) -> Option<FormattedValue> {
    match value {
        Value::Number(n) => Some(format_number(*n)),
        Value::Quantity(q) => Some(format_quantity(q)),
        Value::Bool(_) => None,
    }
}

pub fn format_number(n: f64) -> FormattedValue {
    if n.is_infinite() {
        let sign = if n.is_sign_negative() { "-" } else { "" };
        FormattedValue::Decimal(format!("{sign}Infinity"))
    } else if n.abs() >= EXPONENTIAL_THRESHOLD {
        FormattedValue::Decimal(exponential(n, PRECISION + 1))
    } else if n.is_nan() || !n.fract().is_zero() {
        FormattedValue::Decimal(format!("{:.*}", PRECISION, n))
    } else {
        FormattedValue::Integer(n as i64)
    }
}

fn format_quantity(q: &Quantity) -> FormattedValue {
    FormattedValue::Quantity(format!("{:.*} {}", PRECISION, q.value, q.unit))
}

/// `1234567` with three significant digits is `1.23e+6`.
fn exponential(n: f64, significant: usize) -> String {
    let formatted = format!("{:.*e}", significant.saturating_sub(1), n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
