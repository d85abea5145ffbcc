mod environment;
mod identifier;
pub mod parser;
mod value;

pub use environment::Environment;
pub use identifier::Identifier;
pub use parser::{parse_statement, EvalError};
pub use value::{
    Binding, Define, Dimensions, Expr, Func, Quantity, Runtime, Statement, Unit, UnitDef, Value,
};
