//! The Mu expression language.
//!
//! A small arithmetic and string language used inside prompts, either inline
//! as `<= expr =>` or through the `$(...)` bridge of the macro language. It
//! has its own lexer and Pratt parser and knows nothing about macro syntax;
//! bare names it does not know are looked up through [`Variables`].
//!
//! ```text
//! <= clamp(0.2, strength * 1.5, 1.0) =>
//! <= template("($0:1.1) ", ["cat", "dog"]) =>
//! <= steps(0, 1, 0.25) =>        [0, 0.25, 0.5, 0.75, 1.0]
//! ```
//!
//! Errors never abort the surrounding prompt: [`render`] logs them and the
//! failing segment becomes empty. [`evaluate_expression`] returns them.

mod ast;
mod builtins;
mod error;
mod eval;
mod lexer;
mod parser;
mod render;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use builtins::FUNCTIONS;
pub use error::ExprError;
pub use eval::{eval, NoVariables, Variables};
pub use parser::parse_expression;
pub use render::{render, render_expression};
pub use value::{format_float, Value};

/// Parse and evaluate one expression.
pub fn evaluate_expression(source: &str, vars: &mut dyn Variables) -> Result<Value, ExprError> {
    let expr = parse_expression(source)?;
    let value = eval(&expr, vars)?;
    tracing::trace!(source = source.trim(), %value, "evaluated expression");
    Ok(value)
}
