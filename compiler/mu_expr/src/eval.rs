//! Tree-walking evaluation of expressions.

use std::collections::HashMap;
use std::hash::BuildHasher;

use mu_stack::ensure_sufficient_stack;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::builtins;
use crate::{ExprError, Value};

/// Longest string or list that `*` may build.
const MAX_REPEAT_LEN: usize = 1 << 20;

/// Source of values for bare names that are not built-in constants.
pub trait Variables {
    fn lookup(&mut self, name: &str) -> Option<Value>;
}

/// No variables: every unknown name is an error.
pub struct NoVariables;

impl Variables for NoVariables {
    fn lookup(&mut self, _name: &str) -> Option<Value> {
        None
    }
}

impl<S: BuildHasher> Variables for HashMap<String, Value, S> {
    fn lookup(&mut self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Evaluate an expression tree.
pub fn eval(expr: &Expr, vars: &mut dyn Variables) -> Result<Value, ExprError> {
    ensure_sufficient_stack(|| eval_inner(expr, vars))
}

fn eval_inner(expr: &Expr, vars: &mut dyn Variables) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Name(name) => builtins::constant(name)
            .or_else(|| vars.lookup(name))
            .ok_or_else(|| ExprError::UnknownName(name.clone())),
        Expr::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval(item, vars)?);
            }
            Ok(Value::List(values))
        }
        Expr::Unary { op, operand } => unary(*op, eval(operand, vars)?),
        Expr::Binary { op, left, right } => {
            let left = eval(left, vars)?;
            let right = eval(right, vars)?;
            binary(*op, left, right)
        }
        Expr::Call { name, args, kwargs } => {
            let mut arg_values = Vec::with_capacity(args.len());
            for arg in args {
                arg_values.push(eval(arg, vars)?);
            }
            let mut kwarg_values = Vec::with_capacity(kwargs.len());
            for (key, arg) in kwargs {
                kwarg_values.push((key.clone(), eval(arg, vars)?));
            }
            builtins::call(name, arg_values, kwarg_values)
        }
        Expr::Index { target, index } => {
            let target = eval(target, vars)?;
            let index = eval(index, vars)?;
            subscript(&target, &index)
        }
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, ExprError> {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(i)) => i.checked_neg().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Pos, value) if value.is_numeric() => Ok(value),
        (op, value) => Err(ExprError::type_error(format!(
            "bad operand type for unary `{}`: {}",
            if op == UnaryOp::Neg { "-" } else { "+" },
            value.type_name()
        ))),
    }
}

fn overflow() -> ExprError {
    ExprError::arithmetic("integer overflow")
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, ExprError> {
    use Value::{Float, Int, List, Str};

    match (op, left, right) {
        (BinaryOp::Concat, left, right) => Ok(Str(format!("{left}{right}"))),

        (BinaryOp::Add, Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or_else(overflow),
        (BinaryOp::Add, Str(a), Str(b)) => Ok(Str(a + &b)),
        (BinaryOp::Add, List(mut a), List(b)) => {
            a.extend(b);
            Ok(List(a))
        }
        (BinaryOp::Sub, Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or_else(overflow),
        (BinaryOp::Mul, Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or_else(overflow),
        (BinaryOp::Mul, Str(s), Int(n)) | (BinaryOp::Mul, Int(n), Str(s)) => {
            let count = repeat_count(n, s.len())?;
            Ok(Str(s.repeat(count)))
        }
        (BinaryOp::Mul, List(items), Int(n)) | (BinaryOp::Mul, Int(n), List(items)) => {
            let count = repeat_count(n, items.len())?;
            Ok(List(
                (0..count).flat_map(|_| items.iter().cloned()).collect(),
            ))
        }

        (BinaryOp::Div, left, right) => {
            let (a, b) = floats(op, &left, &right)?;
            if b == 0.0 {
                return Err(ExprError::arithmetic("division by zero"));
            }
            Ok(Float(a / b))
        }
        (BinaryOp::FloorDiv, Int(a), Int(b)) => {
            if b == 0 {
                return Err(ExprError::arithmetic("integer division by zero"));
            }
            floor_div(a, b).map(Int).ok_or_else(overflow)
        }
        (BinaryOp::Mod, Int(a), Int(b)) => {
            if b == 0 {
                return Err(ExprError::arithmetic("modulo by zero"));
            }
            Ok(Int(floor_mod(a, b)))
        }
        (BinaryOp::Pow, Int(a), Int(b)) if b >= 0 => {
            let exp = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exp).map(Int).ok_or_else(overflow)
        }

        (op, left, right) => {
            let (a, b) = floats(op, &left, &right)?;
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::FloorDiv | BinaryOp::Mod if b == 0.0 => {
                    return Err(ExprError::arithmetic("float division by zero"));
                }
                BinaryOp::FloorDiv => (a / b).floor(),
                BinaryOp::Mod => a - b * (a / b).floor(),
                BinaryOp::Pow => {
                    let value = a.powf(b);
                    if value.is_nan() {
                        return Err(ExprError::arithmetic("math domain error"));
                    }
                    value
                }
                BinaryOp::Div | BinaryOp::Concat => unreachable!("handled above"),
            };
            Ok(Float(result))
        }
    }
}

fn floats(op: BinaryOp, left: &Value, right: &Value) -> Result<(f64, f64), ExprError> {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ExprError::type_error(format!(
            "unsupported operand types for `{}`: {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

fn repeat_count(n: i64, unit: usize) -> Result<usize, ExprError> {
    let count = usize::try_from(n).unwrap_or(0);
    if count.saturating_mul(unit) > MAX_REPEAT_LEN {
        return Err(ExprError::arithmetic("repeated value too large"));
    }
    Ok(count)
}

fn subscript(target: &Value, index: &Value) -> Result<Value, ExprError> {
    let Value::Int(i) = index else {
        return Err(ExprError::type_error(format!(
            "indices must be integers, not {}",
            index.type_name()
        )));
    };
    let items = match target {
        Value::List(items) => items.clone(),
        Value::Str(_) => target.items().unwrap_or_default(),
        other => {
            return Err(ExprError::type_error(format!(
                "{} is not subscriptable",
                other.type_name()
            )))
        }
    };
    let len = i64::try_from(items.len()).map_err(|_| overflow())?;
    let position = if *i < 0 { len + i } else { *i };
    usize::try_from(position)
        .ok()
        .and_then(|p| items.get(p).cloned())
        .ok_or_else(|| ExprError::type_error("index out of range"))
}
