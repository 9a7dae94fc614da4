//! Built-in constants and functions.

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::{ExprError, Value};

/// Longest sequence `steps` will produce.
const MAX_STEPS: usize = 10_000;

/// Names usable as functions, for `help`-style listings.
pub const FUNCTIONS: &[&str] = &[
    "abs", "acos", "asin", "atan", "ceil", "clamp", "cos", "floor", "max", "min", "round", "sin",
    "sqrt", "steps", "tan", "template",
];

pub(crate) fn constant(name: &str) -> Option<Value> {
    match name {
        "pi" => Some(Value::Float(PI)),
        _ => None,
    }
}

pub(crate) fn call(
    name: &str,
    args: Vec<Value>,
    kwargs: Vec<(String, Value)>,
) -> Result<Value, ExprError> {
    tracing::trace!(name, args = args.len(), "builtin call");
    match name {
        "min" | "max" => {
            if !kwargs.is_empty() {
                return Err(ExprError::type_error(format!(
                    "{name}() takes no keyword arguments"
                )));
            }
            let wanted = if name == "min" {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            extremum(name, args, wanted)
        }
        "abs" => {
            let [x] = required::<1>(name, &["x"], args, kwargs)?;
            abs(x)
        }
        "clamp" => {
            let [a, b, c] = required::<3>(name, &["a", "b", "c"], args, kwargs)?;
            let inner = extremum("min", vec![b, c], Ordering::Less)?;
            extremum("max", vec![a, inner], Ordering::Greater)
        }
        "round" => {
            let [x, digits] = bind::<2>(name, &["number", "ndigits"], 1, args, kwargs)?;
            round(x.unwrap_or(Value::Int(0)), digits)
        }
        "floor" | "ceil" => {
            let [x] = required::<1>(name, &["x"], args, kwargs)?;
            match x {
                Value::Int(_) => Ok(x),
                _ => {
                    let f = number(name, &x)?;
                    float_to_int(if name == "floor" { f.floor() } else { f.ceil() })
                }
            }
        }
        "sqrt" | "sin" | "cos" | "tan" | "asin" | "acos" | "atan" => {
            let [x] = required::<1>(name, &["x"], args, kwargs)?;
            let x = number(name, &x)?;
            let result = match name {
                "sqrt" => x.sqrt(),
                "sin" => x.sin(),
                "cos" => x.cos(),
                "tan" => x.tan(),
                "asin" => x.asin(),
                "acos" => x.acos(),
                _ => x.atan(),
            };
            if result.is_nan() {
                return Err(ExprError::arithmetic("math domain error"));
            }
            Ok(Value::Float(round_to(result, 2)))
        }
        "steps" => {
            let [start, end, step] = bind::<3>(name, &["start", "end", "step"], 1, args, kwargs)?;
            steps(start.unwrap_or(Value::Int(0)), end, step)
        }
        "template" => {
            let [template, sequence] = required::<2>(name, &["template", "sequence"], args, kwargs)?;
            apply_template(&template, &sequence)
        }
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}

/// Match positional and keyword arguments against parameter names.
///
/// The first `required` slots must be filled.
fn bind<const N: usize>(
    name: &str,
    params: &[&str; N],
    required: usize,
    args: Vec<Value>,
    kwargs: Vec<(String, Value)>,
) -> Result<[Option<Value>; N], ExprError> {
    if args.len() > N {
        return Err(ExprError::type_error(format!(
            "{name}() takes at most {N} arguments ({} given)",
            args.len()
        )));
    }
    let mut slots: [Option<Value>; N] = std::array::from_fn(|_| None);
    for (slot, arg) in slots.iter_mut().zip(args) {
        *slot = Some(arg);
    }
    for (key, value) in kwargs {
        let Some(index) = params.iter().position(|p| *p == key) else {
            return Err(ExprError::type_error(format!(
                "{name}() got an unexpected keyword argument `{key}`"
            )));
        };
        if slots[index].is_some() {
            return Err(ExprError::type_error(format!(
                "{name}() got multiple values for argument `{key}`"
            )));
        }
        slots[index] = Some(value);
    }
    if let Some(missing) = slots.iter().take(required).position(Option::is_none) {
        return Err(ExprError::type_error(format!(
            "{name}() missing required argument `{}`",
            params[missing]
        )));
    }
    Ok(slots)
}

/// Like [`bind`] with every parameter required.
fn required<const N: usize>(
    name: &str,
    params: &[&str; N],
    args: Vec<Value>,
    kwargs: Vec<(String, Value)>,
) -> Result<[Value; N], ExprError> {
    let slots = bind(name, params, N, args, kwargs)?;
    Ok(slots.map(|slot| slot.unwrap_or(Value::Int(0))))
}

fn number(name: &str, value: &Value) -> Result<f64, ExprError> {
    value.as_f64().ok_or_else(|| {
        ExprError::type_error(format!(
            "{name}() expects a number, got {}",
            value.type_name()
        ))
    })
}

fn compare(a: &Value, b: &Value) -> Result<Ordering, ExprError> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
            _ => Err(ExprError::type_error(format!(
                "cannot compare {} and {}",
                a.type_name(),
                b.type_name()
            ))),
        },
    }
}

/// `min`/`max`: variadic, or a single list argument. Ties keep the first.
fn extremum(name: &str, args: Vec<Value>, wanted: Ordering) -> Result<Value, ExprError> {
    let items = match <[Value; 1]>::try_from(args) {
        Ok([Value::List(items)]) => items,
        Ok([single]) => vec![single],
        Err(args) => args,
    };
    let mut iter = items.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(ExprError::type_error(format!("{name}() arg is an empty sequence")));
    };
    for item in iter {
        if compare(&item, &best)? == wanted {
            best = item;
        }
    }
    Ok(best)
}

fn abs(value: Value) -> Result<Value, ExprError> {
    match value {
        Value::Int(i) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| ExprError::arithmetic("integer overflow")),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(ExprError::type_error(format!(
            "bad operand type for abs(): {}",
            other.type_name()
        ))),
    }
}

/// Round half to even at `digits` decimal places.
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "range is checked before the cast"
)]
fn float_to_int(value: f64) -> Result<Value, ExprError> {
    if !value.is_finite() || value.abs() >= 9.0e18 {
        return Err(ExprError::arithmetic("cannot convert value to integer"));
    }
    Ok(Value::Int(value as i64))
}

fn round(value: Value, digits: Option<Value>) -> Result<Value, ExprError> {
    let digits = match digits {
        None => None,
        Some(Value::Int(d)) => Some(
            i32::try_from(d).map_err(|_| ExprError::arithmetic("ndigits out of range"))?,
        ),
        Some(other) => {
            return Err(ExprError::type_error(format!(
                "round() ndigits must be an integer, not {}",
                other.type_name()
            )))
        }
    };
    match (value, digits) {
        (Value::Int(i), None) => Ok(Value::Int(i)),
        (Value::Int(i), Some(d)) if d >= 0 => Ok(Value::Int(i)),
        (Value::Int(i), Some(d)) => {
            let f = Value::Int(i).as_f64().unwrap_or_default();
            float_to_int(round_to(f, d).round())
        }
        (Value::Float(f), None) => float_to_int(f.round_ties_even()),
        (Value::Float(f), Some(d)) => Ok(Value::Float(round_to(f, d))),
        (other, _) => Err(ExprError::type_error(format!(
            "round() expects a number, got {}",
            other.type_name()
        ))),
    }
}

/// `steps(start, end, step)`: inclusive range, each step rounded to two
/// decimals. With one argument the range is `step..=start`.
fn steps(start: Value, end: Option<Value>, step: Option<Value>) -> Result<Value, ExprError> {
    let step = match step {
        Some(step) => number("steps", &step)?,
        None => 0.1,
    };
    if step <= 0.0 || !step.is_finite() {
        return Err(ExprError::arithmetic("steps() step must be positive"));
    }
    let (first, end) = match end {
        Some(end) => (start, number("steps", &end)?),
        None => (Value::Float(step), number("steps", &start)?),
    };

    let mut current = number("steps", &first)?;
    let mut items = Vec::new();
    if current <= end {
        items.push(first);
        current = round_to(current + step, 2);
    }
    while current <= end {
        if items.len() >= MAX_STEPS {
            return Err(ExprError::arithmetic("steps() produced too many values"));
        }
        items.push(Value::Float(current));
        current = round_to(current + step, 2);
    }
    Ok(Value::List(items))
}

/// Substitute each item into `template` and concatenate.
///
/// A scalar item replaces `$0`; a list item replaces `$0`..`$n` with its
/// elements.
fn apply_template(template: &Value, sequence: &Value) -> Result<Value, ExprError> {
    let template = template.to_string();
    let items = sequence.items().ok_or_else(|| {
        ExprError::type_error(format!(
            "template() expects a sequence, got {}",
            sequence.type_name()
        ))
    })?;

    let mut out = String::new();
    for item in items {
        let mut text = template.clone();
        match item {
            Value::List(elements) => {
                // Highest index first so `$1` never eats the prefix of `$10`.
                for (i, element) in elements.iter().enumerate().rev() {
                    text = text.replace(&format!("${i}"), &element.to_string());
                }
            }
            scalar => text = text.replace("$0", &scalar.to_string()),
        }
        out.push_str(&text);
    }
    Ok(Value::Str(out))
}
