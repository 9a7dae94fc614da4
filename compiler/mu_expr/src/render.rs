//! Rendering `<= expression =>` segments inside text.

use std::borrow::Cow;

use crate::{evaluate_expression, Variables};

const EXPR_OPEN: &str = "<=";
const EXPR_CLOSE: &str = "=>";
const COMMENT_OPEN: &str = "<#";
const COMMENT_CLOSE: &str = "#>";

/// Replace every `<= ... =>` segment with its value and drop `<# ... #>`
/// comments. Failing segments render empty.
pub fn render(text: &str, vars: &mut dyn Variables) -> String {
    let text = strip_comments(text);
    let mut out = String::with_capacity(text.len());
    let mut rest: &str = &text;
    while let Some(start) = rest.find(EXPR_OPEN) {
        let body = &rest[start + EXPR_OPEN.len()..];
        let Some(end) = body.find(EXPR_CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&render_expression(&body[..end], vars));
        rest = &body[end + EXPR_CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

/// Evaluate one expression to text, logging and rendering `""` on failure.
pub fn render_expression(source: &str, vars: &mut dyn Variables) -> String {
    match evaluate_expression(source, vars) {
        Ok(value) => value.to_string(),
        Err(err) => {
            tracing::warn!(code = %err.code(), source = source.trim(), "expression failed: {err}");
            String::new()
        }
    }
}

fn strip_comments(text: &str) -> Cow<'_, str> {
    if !text.contains(COMMENT_OPEN) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(COMMENT_OPEN) {
        let body = &rest[start + COMMENT_OPEN.len()..];
        let Some(end) = body.find(COMMENT_CLOSE) else {
            tracing::warn!("unterminated `<#` comment kept as text");
            break;
        };
        out.push_str(&rest[..start]);
        rest = &body[end + COMMENT_CLOSE.len()..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}
