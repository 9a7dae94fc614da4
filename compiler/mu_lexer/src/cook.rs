//! Turning raw token slices into token payloads.

/// Strip `$`, and the braces of `${name}`, from a variable token.
pub fn cook_var(slice: &str) -> &str {
    let name = slice.strip_prefix('$').unwrap_or(slice);
    name.strip_prefix('{')
        .and_then(|n| n.strip_suffix('}'))
        .unwrap_or(name)
}

/// Unescape a quoted literal including its surrounding quotes.
///
/// `\"` becomes `"`, `\\` becomes `\`; any other backslash is kept with the
/// character after it. `""` is a literal double quote.
pub fn cook_quoted(slice: &str) -> String {
    let content = slice
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(slice);
    if content.is_empty() {
        return "\"".to_string();
    }
    if !content.contains('\\') {
        return content.to_string();
    }

    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}
