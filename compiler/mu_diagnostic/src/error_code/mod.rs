//! Error codes for all Mu diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the pipeline stage.

use std::fmt;

/// Error codes for all Mu diagnostics.
///
/// Format: E#### where first digit indicates stage:
/// - E1xxx: Macro syntax errors
/// - E2xxx: Macro evaluation errors
/// - E3xxx: Expression language errors
/// - E4xxx: Wildcard and tag errors
/// - E5xxx: Configuration and preamble errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected `(` after a bare `$`
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Unrecognized input
    E1004,

    // Evaluation Errors (E2xxx)
    /// Undefined variable or function
    E2001,
    /// Function used as a value, or value called as a function
    E2002,
    /// Too many positional arguments
    E2003,
    /// Required parameter not supplied
    E2004,
    /// Unknown named argument
    E2005,
    /// Argument supplied twice
    E2006,
    /// Positional argument after a named argument
    E2007,
    /// Required parameter after a defaulted parameter
    E2008,
    /// Duplicate parameter name
    E2009,
    /// Self-referential definition
    E2010,
    /// Evaluation nested too deeply
    E2011,

    // Expression Errors (E3xxx)
    /// Expression syntax error
    E3001,
    /// Unknown name in expression
    E3002,
    /// Invalid operand or argument type
    E3003,
    /// Arithmetic error (division by zero, domain error)
    E3004,

    // Wildcard and Tag Errors (E4xxx)
    /// Word list not found
    E4001,
    /// Word list empty after filtering
    E4002,
    /// Invalid word list name
    E4003,
    /// Model file unreadable
    E4004,
    /// Malformed model header
    E4005,
    /// Model has no tag frequency metadata
    E4006,
    /// Invalid model name
    E4007,

    // Configuration Errors (E5xxx)
    /// Preamble file unreadable
    E5001,
    /// Preamble failed to parse or evaluate
    E5002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing and `FromStr`.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E4003,
        ErrorCode::E4004,
        ErrorCode::E4005,
        ErrorCode::E4006,
        ErrorCode::E4007,
        ErrorCode::E5001,
        ErrorCode::E5002,
    ];

    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            ErrorCode::E4007 => "E4007",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
        }
    }

    /// One-line explanation, shown by `mu explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unexpected token; usually a stray `)` or `}`",
            ErrorCode::E1002 => "a bare `$` must be followed by `(` to call the expression bridge",
            ErrorCode::E1003 => "a `(`, `{` or argument list was opened but never closed",
            ErrorCode::E1004 => "the lexer could not recognize the input",
            ErrorCode::E2001 => "a variable or function was referenced before being defined",
            ErrorCode::E2002 => "a function was used as a value, or a value was called",
            ErrorCode::E2003 => "more positional arguments than the function has parameters",
            ErrorCode::E2004 => "a parameter without a default was not supplied",
            ErrorCode::E2005 => "a named argument does not match any parameter",
            ErrorCode::E2006 => "the same parameter was supplied more than once",
            ErrorCode::E2007 => "positional arguments must come before named arguments",
            ErrorCode::E2008 => "parameters without defaults must come before defaulted ones",
            ErrorCode::E2009 => "a parameter name appears twice in one definition",
            ErrorCode::E2010 => "a definition refers to itself, directly or through others",
            ErrorCode::E2011 => "evaluation nested deeper than the recursion limit",
            ErrorCode::E3001 => "an inline expression could not be parsed",
            ErrorCode::E3002 => "an expression used a name that is neither built in nor defined",
            ErrorCode::E3003 => "an expression applied an operator or function to the wrong type",
            ErrorCode::E3004 => "an expression divided by zero or left a function's domain",
            ErrorCode::E4001 => "no word list file exists for a wildcard",
            ErrorCode::E4002 => "every line of a word list was rejected by the wildcard filters",
            ErrorCode::E4003 => "a wildcard name tried to leave the wildcard directory",
            ErrorCode::E4004 => "a model file could not be opened or read",
            ErrorCode::E4005 => "a model file header is truncated or is not valid JSON",
            ErrorCode::E4006 => "a model file carries no `ss_tag_frequency` metadata",
            ErrorCode::E4007 => "a `TAG<>` model name tried to leave the model directory",
            ErrorCode::E5001 => "a preamble file could not be read",
            ErrorCode::E5002 => "a preamble file failed to parse or evaluate",
        }
    }

    /// Check if this is a macro syntax error (E1xxx range).
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003 | ErrorCode::E1004
        )
    }

    /// Check if this is an evaluation error (E2xxx range).
    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is an expression language error (E3xxx range).
    pub fn is_expression_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// Check if this is a wildcard or tag error (E4xxx range).
    pub fn is_wildcard_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
