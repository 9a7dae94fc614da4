//! Parse error types.

use mu_diagnostic::{Diagnostic, ErrorCode};
use mu_ir::Span;
use mu_lexer::LexError;
use thiserror::Error;

/// A macro syntax error. Any of these aborts the whole resolution.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unmatched `{closer}`")]
    Unmatched { closer: char, span: Span },

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },

    #[error("expected `(` after `$`")]
    BareDollar { span: Span },

    #[error("unclosed `{opener}`")]
    Unclosed { opener: char, span: Span },
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Lex(err) => err.code(),
            ParseError::Unmatched { .. } | ParseError::Unexpected { .. } => ErrorCode::E1001,
            ParseError::BareDollar { .. } => ErrorCode::E1002,
            ParseError::Unclosed { .. } => ErrorCode::E1003,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(err) => err.span,
            ParseError::Unmatched { span, .. }
            | ParseError::Unexpected { span, .. }
            | ParseError::BareDollar { span }
            | ParseError::Unclosed { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code(), self.to_string()).with_span(self.span());
        match self {
            ParseError::Unclosed { .. } => {
                diagnostic.with_note("the text ended before the matching closer")
            }
            ParseError::BareDollar { .. } => {
                diagnostic.with_note("write `$name` for a variable or `$(...)` for an expression")
            }
            _ => diagnostic,
        }
    }
}
