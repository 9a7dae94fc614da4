//! Expression errors.

use mu_diagnostic::{Diagnostic, ErrorCode};
use thiserror::Error;

/// Failure to parse or evaluate an expression.
///
/// These never abort a prompt: the fragment renders empty and the error is
/// logged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("{message} at offset {offset}")]
    Syntax { message: String, offset: usize },

    #[error("unknown name `{0}`")]
    UnknownName(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("{0}")]
    Type(String),

    #[error("{0}")]
    Arithmetic(String),
}

impl ExprError {
    pub(crate) fn syntax(message: impl Into<String>, offset: usize) -> Self {
        ExprError::Syntax {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ExprError::Type(message.into())
    }

    pub(crate) fn arithmetic(message: impl Into<String>) -> Self {
        ExprError::Arithmetic(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ExprError::Syntax { .. } => ErrorCode::E3001,
            ExprError::UnknownName(_) | ExprError::UnknownFunction(_) => ErrorCode::E3002,
            ExprError::Type(_) => ErrorCode::E3003,
            ExprError::Arithmetic(_) => ErrorCode::E3004,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code(), self.to_string())
    }
}
