//! Evaluation errors.

use mu_diagnostic::{Diagnostic, ErrorCode};
use mu_ir::Span;
use thiserror::Error;

/// A failure while evaluating a macro tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("`${name}` is not defined")]
    Undefined { name: String, span: Span },

    #[error("`${name}` is a function; call it as `${name}(...)`")]
    FunctionAsValue { name: String, span: Span },

    #[error("`${name}` is a value, not a function")]
    NotCallable { name: String, span: Span },

    #[error("`${name}` takes at most {max} arguments, {given} given")]
    TooManyArguments {
        name: String,
        max: usize,
        given: usize,
        span: Span,
    },

    #[error("missing argument for `${param}` in call to `${name}`")]
    MissingArgument {
        name: String,
        param: String,
        span: Span,
    },

    #[error("`${name}` has no parameter `${param}`")]
    UnknownArgument {
        name: String,
        param: String,
        span: Span,
    },

    #[error("argument `${param}` supplied twice in call to `${name}`")]
    DuplicateArgument {
        name: String,
        param: String,
        span: Span,
    },

    #[error("positional argument after a named argument in call to `${name}`")]
    PositionalAfterNamed { name: String, span: Span },

    #[error("parameter `${param}` of `${name}` has no default but follows one that does")]
    RequiredAfterDefault {
        name: String,
        param: String,
        span: Span,
    },

    #[error("parameter `${param}` of `${name}` is declared twice")]
    DuplicateParameter {
        name: String,
        param: String,
        span: Span,
    },

    #[error("`${name}` refers to itself")]
    SelfReference { name: String, span: Span },

    #[error("evaluation nested deeper than {limit} levels at `${name}`")]
    TooDeep {
        name: String,
        limit: usize,
        span: Span,
    },
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::Undefined { .. } => ErrorCode::E2001,
            EvalError::FunctionAsValue { .. } | EvalError::NotCallable { .. } => ErrorCode::E2002,
            EvalError::TooManyArguments { .. } => ErrorCode::E2003,
            EvalError::MissingArgument { .. } => ErrorCode::E2004,
            EvalError::UnknownArgument { .. } => ErrorCode::E2005,
            EvalError::DuplicateArgument { .. } => ErrorCode::E2006,
            EvalError::PositionalAfterNamed { .. } => ErrorCode::E2007,
            EvalError::RequiredAfterDefault { .. } => ErrorCode::E2008,
            EvalError::DuplicateParameter { .. } => ErrorCode::E2009,
            EvalError::SelfReference { .. } => ErrorCode::E2010,
            EvalError::TooDeep { .. } => ErrorCode::E2011,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            EvalError::Undefined { span, .. }
            | EvalError::FunctionAsValue { span, .. }
            | EvalError::NotCallable { span, .. }
            | EvalError::TooManyArguments { span, .. }
            | EvalError::MissingArgument { span, .. }
            | EvalError::UnknownArgument { span, .. }
            | EvalError::DuplicateArgument { span, .. }
            | EvalError::PositionalAfterNamed { span, .. }
            | EvalError::RequiredAfterDefault { span, .. }
            | EvalError::DuplicateParameter { span, .. }
            | EvalError::SelfReference { span, .. }
            | EvalError::TooDeep { span, .. } => *span,
        }
    }

    /// Recursion errors are the only ones lenient evaluation recovers from.
    pub fn is_recursion(&self) -> bool {
        matches!(
            self,
            EvalError::SelfReference { .. } | EvalError::TooDeep { .. }
        )
    }

    /// Call errors: bad arity or argument naming.
    pub fn is_call_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
                | ErrorCode::E2007
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code(), self.to_string()).with_span(self.span());
        match self {
            EvalError::SelfReference { .. } => {
                diagnostic.with_note("definitions are re-evaluated on every use, so a cycle never ends")
            }
            EvalError::RequiredAfterDefault { .. } => {
                diagnostic.with_note("move parameters with defaults to the end")
            }
            _ => diagnostic,
        }
    }
}

/// Evaluation aborted. `partial` is the output produced before the error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct EvalFailure {
    pub error: EvalError,
    pub partial: String,
}
