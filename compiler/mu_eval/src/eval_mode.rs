//! Evaluation modes.

use crate::EvalError;

/// How the interpreter reacts to errors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Every error aborts evaluation.
    #[default]
    Strict,
    /// A recursion error empties the outermost substitution that raised it
    /// and evaluation continues; other errors still abort.
    Lenient,
}

impl EvalMode {
    /// Whether `err` is recovered from in this mode.
    #[inline]
    pub fn recovers(self, err: &EvalError) -> bool {
        matches!(self, EvalMode::Lenient) && err.is_recursion()
    }
}

/// Most nested thunk and function activations allowed at once.
pub const MAX_DEPTH: usize = 256;
