//! Scoped interpreter for Mu prompt macros.
//!
//! Walks a parse tree from `mu_parse` over a chain of lexical frames and
//! flattens it to text. Definitions are lazy: `$x = ...` binds a thunk that
//! is re-evaluated, in the frame it was defined in, every time `$x` is used.
//! Functions close over their definition frame and bind arguments in a new
//! frame on each call.
//!
//! # Example
//!
//! ```text
//! $add(a, b = 1) = { <=a+b=> }
//! $add(5)          ->  6
//! ```

mod environment;
mod errors;
mod eval_mode;
mod function_val;
mod interpreter;

use mu_ir::Block;

pub use environment::{Environment, LocalScope, Scope, WeakScope};
pub use errors::{EvalError, EvalFailure};
pub use eval_mode::{EvalMode, MAX_DEPTH};
pub use function_val::{Binding, DeferredValue, FunctionValue, Thunk};
pub use interpreter::{Interpreter, MagicFunction, ScopedInterpreter};

/// Result of a successful evaluation.
#[derive(Debug)]
pub struct Evaluated {
    /// Flattened output (not trimmed).
    pub output: String,
    /// The environment after evaluation, for threading into later calls.
    pub env: Environment,
    /// Recursion errors that lenient mode turned into empty nodes.
    pub recovered: Vec<EvalError>,
}

/// Evaluate `tree` in `env` (or a fresh environment).
#[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len(), ?mode))]
pub fn evaluate(
    tree: &Block,
    env: Option<Environment>,
    mode: EvalMode,
) -> Result<Evaluated, EvalFailure> {
    let mut interpreter = Interpreter::new(env.unwrap_or_default(), mode);
    match interpreter.eval_top_level(tree) {
        Ok(output) => {
            let (env, recovered) = interpreter.into_parts();
            tracing::debug!(len = output.len(), recovered = recovered.len(), "evaluated");
            Ok(Evaluated {
                output,
                env,
                recovered,
            })
        }
        Err((error, partial)) => {
            tracing::debug!(code = %error.code(), "evaluation aborted: {error}");
            Err(EvalFailure { error, partial })
        }
    }
}
