//! Built-in macro functions, checked before user bindings.

use mu_ir::{Arg, Span, MAGIC_BRIDGE};

use super::Interpreter;
use crate::EvalError;

/// Functions provided by the interpreter itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MagicFunction {
    /// `$(...)`: evaluate the arguments as one expression.
    Bridge,
    /// `$help(prefix?)`: list visible function signatures.
    Help,
    /// `$debug(...)`: log the arguments and pass them through.
    Debug,
}

impl MagicFunction {
    pub const NAMES: &[&str] = &[MAGIC_BRIDGE, "help", "debug"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            MAGIC_BRIDGE => Some(MagicFunction::Bridge),
            "help" => Some(MagicFunction::Help),
            "debug" => Some(MagicFunction::Debug),
            _ => None,
        }
    }

    pub fn is_magic(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl Interpreter {
    pub(super) fn eval_magic(
        &mut self,
        magic: MagicFunction,
        args: &[Arg],
        span: Span,
    ) -> Result<String, EvalError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_to_string(&arg.value)?.trim().to_string());
        }
        let joined = values.join(", ");

        match magic {
            MagicFunction::Bridge => self.render_expression(&joined, span),
            MagicFunction::Help => {
                let prefix = values.first().map_or("", |p| p.trim_start_matches('$'));
                Ok(self.help_text(prefix))
            }
            MagicFunction::Debug => {
                tracing::info!(target: "mu::debug", "{joined}");
                Ok(joined)
            }
        }
    }

    /// Signatures of visible functions whose names start with `prefix`,
    /// one per line. Names starting with `_` are hidden.
    pub fn help_text(&self, prefix: &str) -> String {
        self.env
            .visible_functions()
            .iter()
            .filter(|f| !f.name().starts_with('_') && f.name().starts_with(prefix))
            .map(|f| f.signature())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
