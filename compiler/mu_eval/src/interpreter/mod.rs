//! Tree-walking interpreter for macro trees.
//!
//! Every node writes its fragment into an output buffer, depth first, left
//! to right. Blocks push a frame; calls and deferred values push a frame in
//! the scope they were defined in (see [`crate::environment`]).

mod function_call;
mod magic;
mod scope_guard;

use std::rc::Rc;
use std::sync::Arc;

use mu_expr::{Value, Variables};
use mu_ir::{Block, Node, NodeKind, Span};
use mu_stack::ensure_sufficient_stack;

pub use magic::MagicFunction;
pub use scope_guard::ScopedInterpreter;

use crate::eval_mode::MAX_DEPTH;
use crate::function_val::{Binding, DeferredValue, FunctionValue, Thunk};
use crate::{Environment, EvalError, EvalMode};

/// Something currently being evaluated, for the recursion guard.
#[derive(Clone)]
enum Activation {
    Value(Rc<DeferredValue>),
    Function(Rc<FunctionValue>),
}

impl Activation {
    fn same(&self, other: &Activation) -> bool {
        match (self, other) {
            (Activation::Value(a), Activation::Value(b)) => Rc::ptr_eq(a, b),
            (Activation::Function(a), Activation::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Interpreter state for one evaluation.
pub struct Interpreter {
    pub env: Environment,
    mode: EvalMode,
    in_progress: Vec<Activation>,
    recovered: Vec<EvalError>,
}

impl Interpreter {
    pub fn new(env: Environment, mode: EvalMode) -> Self {
        Interpreter {
            env,
            mode,
            in_progress: Vec::new(),
            recovered: Vec::new(),
        }
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    /// Errors recovered from so far (lenient mode only).
    pub fn recovered(&self) -> &[EvalError] {
        &self.recovered
    }

    /// Give back the environment and the recovered errors.
    pub fn into_parts(self) -> (Environment, Vec<EvalError>) {
        (self.env, self.recovered)
    }

    /// Evaluate a top-level block in the current frame.
    ///
    /// On an unrecovered error, returns it together with the output produced
    /// by the nodes before the failing one.
    pub fn eval_top_level(&mut self, block: &Block) -> Result<String, (EvalError, String)> {
        let mut output = String::new();
        for node in block {
            let mut fragment = String::new();
            match self.eval_node(node, &mut fragment) {
                Ok(()) => output.push_str(&fragment),
                Err(err) => return Err((err, output)),
            }
        }
        Ok(output)
    }

    /// Evaluate a block into a fresh string, in the current frame.
    pub fn eval_to_string(&mut self, block: &Block) -> Result<String, EvalError> {
        let mut out = String::new();
        self.eval_block(block, &mut out)?;
        Ok(out)
    }

    pub fn eval_block(&mut self, block: &Block, out: &mut String) -> Result<(), EvalError> {
        for node in block {
            self.eval_node(node, out)?;
        }
        Ok(())
    }

    pub fn eval_node(&mut self, node: &Node, out: &mut String) -> Result<(), EvalError> {
        ensure_sufficient_stack(|| self.eval_node_inner(node, out))
    }

    fn eval_node_inner(&mut self, node: &Node, out: &mut String) -> Result<(), EvalError> {
        match &node.kind {
            NodeKind::Text(text) | NodeKind::Whitespace(text) | NodeKind::Quoted(text) => {
                out.push_str(text);
            }
            NodeKind::Newline => out.push('\n'),
            NodeKind::Var(name) => {
                let result = self.eval_var(name, node.span);
                self.substitute(result, out)?;
            }
            NodeKind::VarDef { name, value } => {
                let thunk = match value {
                    None => Thunk::Const(Rc::from("")),
                    Some(body) => Thunk::Deferred(Rc::new(DeferredValue {
                        name: name.clone(),
                        body: Arc::clone(body),
                        scope: self.env.current_scope().downgrade(),
                    })),
                };
                tracing::trace!(name, "define value");
                self.env.define(name.clone(), Binding::Value(thunk));
            }
            NodeKind::FunctionDef(def) => self.define_function(def, node.span)?,
            NodeKind::Call { name, args } => {
                let result = self.eval_call(name, args, node.span);
                self.substitute(result, out)?;
            }
            NodeKind::Block { delimiter, body } => {
                out.push(delimiter.open());
                self.with_env_scope(|scoped| scoped.eval_block(body, out))?;
                out.push(delimiter.close());
            }
            NodeKind::InlineExpr(source) => {
                let result = self.render_expression(source, node.span);
                self.substitute(result, out)?;
            }
        }
        Ok(())
    }

    /// Write the text of a substitution.
    ///
    /// In lenient mode a recursion error reaching the outermost substitution
    /// leaves only that substitution empty; the surrounding text survives.
    fn substitute(
        &mut self,
        result: Result<String, EvalError>,
        out: &mut String,
    ) -> Result<(), EvalError> {
        match result {
            Ok(text) => {
                out.push_str(&text);
                Ok(())
            }
            Err(err) if self.in_progress.is_empty() && self.mode.recovers(&err) => {
                tracing::warn!(
                    code = %err.code(),
                    span = %err.span(),
                    "{err}; substitution left empty"
                );
                self.recovered.push(err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve a `$name` reference to text.
    pub fn eval_var(&mut self, name: &str, span: Span) -> Result<String, EvalError> {
        match self.env.lookup(name) {
            Some(Binding::Value(thunk)) => self.force(name, &thunk, span),
            Some(Binding::Function(_)) => Err(EvalError::FunctionAsValue {
                name: name.to_string(),
                span,
            }),
            None => Err(EvalError::Undefined {
                name: name.to_string(),
                span,
            }),
        }
    }

    /// Produce a thunk's text. Deferred values are evaluated again each time.
    fn force(&mut self, name: &str, thunk: &Thunk, span: Span) -> Result<String, EvalError> {
        let deferred = match thunk {
            Thunk::Const(text) => return Ok(text.to_string()),
            Thunk::Deferred(deferred) => deferred,
        };
        let scope = deferred.scope.upgrade().ok_or_else(|| EvalError::Undefined {
            name: name.to_string(),
            span,
        })?;

        self.enter(Activation::Value(Rc::clone(deferred)), name, span)?;
        let result =
            self.with_scope_in(scope, |scoped| scoped.eval_to_string(&deferred.body));
        self.leave();
        result
    }

    /// Push an activation, failing on re-entry or excessive depth.
    fn enter(&mut self, activation: Activation, name: &str, span: Span) -> Result<(), EvalError> {
        if self.in_progress.iter().any(|a| a.same(&activation)) {
            return Err(EvalError::SelfReference {
                name: name.to_string(),
                span,
            });
        }
        if self.in_progress.len() >= MAX_DEPTH {
            return Err(EvalError::TooDeep {
                name: name.to_string(),
                limit: MAX_DEPTH,
                span,
            });
        }
        self.in_progress.push(activation);
        Ok(())
    }

    fn leave(&mut self) {
        self.in_progress.pop();
    }

    /// Evaluate expression source with macro values visible as variables.
    ///
    /// Expression errors render empty; errors from forcing macro values
    /// propagate.
    fn render_expression(&mut self, source: &str, span: Span) -> Result<String, EvalError> {
        let mut vars = MacroVariables {
            interpreter: self,
            span,
            error: None,
        };
        let text = mu_expr::render_expression(source, &mut vars);
        match vars.error {
            Some(err) => Err(err),
            None => Ok(text),
        }
    }
}

/// Exposes macro values to the expression language.
struct MacroVariables<'i> {
    interpreter: &'i mut Interpreter,
    span: Span,
    error: Option<EvalError>,
}

impl Variables for MacroVariables<'_> {
    fn lookup(&mut self, name: &str) -> Option<Value> {
        if self.error.is_some() {
            return None;
        }
        let Binding::Value(thunk) = self.interpreter.env.lookup(name)? else {
            return None;
        };
        match self.interpreter.force(name, &thunk, self.span) {
            Ok(text) => Some(Value::from_text(&text)),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}
