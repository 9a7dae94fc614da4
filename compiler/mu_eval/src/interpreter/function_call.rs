//! Function definition and call evaluation.

use std::rc::Rc;
use std::sync::Arc;

use mu_ir::{Arg, FunctionDef, Span};
use rustc_hash::FxHashSet;

use super::{Activation, Interpreter, MagicFunction};
use crate::function_val::{Binding, DeferredValue, FunctionValue, Thunk};
use crate::EvalError;

impl Interpreter {
    /// Validate a definition and bind it in the current frame.
    pub(super) fn define_function(
        &mut self,
        def: &Arc<FunctionDef>,
        span: Span,
    ) -> Result<(), EvalError> {
        let mut seen = FxHashSet::default();
        let mut saw_default = false;
        for param in &def.params {
            if !seen.insert(param.name.as_str()) {
                return Err(EvalError::DuplicateParameter {
                    name: def.name.clone(),
                    param: param.name.clone(),
                    span: param.span,
                });
            }
            if param.has_default() {
                saw_default = true;
            } else if saw_default {
                return Err(EvalError::RequiredAfterDefault {
                    name: def.name.clone(),
                    param: param.name.clone(),
                    span: param.span,
                });
            }
        }

        if MagicFunction::is_magic(&def.name) {
            tracing::warn!(
                name = %def.name,
                %span,
                "`${}` is a built-in; calls will not reach this definition",
                def.name
            );
        }

        tracing::trace!(signature = %def.signature(), "define function");
        let function = FunctionValue {
            def: Arc::clone(def),
            captured: self.env.current_scope().downgrade(),
        };
        self.env
            .define(def.name.clone(), Binding::Function(Rc::new(function)));
        Ok(())
    }

    /// `$name(args)`. Built-ins take precedence over user bindings.
    #[tracing::instrument(level = "trace", skip(self, args, span))]
    pub(super) fn eval_call(
        &mut self,
        name: &str,
        args: &[Arg],
        span: Span,
    ) -> Result<String, EvalError> {
        if let Some(magic) = MagicFunction::from_name(name) {
            return self.eval_magic(magic, args, span);
        }

        let function = match self.env.lookup(name) {
            Some(Binding::Function(function)) => function,
            Some(Binding::Value(_)) => {
                return Err(EvalError::NotCallable {
                    name: name.to_string(),
                    span,
                })
            }
            None => {
                return Err(EvalError::Undefined {
                    name: name.to_string(),
                    span,
                })
            }
        };

        let supplied = self.bind_arguments(&function, args, span)?;
        let captured = function
            .captured
            .upgrade()
            .ok_or_else(|| EvalError::Undefined {
                name: name.to_string(),
                span,
            })?;

        self.enter(Activation::Function(Rc::clone(&function)), name, span)?;
        let result = self.with_scope_in(captured, |scoped| {
            for (param, value) in function.def.params.iter().zip(supplied) {
                let thunk = match (value, &param.default) {
                    (Some(text), _) => Thunk::Const(Rc::from(text)),
                    (None, Some(default)) => Thunk::Deferred(Rc::new(DeferredValue {
                        name: param.name.clone(),
                        body: Arc::clone(default),
                        scope: scoped.env.current_scope().downgrade(),
                    })),
                    (None, None) => {
                        return Err(EvalError::MissingArgument {
                            name: name.to_string(),
                            param: param.name.clone(),
                            span,
                        })
                    }
                };
                scoped.env.define(param.name.clone(), Binding::Value(thunk));
            }
            let body = scoped.eval_to_string(&function.def.body)?;
            Ok(body.trim().to_string())
        });
        self.leave();
        result
    }

    /// Evaluate arguments in the caller's frame and match them to
    /// parameters. Returns one slot per parameter, `None` where the default
    /// (or an error for required parameters) applies.
    fn bind_arguments(
        &mut self,
        function: &FunctionValue,
        args: &[Arg],
        span: Span,
    ) -> Result<Vec<Option<String>>, EvalError> {
        let name = function.name();
        let params = &function.def.params;
        let mut slots: Vec<Option<String>> = vec![None; params.len()];
        let mut positional = 0;
        let mut named_seen = false;

        for arg in args {
            let value = self.eval_to_string(&arg.value)?.trim().to_string();
            match &arg.name {
                None => {
                    if named_seen {
                        return Err(EvalError::PositionalAfterNamed {
                            name: name.to_string(),
                            span: arg.span,
                        });
                    }
                    if positional >= params.len() {
                        return Err(EvalError::TooManyArguments {
                            name: name.to_string(),
                            max: params.len(),
                            given: args.len(),
                            span,
                        });
                    }
                    slots[positional] = Some(value);
                    positional += 1;
                }
                Some(param) => {
                    named_seen = true;
                    let Some(index) = params.iter().position(|p| &p.name == param) else {
                        return Err(EvalError::UnknownArgument {
                            name: name.to_string(),
                            param: param.clone(),
                            span: arg.span,
                        });
                    };
                    if slots[index].is_some() {
                        return Err(EvalError::DuplicateArgument {
                            name: name.to_string(),
                            param: param.clone(),
                            span: arg.span,
                        });
                    }
                    slots[index] = Some(value);
                }
            }
        }
        Ok(slots)
    }
}
