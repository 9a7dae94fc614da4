//! Bindings: deferred values and function values.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use mu_ir::{Block, FunctionDef};

use crate::environment::{Scope, WeakScope};

/// What a name is bound to.
#[derive(Clone, Debug)]
pub enum Binding {
    Value(Thunk),
    Function(Rc<FunctionValue>),
}

impl Binding {
    /// A value binding holding fixed text.
    pub fn constant(text: impl Into<Rc<str>>) -> Self {
        Binding::Value(Thunk::Const(text.into()))
    }
}

/// A value that produces text when forced.
#[derive(Clone, Debug)]
pub enum Thunk {
    /// Already evaluated, e.g. a supplied call argument.
    Const(Rc<str>),
    /// Re-evaluated on every reference; nothing is cached.
    Deferred(Rc<DeferredValue>),
}

/// An initializer or parameter default waiting to be evaluated in the frame
/// it was defined in.
pub struct DeferredValue {
    pub name: String,
    pub body: Arc<Block>,
    pub scope: WeakScope<Scope>,
}

impl fmt::Debug for DeferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeferredValue(${} = {})", self.name, self.body)
    }
}

/// A user-defined function and the frame it closes over.
pub struct FunctionValue {
    pub def: Arc<FunctionDef>,
    pub captured: WeakScope<Scope>,
}

impl FunctionValue {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn signature(&self) -> String {
        self.def.signature()
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionValue({})", self.signature())
    }
}
