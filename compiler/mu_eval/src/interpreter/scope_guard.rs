//! RAII scope guards for the interpreter's frame stack.
//!
//! [`ScopedInterpreter`] pops the frame it pushed when dropped, so early
//! returns through `?` keep the stack balanced.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::{LocalScope, Scope};

/// Guard over an interpreter with one extra frame pushed.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push a child of the current frame until the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Push a child of `parent` until the guard drops.
    pub fn scoped_in(&mut self, parent: LocalScope<Scope>) -> ScopedInterpreter<'_> {
        self.env.push_scope_in(parent);
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` in a child of the current frame.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` in a child of `parent`.
    pub fn with_scope_in<T, F>(&mut self, parent: LocalScope<Scope>, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> T,
    {
        let mut scoped = self.scoped_in(parent);
        f(&mut scoped)
    }
}
