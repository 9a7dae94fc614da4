//! Lexical scopes for the interpreter.
//!
//! Frames are parent-linked; lookups follow the parent chain of the frame on
//! top of the stack, not the stack itself. Entering a function or forcing a
//! deferred value pushes a frame whose parent is the captured definition
//! frame, so the caller's bindings are invisible to it.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::function_val::{Binding, FunctionValue};

/// A single-threaded, reference-counted scope.
///
/// Wraps `Rc<RefCell<T>>` so every frame allocation goes through
/// [`LocalScope::new`].
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Non-owning handle, used by closures to refer to their defining frame.
    pub fn downgrade(&self) -> WeakScope<T> {
        WeakScope(Rc::downgrade(&self.0))
    }

    /// Whether two handles point at the same frame.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalScope({:p})", Rc::as_ptr(&self.0))
    }
}

/// Weak counterpart of [`LocalScope`].
///
/// A frame owns the bindings defined in it, and those bindings refer back to
/// the frame; holding the frame weakly keeps that from forming a cycle. The
/// frame is always alive while one of its bindings is reachable by lookup.
#[repr(transparent)]
pub struct WeakScope<T>(Weak<RefCell<T>>);

impl<T> WeakScope<T> {
    pub fn upgrade(&self) -> Option<LocalScope<T>> {
        self.0.upgrade().map(LocalScope)
    }
}

impl<T> Clone for WeakScope<T> {
    fn clone(&self) -> Self {
        WeakScope(Weak::clone(&self.0))
    }
}

impl<T> fmt::Debug for WeakScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakScope({:p})", self.0.as_ptr())
    }
}

/// A frame: bindings plus the enclosing frame.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<String, Binding>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Bind `name` in this frame, replacing any earlier binding here.
    pub fn define(&mut self, name: String, binding: Binding) {
        self.bindings.insert(name, binding);
    }

    /// Look `name` up here, then in the enclosing frames.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        if let Some(binding) = self.bindings.get(name) {
            return Some(binding.clone());
        }
        self.parent.as_ref()?.borrow().lookup(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.bindings.keys().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("bindings", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// The interpreter's frame stack, innermost last.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost frame.
    #[inline]
    pub fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    pub fn global_scope(&self) -> LocalScope<Scope> {
        self.global.clone()
    }

    /// Push a child of the innermost frame.
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Push a child of `parent`, hiding the frames in between.
    pub fn push_scope_in(&mut self, parent: LocalScope<Scope>) {
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the innermost frame. The global frame is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Define in the innermost frame.
    pub fn define(&mut self, name: impl Into<String>, binding: Binding) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name.into(), binding);
    }

    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    /// Functions visible from the innermost frame, inner definitions
    /// shadowing outer ones, sorted by name.
    pub fn visible_functions(&self) -> Vec<Rc<FunctionValue>> {
        let mut seen = FxHashSet::default();
        let mut functions = Vec::new();
        let mut scope = Some(self.current_scope());
        while let Some(frame) = scope {
            let frame_ref = frame.borrow();
            for (name, binding) in &frame_ref.bindings {
                if !seen.insert(name.clone()) {
                    continue;
                }
                if let Binding::Function(function) = binding {
                    functions.push(Rc::clone(function));
                }
            }
            scope = frame_ref.parent.clone();
        }
        functions.sort_by(|a, b| a.name().cmp(b.name()));
        functions
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.scopes.len())
            .field("global", &*self.global.borrow())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
