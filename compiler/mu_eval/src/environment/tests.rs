use pretty_assertions::assert_eq;

use super::*;
use crate::function_val::{Binding, Thunk};

fn text_of(binding: Option<Binding>) -> Option<String> {
    match binding? {
        Binding::Value(Thunk::Const(text)) => Some(text.to_string()),
        _ => None,
    }
}

#[test]
fn define_and_lookup() {
    let mut env = Environment::new();
    env.define("x", Binding::constant("1"));
    assert_eq!(text_of(env.lookup("x")), Some("1".to_string()));
    assert!(env.lookup("y").is_none());
}

#[test]
fn inner_definitions_do_not_leak() {
    let mut env = Environment::new();
    env.push_scope();
    env.define("inner", Binding::constant("a"));
    assert!(env.lookup("inner").is_some());
    env.pop_scope();
    assert!(env.lookup("inner").is_none());
}

#[test]
fn shadowing_restores_on_pop() {
    let mut env = Environment::new();
    env.define("x", Binding::constant("outer"));
    env.push_scope();
    env.define("x", Binding::constant("inner"));
    assert_eq!(text_of(env.lookup("x")), Some("inner".to_string()));
    env.pop_scope();
    assert_eq!(text_of(env.lookup("x")), Some("outer".to_string()));
}

#[test]
fn redefinition_in_same_frame_replaces() {
    let mut env = Environment::new();
    env.define("x", Binding::constant("1"));
    env.define("x", Binding::constant("2"));
    assert_eq!(text_of(env.lookup("x")), Some("2".to_string()));
}

#[test]
fn push_scope_in_hides_intermediate_frames() {
    let mut env = Environment::new();
    let global = env.global_scope();
    env.push_scope();
    env.define("caller_only", Binding::constant("c"));
    env.push_scope_in(global);
    assert!(env.lookup("caller_only").is_none());
    env.pop_scope();
    assert!(env.lookup("caller_only").is_some());
}

#[test]
fn global_frame_is_never_popped() {
    let mut env = Environment::new();
    env.define("x", Binding::constant("1"));
    env.pop_scope();
    env.pop_scope();
    assert_eq!(env.depth(), 1);
    assert!(env.lookup("x").is_some());
}

#[test]
fn weak_scope_dies_with_its_frame() {
    let mut env = Environment::new();
    env.push_scope();
    let weak = env.current_scope().downgrade();
    assert!(weak.upgrade().is_some());
    env.pop_scope();
    assert!(weak.upgrade().is_none());
}

#[test]
fn local_scope_identity() {
    let env = Environment::new();
    assert!(env.current_scope().ptr_eq(&env.global_scope()));
}
