//! Mu IR - Parse tree types for Mu prompt macros.
//!
//! This crate contains the data structures shared by the macro parser and the
//! interpreter:
//! - Spans for source locations
//! - Parse tree nodes (`Block`, `Node`, `NodeKind`)
//! - Function definitions, parameters and call arguments
//!
//! # Sharing
//!
//! Function bodies, variable initializers and parameter defaults are stored
//! behind `Arc` so that closures created by the interpreter can keep them
//! alive after the tree they came from has been dropped. All types are
//! `Send + Sync`, so a parsed preamble can be cached and shared between
//! threads.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod span;

pub use ast::{Arg, Block, Delimiter, FunctionDef, Node, NodeKind, Param, MAGIC_BRIDGE};
pub use span::Span;
