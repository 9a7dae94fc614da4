//! Seeded text expansion stages that run before macro evaluation.
//!
//! - [`wildcards`]: `$name$` tokens replaced with lines from word lists
//! - [`tags`]: `TAG<model, count, mode>` tokens replaced with tags mined
//!   from a model header's `ss_tag_frequency` metadata
//!
//! Both stages are pure given their text, seed and the files they read.
//! Failures are logged and leave an empty substitution behind.

mod error;
mod rng;
mod source;
pub mod tags;
pub mod wildcards;

pub use error::{TagError, WildcardError};
pub use rng::{RngSnapshot, WildcardRng};
pub use source::{split_lines, DirSource, MemorySource, WordSource, WORD_LIST_EXTENSION};
pub use tags::{expand_tags, extract_tags, read_header, TagMode, TagRecord};
pub use wildcards::{resolve_wildcards, WildcardToken};
