//! Mu prompt pipeline.
//!
//! `select(text, seed)` runs the stages in order:
//!
//! 1. wildcards (`$colors$`), seeded
//! 2. model tags (`TAG<style, 5, weighted>`), seeded
//! 3. macro parse and lenient evaluation over the preamble environment
//! 4. trim
//!
//! A syntax error returns the input unchanged. An evaluation error returns
//! whatever was produced before it. Neither panics; both are logged.

pub mod commands;
pub mod config;
pub mod pipeline;
pub mod preamble;

pub use config::MuConfig;
pub use pipeline::{Outcome, Resolution, Resolver};
pub use preamble::{Preamble, PreambleError, PreambleSource};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once.
///
/// Filtering follows `RUST_LOG` (default `warn`). With `MU_LOG_TREE` set,
/// spans are rendered as an indented tree instead of flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let registry = tracing_subscriber::registry().with(filter);
        if std::env::var_os("MU_LOG_TREE").is_some() {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
