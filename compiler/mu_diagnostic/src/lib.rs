//! Diagnostic system for Mu prompt macros.
//!
//! - Error codes for searchability (`mu explain E2010`)
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Notes (why it's wrong, or how the pipeline recovered)
//!
//! Every failure in the pipeline is recoverable, so diagnostics are mostly
//! rendered into log records rather than printed. [`Diagnostic::render`]
//! produces a compact excerpt with a caret under the offending text.

mod diagnostic;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
