//! Wildcard and tag errors.
//!
//! None of these abort a resolution: the resolver logs them and substitutes
//! an empty string (wildcards) or an empty list (tags).

use std::io;
use std::path::PathBuf;

use mu_diagnostic::{Diagnostic, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WildcardError {
    #[error("no word list for `{name}` at {}", path.display())]
    NotFound {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("word list `{name}` has no lines left after filtering")]
    Empty { name: String },

    #[error("invalid word list name `{name}`")]
    InvalidName { name: String },
}

impl WildcardError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WildcardError::NotFound { .. } => ErrorCode::E4001,
            WildcardError::Empty { .. } => ErrorCode::E4002,
            WildcardError::InvalidName { .. } => ErrorCode::E4003,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code(), self.to_string())
            .with_note("the wildcard was replaced with an empty string")
    }
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("cannot read model {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed header in {}: {reason}", path.display())]
    MalformedHeader { path: PathBuf, reason: String },

    #[error("{} has no `ss_tag_frequency` metadata", path.display())]
    NoTagMetadata { path: PathBuf },

    #[error("invalid model name `{name}`")]
    InvalidModelName { name: String },
}

impl TagError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TagError::Unreadable { .. } => ErrorCode::E4004,
            TagError::MalformedHeader { .. } => ErrorCode::E4005,
            TagError::NoTagMetadata { .. } => ErrorCode::E4006,
            TagError::InvalidModelName { .. } => ErrorCode::E4007,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code(), self.to_string())
            .with_note("the tag list was left empty")
    }
}
