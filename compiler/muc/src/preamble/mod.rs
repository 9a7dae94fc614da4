//! Preamble files: definitions evaluated before every prompt.
//!
//! A preamble list is `;`-separated. The entry `default` selects the bundled
//! preamble; anything else is a file path. Lines starting with `#` are
//! comments. All entries are evaluated in order into one environment.
//!
//! Parsed trees are kept rather than environments, so a [`Preamble`] is
//! `Send + Sync` and each call builds its own environment from it.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use mu_diagnostic::ErrorCode;
use mu_eval::{evaluate, EvalMode, Environment};
use mu_ir::Block;
use thiserror::Error;

/// The bundled preamble source.
pub const BUNDLED: &str = include_str!("default.mu");

/// List entry that selects [`BUNDLED`].
pub const BUNDLED_NAME: &str = "default";

/// One entry of a preamble list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreambleSource {
    Bundled,
    File(PathBuf),
}

impl PreambleSource {
    /// Split `default; ~/prompts/extra.mu` into sources. Empty entries are
    /// skipped.
    pub fn parse_list(list: &str) -> Vec<PreambleSource> {
        list.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                if entry == BUNDLED_NAME {
                    PreambleSource::Bundled
                } else {
                    PreambleSource::File(PathBuf::from(entry))
                }
            })
            .collect()
    }

    fn read(&self) -> Result<String, PreambleError> {
        match self {
            PreambleSource::Bundled => Ok(BUNDLED.to_string()),
            PreambleSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| PreambleError::Unreadable {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

impl fmt::Display for PreambleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreambleSource::Bundled => f.write_str(BUNDLED_NAME),
            PreambleSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PreambleError {
    #[error("cannot read preamble {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preamble `{label}` is invalid\n{rendered}")]
    Invalid {
        label: String,
        cause: ErrorCode,
        rendered: String,
    },
}

impl PreambleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PreambleError::Unreadable { .. } => ErrorCode::E5001,
            PreambleError::Invalid { .. } => ErrorCode::E5002,
        }
    }
}

/// Blank out `#` comment lines, keeping line breaks so diagnostics still
/// point at the right line.
pub fn strip_comments(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.starts_with('#') {
                if line.ends_with('\n') {
                    "\n"
                } else {
                    ""
                }
            } else {
                line
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
struct Unit {
    label: String,
    text: Arc<str>,
    tree: Arc<Block>,
}

/// Parsed preamble units, evaluated in order.
#[derive(Clone, Debug, Default)]
pub struct Preamble {
    units: Vec<Unit>,
}

impl Preamble {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, parse and check every source.
    #[tracing::instrument(level = "debug", skip_all, fields(sources = sources.len()))]
    pub fn load(sources: &[PreambleSource]) -> Result<Self, PreambleError> {
        let mut preamble = Preamble::new();
        for source in sources {
            let text = source.read()?;
            preamble.push_text(source.to_string(), &text)?;
        }
        preamble.environment()?;
        tracing::debug!(units = preamble.units.len(), "preamble loaded");
        Ok(preamble)
    }

    /// Parse `text` and append it. Evaluation errors surface from
    /// [`Preamble::environment`].
    pub fn push_text(&mut self, label: impl Into<String>, text: &str) -> Result<(), PreambleError> {
        let label = label.into();
        let text: Arc<str> = strip_comments(text).into();
        let tree = mu_parse::parse(&text).map_err(|err| PreambleError::Invalid {
            label: label.clone(),
            cause: err.code(),
            rendered: err.to_diagnostic().render(&text),
        })?;
        self.units.push(Unit {
            label,
            text,
            tree: Arc::new(tree),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// A fresh environment with every unit evaluated into it.
    pub fn environment(&self) -> Result<Environment, PreambleError> {
        let mut env = Environment::new();
        for unit in &self.units {
            match evaluate(&unit.tree, Some(env), EvalMode::Strict) {
                Ok(evaluated) => {
                    if !evaluated.output.trim().is_empty() {
                        tracing::debug!(label = %unit.label, "preamble produced text; ignored");
                    }
                    env = evaluated.env;
                }
                Err(failure) => {
                    return Err(PreambleError::Invalid {
                        label: unit.label.clone(),
                        cause: failure.error.code(),
                        rendered: failure.error.to_diagnostic().render(&unit.text),
                    })
                }
            }
        }
        Ok(env)
    }

    /// Signatures of the public functions the preamble defines.
    pub fn functions(&self) -> Result<Vec<String>, PreambleError> {
        let env = self.environment()?;
        Ok(env
            .visible_functions()
            .iter()
            .filter(|function| !function.name().starts_with('_'))
            .map(|function| function.signature())
            .collect())
    }
}
