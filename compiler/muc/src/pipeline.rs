//! The `select(text, seed)` pipeline.

use std::path::{Path, PathBuf};

use mu_eval::{evaluate, EvalError, EvalMode, Environment};
use mu_parse::ParseError;
use mu_wildcard::tags::TagExpander;
use mu_wildcard::wildcards::WildcardResolver;
use mu_wildcard::{DirSource, WordSource};

use crate::config::MuConfig;
use crate::preamble::{Preamble, PreambleError};

/// How a resolution ended.
#[derive(Debug)]
pub enum Outcome {
    /// Evaluated fully. `recovered` counts nodes emptied by recursion errors.
    Complete { recovered: usize },
    /// The expanded text did not parse; the input is returned unchanged.
    SyntaxError(ParseError),
    /// Evaluation stopped; the output produced so far is returned.
    Aborted(EvalError),
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct Resolution {
    pub text: String,
    /// Text after the wildcard and tag stages, before macro evaluation.
    pub expanded: String,
    pub outcome: Outcome,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, Outcome::Complete { .. })
    }
}

/// A loaded preamble plus the word list and model locations.
///
/// Holds no per-call state, so one resolver can serve many calls (and
/// threads, with a `Sync` word source).
#[derive(Debug)]
pub struct Resolver<S: WordSource = DirSource> {
    preamble: Preamble,
    words: S,
    model_dir: PathBuf,
}

impl Resolver<DirSource> {
    /// Load the configured preamble and point at the configured directories.
    pub fn from_config(config: &MuConfig) -> Result<Self, PreambleError> {
        let preamble = Preamble::load(&config.preamble)?;
        Ok(Resolver::new(
            preamble,
            DirSource::new(&config.wildcard_dir),
            config.model_dir.clone(),
        ))
    }
}

impl<S: WordSource> Resolver<S> {
    pub fn new(preamble: Preamble, words: S, model_dir: impl Into<PathBuf>) -> Self {
        Resolver {
            preamble,
            words,
            model_dir: model_dir.into(),
        }
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Resolve `text` with `seed` and return the final prompt.
    pub fn select(&self, text: &str, seed: u64) -> String {
        self.resolve(text, seed).text
    }

    /// Resolve `text` with `seed`, keeping the details of how it went.
    #[tracing::instrument(level = "debug", skip_all, fields(seed = seed, len = text.len()))]
    pub fn resolve(&self, text: &str, seed: u64) -> Resolution {
        let expanded = WildcardResolver::new(seed, &self.words).resolve(text);
        let expanded = TagExpander::new(&self.model_dir, seed).expand(&expanded);

        let tree = match mu_parse::parse(&expanded) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::error!(
                    code = %err.code(),
                    "prompt left unresolved:\n{}",
                    err.to_diagnostic().render(&expanded)
                );
                return Resolution {
                    text: text.to_string(),
                    expanded,
                    outcome: Outcome::SyntaxError(err),
                };
            }
        };

        let env = self.preamble.environment().unwrap_or_else(|err| {
            tracing::error!(code = %err.code(), "{err}; continuing without preamble");
            Environment::new()
        });

        match evaluate(&tree, Some(env), EvalMode::Lenient) {
            Ok(evaluated) => {
                for err in &evaluated.recovered {
                    tracing::warn!(
                        code = %err.code(),
                        "node emptied:\n{}",
                        err.to_diagnostic().render(&expanded)
                    );
                }
                let text = evaluated.output.trim().to_string();
                tracing::info!(result = %text, "resolved prompt");
                Resolution {
                    text,
                    expanded,
                    outcome: Outcome::Complete {
                        recovered: evaluated.recovered.len(),
                    },
                }
            }
            Err(failure) => {
                tracing::error!(
                    code = %failure.error.code(),
                    "evaluation aborted, keeping partial output:\n{}",
                    failure.error.to_diagnostic().render(&expanded)
                );
                Resolution {
                    text: failure.partial.trim().to_string(),
                    expanded,
                    outcome: Outcome::Aborted(failure.error),
                }
            }
        }
    }
}
