//! Where word lists come from.

use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::WildcardError;

/// File extension of word lists under a [`DirSource`].
pub const WORD_LIST_EXTENSION: &str = "txt";

/// Whether `name`, joined onto a base directory, stays below it: not empty,
/// relative, and free of `..` and `.` segments.
pub(crate) fn is_contained_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && Path::new(name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// A provider of named word lists.
pub trait WordSource {
    /// Candidate lines for `name`: trimmed, blank lines dropped.
    fn load(&self, name: &str) -> Result<Vec<String>, WildcardError>;
}

/// Word lists as `<base>/<name>.txt` files.
#[derive(Clone, Debug)]
pub struct DirSource {
    base: PathBuf,
}

impl DirSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        DirSource { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the list file for `name`. Names may contain `/` for
    /// subdirectories but must stay below the base directory.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, WildcardError> {
        if !is_contained_name(name) {
            return Err(WildcardError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.base.join(format!("{name}.{WORD_LIST_EXTENSION}")))
    }
}

impl WordSource for DirSource {
    fn load(&self, name: &str) -> Result<Vec<String>, WildcardError> {
        let path = self.path_for(name)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::trace!(path = %path.display(), "read word list");
                Ok(split_lines(&text))
            }
            Err(source) => Err(WildcardError::NotFound {
                name: name.to_string(),
                path,
                source,
            }),
        }
    }
}

/// In-memory word lists, for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    lists: FxHashMap<String, Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a list from newline-separated text.
    pub fn insert(&mut self, name: impl Into<String>, text: &str) {
        self.lists.insert(name.into(), split_lines(text));
    }

    #[must_use]
    pub fn with_list(mut self, name: impl Into<String>, text: &str) -> Self {
        self.insert(name, text);
        self
    }
}

impl WordSource for MemorySource {
    fn load(&self, name: &str) -> Result<Vec<String>, WildcardError> {
        self.lists
            .get(name)
            .cloned()
            .ok_or_else(|| WildcardError::NotFound {
                name: name.to_string(),
                path: PathBuf::from(name),
                source: std::io::ErrorKind::NotFound.into(),
            })
    }
}

/// One candidate per non-blank line, trimmed.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
