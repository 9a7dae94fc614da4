//! Pipeline configuration from the environment.

use std::path::PathBuf;

use crate::preamble::PreambleSource;

pub const WILDCARD_DIR_VAR: &str = "MU_WILDCARD_BASEDIR";
pub const TAG_MODEL_DIR_VAR: &str = "MU_TAG_MODEL_DIR";
pub const PREAMBLE_VAR: &str = "MU_PREAMBLE";

pub const DEFAULT_WILDCARD_DIR: &str = "wildcards";
pub const DEFAULT_TAG_MODEL_DIR: &str = "models/loras";
pub const DEFAULT_PREAMBLE: &str = "default";

/// Where the pipeline finds its files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MuConfig {
    /// Base directory of `<name>.txt` word lists.
    pub wildcard_dir: PathBuf,
    /// Directory that `TAG<name>` model names resolve under.
    pub model_dir: PathBuf,
    /// Preamble files, evaluated in order.
    pub preamble: Vec<PreambleSource>,
}

impl Default for MuConfig {
    fn default() -> Self {
        MuConfig {
            wildcard_dir: PathBuf::from(DEFAULT_WILDCARD_DIR),
            model_dir: PathBuf::from(DEFAULT_TAG_MODEL_DIR),
            preamble: PreambleSource::parse_list(DEFAULT_PREAMBLE),
        }
    }
}

impl MuConfig {
    /// Read `MU_WILDCARD_BASEDIR`, `MU_TAG_MODEL_DIR` and `MU_PREAMBLE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or empty variables
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = MuConfig::default();
        if let Some(dir) = get(WILDCARD_DIR_VAR) {
            config.wildcard_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(TAG_MODEL_DIR_VAR) {
            config.model_dir = PathBuf::from(dir);
        }
        if let Some(list) = get(PREAMBLE_VAR) {
            config.preamble = PreambleSource::parse_list(&list);
        }
        tracing::debug!(?config, "configuration");
        config
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = MuConfig::from_lookup(|_| None);
        assert_eq!(config, MuConfig::default());
        assert_eq!(config.preamble, vec![PreambleSource::Bundled]);
    }

    #[test]
    fn variables_override() {
        let config = MuConfig::from_lookup(|key| match key {
            WILDCARD_DIR_VAR => Some("/w".to_string()),
            TAG_MODEL_DIR_VAR => Some("  ".to_string()),
            PREAMBLE_VAR => Some("default; extra.mu".to_string()),
            _ => None,
        });
        assert_eq!(config.wildcard_dir, PathBuf::from("/w"));
        assert_eq!(config.model_dir, PathBuf::from(DEFAULT_TAG_MODEL_DIR));
        assert_eq!(
            config.preamble,
            vec![
                PreambleSource::Bundled,
                PreambleSource::File(PathBuf::from("extra.mu"))
            ]
        );
    }
}
