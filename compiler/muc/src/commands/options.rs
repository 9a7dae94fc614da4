//! Flags shared by the `mu` subcommands.

use std::path::PathBuf;

use mu_wildcard::TagMode;

use crate::config::MuConfig;
use crate::preamble::PreambleSource;

/// Parsed `--flag=value` options plus positional arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub seed: u64,
    pub wildcard_dir: Option<PathBuf>,
    pub model_dir: Option<PathBuf>,
    pub preamble: Option<String>,
    pub count: Option<usize>,
    pub mode: Option<TagMode>,
    pub json: bool,
    pub positional: Vec<String>,
}

impl CliOptions {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = CliOptions::default();
        for arg in args {
            if let Some(seed) = arg.strip_prefix("--seed=") {
                options.seed = seed
                    .parse()
                    .map_err(|_| format!("invalid seed '{seed}'"))?;
            } else if let Some(dir) = arg.strip_prefix("--wildcards=") {
                options.wildcard_dir = Some(PathBuf::from(dir));
            } else if let Some(dir) = arg.strip_prefix("--models=") {
                options.model_dir = Some(PathBuf::from(dir));
            } else if let Some(list) = arg.strip_prefix("--preamble=") {
                options.preamble = Some(list.to_string());
            } else if let Some(count) = arg.strip_prefix("--count=") {
                options.count = Some(
                    count
                        .parse()
                        .map_err(|_| format!("invalid count '{count}'"))?,
                );
            } else if let Some(mode) = arg.strip_prefix("--mode=") {
                options.mode = Some(mode.parse()?);
            } else if arg == "--json" {
                options.json = true;
            } else if arg.starts_with("--") {
                return Err(format!("unknown option '{arg}'"));
            } else {
                options.positional.push(arg.clone());
            }
        }
        Ok(options)
    }

    /// Environment configuration with flags applied on top.
    pub fn config(&self) -> MuConfig {
        let mut config = MuConfig::from_env();
        if let Some(dir) = &self.wildcard_dir {
            config.wildcard_dir.clone_from(dir);
        }
        if let Some(dir) = &self.model_dir {
            config.model_dir.clone_from(dir);
        }
        if let Some(list) = &self.preamble {
            config.preamble = PreambleSource::parse_list(list);
        }
        config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_flags_and_positionals() {
        let options = CliOptions::parse(&args(&[
            "prompt.txt",
            "--seed=42",
            "--wildcards=w",
            "--mode=weighted",
            "--count=3",
            "--json",
        ]))
        .unwrap();
        assert_eq!(options.seed, 42);
        assert_eq!(options.wildcard_dir, Some(PathBuf::from("w")));
        assert_eq!(options.mode, Some(TagMode::Weighted));
        assert_eq!(options.count, Some(3));
        assert!(options.json);
        assert_eq!(options.positional, vec!["prompt.txt"]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(CliOptions::parse(&args(&["--seed=x"])).is_err());
        assert!(CliOptions::parse(&args(&["--mode=best"])).is_err());
        assert!(CliOptions::parse(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn flags_override_config() {
        let options = CliOptions::parse(&args(&["--models=m", "--preamble=a.mu"])).unwrap();
        let config = options.config();
        assert_eq!(config.model_dir, PathBuf::from("m"));
        assert_eq!(
            config.preamble,
            vec![PreambleSource::File(PathBuf::from("a.mu"))]
        );
    }
}
