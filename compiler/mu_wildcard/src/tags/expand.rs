//! `TAG<name[, count[, mode]]>` expansion.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use super::{extract_tags, model_path, TagRecord};
use crate::WildcardRng;

/// Tags produced when a request gives no count.
pub const DEFAULT_TAG_COUNT: usize = 10;

/// How tags are picked from a model's ranking.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TagMode {
    /// The most frequent tags, in rank order.
    #[default]
    Top,
    /// A uniform sample without replacement.
    Random,
    /// A sample without replacement, weighted by count.
    Weighted,
}

impl FromStr for TagMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(TagMode::Top),
            "random" => Ok(TagMode::Random),
            "weighted" => Ok(TagMode::Weighted),
            other => Err(format!(
                "unknown tag mode `{other}` (expected top, random or weighted)"
            )),
        }
    }
}

impl fmt::Display for TagMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TagMode::Top => "top",
            TagMode::Random => "random",
            TagMode::Weighted => "weighted",
        })
    }
}

/// A parsed `TAG<...>` token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRequest {
    pub model: String,
    pub count: usize,
    pub mode: TagMode,
}

impl TagRequest {
    fn from_captures(caps: &Captures<'_>) -> Result<Self, String> {
        let count = match caps.get(2) {
            Some(digits) => digits
                .as_str()
                .parse()
                .map_err(|_| format!("tag count `{}` is too large", digits.as_str()))?,
            None => DEFAULT_TAG_COUNT,
        };
        let mode = match caps.get(3) {
            Some(mode) => mode.as_str().parse()?,
            None => TagMode::default(),
        };
        Ok(TagRequest {
            model: caps[1].to_string(),
            count,
            mode,
        })
    }
}

#[allow(clippy::expect_used)]
fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"TAG<\s*([^<>,]+?)\s*(?:,\s*([0-9]+)\s*)?(?:,\s*([A-Za-z]+)\s*)?>")
            .expect("tag pattern is valid")
    })
}

/// Expand every `TAG<...>` token in `text` against models under `model_dir`.
#[tracing::instrument(level = "debug", skip_all, fields(seed = seed))]
pub fn expand_tags(text: &str, seed: u64, model_dir: &Path) -> String {
    TagExpander::new(model_dir, seed).expand(text)
}

/// One expansion call: a generator plus the models read so far.
pub struct TagExpander<'d> {
    model_dir: &'d Path,
    rng: WildcardRng,
    models: FxHashMap<PathBuf, Option<Rc<[TagRecord]>>>,
}

impl<'d> TagExpander<'d> {
    pub fn new(model_dir: &'d Path, seed: u64) -> Self {
        TagExpander {
            model_dir,
            rng: WildcardRng::new(seed),
            models: FxHashMap::default(),
        }
    }

    pub fn expand(&mut self, text: &str) -> String {
        tag_pattern()
            .replace_all(text, |caps: &Captures<'_>| {
                match TagRequest::from_captures(caps) {
                    Ok(request) => self.select(&request).join(", "),
                    Err(reason) => {
                        tracing::warn!(token = &caps[0], "{reason}");
                        String::new()
                    }
                }
            })
            .into_owned()
    }

    /// Tag names for `request`, or nothing if the model cannot be read.
    pub fn select(&mut self, request: &TagRequest) -> Vec<String> {
        let Some(records) = self.model(&request.model) else {
            return Vec::new();
        };
        let picked = select_tags(&records, request.count, request.mode, &mut self.rng);
        tracing::info!(
            model = %request.model,
            mode = %request.mode,
            tags = picked.len(),
            "selected tags"
        );
        picked
    }

    /// Ranked tags of `name`, read at most once per expander.
    fn model(&mut self, name: &str) -> Option<Rc<[TagRecord]>> {
        let path = match model_path(self.model_dir, name) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(code = %err.code(), "{err}");
                return None;
            }
        };
        self.models
            .entry(path)
            .or_insert_with_key(|path| match extract_tags(path) {
                Ok(records) => Some(records.into()),
                Err(err) => {
                    tracing::warn!(code = %err.code(), "{err}");
                    None
                }
            })
            .clone()
    }
}

/// Pick up to `count` tag names from ranked `records`.
#[allow(
    clippy::cast_precision_loss,
    reason = "weights only need relative magnitude"
)]
pub fn select_tags(
    records: &[TagRecord],
    count: usize,
    mode: TagMode,
    rng: &mut WildcardRng,
) -> Vec<String> {
    let names = |picked: Vec<&TagRecord>| -> Vec<String> {
        picked.into_iter().map(|r| r.name.clone()).collect()
    };
    match mode {
        TagMode::Top => names(records.iter().take(count).collect()),
        TagMode::Random => names(records.choose_multiple(rng, count).collect()),
        TagMode::Weighted => {
            match records.choose_multiple_weighted(rng, count, |r| r.count as f64) {
                Ok(picked) => names(picked.collect()),
                Err(err) => {
                    tracing::warn!("weighted tag selection failed: {err}");
                    Vec::new()
                }
            }
        }
    }
}
