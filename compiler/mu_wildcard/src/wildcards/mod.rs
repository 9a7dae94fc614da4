//! `$name[:filter...][+offset]$` expansion.
//!
//! Tokens are found left to right and replaced in discovery order with a
//! line drawn from the named word list. Chosen lines are not scanned again.
//!
//! A token without an offset draws from the call's shared sequence. A token
//! with `+N` replays the generator from the seeded origin and takes the
//! `N + 1`-th draw, so its choice depends only on the seed and the token,
//! never on the tokens around it.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::{WildcardError, WildcardRng, WordSource};

/// Offsets above this are clamped.
pub const MAX_OFFSET: u32 = 10_000;

/// A `:substring` or `:!substring` segment of a wildcard name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Include(String),
    Exclude(String),
}

impl Filter {
    pub fn accepts(&self, line: &str) -> bool {
        match self {
            Filter::Include(needle) => line.contains(needle.as_str()),
            Filter::Exclude(needle) => !line.contains(needle.as_str()),
        }
    }
}

/// A parsed wildcard token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WildcardToken {
    /// Word list name, the part before the first `:`.
    pub name: String,
    pub filters: Vec<Filter>,
    pub offset: Option<u32>,
}

impl WildcardToken {
    /// Build from the token body (`colors:red:!dark`) and offset digits.
    pub fn new(body: &str, offset: Option<&str>) -> Self {
        let mut parts = body.split(':');
        let name = parts.next().unwrap_or_default().to_string();
        let filters = parts
            .filter(|part| !part.is_empty() && *part != "!")
            .map(|part| match part.strip_prefix('!') {
                Some(excluded) => Filter::Exclude(excluded.to_string()),
                None => Filter::Include(part.to_string()),
            })
            .collect();
        let offset = offset.map(|digits| {
            let parsed = digits.parse::<u32>().unwrap_or(u32::MAX);
            if parsed > MAX_OFFSET {
                tracing::warn!(offset = digits, max = MAX_OFFSET, "wildcard offset clamped");
            }
            parsed.min(MAX_OFFSET)
        });
        WildcardToken {
            name,
            filters,
            offset,
        }
    }

    /// Whether `line` passes every filter.
    pub fn accepts(&self, line: &str) -> bool {
        self.filters.iter().all(|filter| filter.accepts(line))
    }
}

#[allow(clippy::expect_used)]
fn wildcard_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$([A-Za-z0-9_/.!:-]+)(?:\+([0-9]+))?\$")
            .expect("wildcard pattern is valid")
    })
}

/// Every wildcard token in `text`, in discovery order.
pub fn find_tokens(text: &str) -> Vec<WildcardToken> {
    wildcard_pattern()
        .captures_iter(text)
        .map(|caps| token_from(&caps))
        .collect()
}

fn token_from(caps: &Captures<'_>) -> WildcardToken {
    WildcardToken::new(&caps[1], caps.get(2).map(|m| m.as_str()))
}

/// Expand every wildcard in `text` with a generator seeded by `seed`.
#[tracing::instrument(level = "debug", skip_all, fields(seed = seed))]
pub fn resolve_wildcards(text: &str, seed: u64, source: &dyn WordSource) -> String {
    WildcardResolver::new(seed, source).resolve(text)
}

/// One resolution call: a generator plus the word lists loaded so far.
pub struct WildcardResolver<'s> {
    rng: WildcardRng,
    source: &'s dyn WordSource,
    lists: FxHashMap<String, Option<Vec<String>>>,
}

impl<'s> WildcardResolver<'s> {
    pub fn new(seed: u64, source: &'s dyn WordSource) -> Self {
        WildcardResolver {
            rng: WildcardRng::new(seed),
            source,
            lists: FxHashMap::default(),
        }
    }

    pub fn resolve(&mut self, text: &str) -> String {
        wildcard_pattern()
            .replace_all(text, |caps: &Captures<'_>| self.expand(&token_from(caps)))
            .into_owned()
    }

    fn expand(&mut self, token: &WildcardToken) -> String {
        let Some(lines) = load_cached(&mut self.lists, self.source, &token.name) else {
            return String::new();
        };
        let candidates: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|line| token.accepts(line))
            .collect();

        let pick = match token.offset {
            None => self.rng.choose(&candidates),
            // Counted from the seed, so `+0` repeats the first plain draw.
            Some(offset) => self.rng.choose_at_offset(&candidates, offset),
        };
        match pick {
            Some(word) => {
                tracing::info!(wildcard = %token.name, selected = %word, "selected wildcard");
                (*word).to_string()
            }
            None => {
                let err = WildcardError::Empty {
                    name: token.name.clone(),
                };
                tracing::warn!(code = %err.code(), "{err}");
                String::new()
            }
        }
    }
}

/// Load `name` once per call. Failures are logged on first load and cached.
fn load_cached<'l>(
    lists: &'l mut FxHashMap<String, Option<Vec<String>>>,
    source: &dyn WordSource,
    name: &str,
) -> Option<&'l Vec<String>> {
    lists
        .entry(name.to_string())
        .or_insert_with(|| match source.load(name) {
            Ok(lines) => Some(lines),
            Err(err) => {
                tracing::warn!(code = %err.code(), "{err}");
                None
            }
        })
        .as_ref()
}
