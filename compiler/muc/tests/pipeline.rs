#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test code; panics give clear failure messages"
)]

//! End-to-end tests of the resolution pipeline.
//!
//! ```bash
//! cargo test -p muc --test pipeline
//! ```

use std::path::Path;

use mu_diagnostic::ErrorCode;
use mu_wildcard::MemorySource;
use muc::{MuConfig, Outcome, Preamble, PreambleSource, Resolver};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const COLORS: &str = "red\nblue\ngreen\nyellow\npurple\norange\n";

fn words() -> MemorySource {
    MemorySource::new()
        .with_list("colors", COLORS)
        .with_list("animals", "cat\ndog\nowl\nfox\nhare")
        .with_list("styles", "$emph(oil painting)\n$deemph(sketch)")
}

fn bundled() -> Preamble {
    Preamble::load(&[PreambleSource::Bundled]).unwrap()
}

fn resolver() -> Resolver<MemorySource> {
    Resolver::new(bundled(), words(), "/nonexistent")
}

fn bare() -> Resolver<MemorySource> {
    Resolver::new(Preamble::new(), words(), "/nonexistent")
}

fn write_model(dir: &Path, name: &str, frequency: &serde_json::Value) {
    let header = serde_json::json!({ "__metadata__": { "ss_tag_frequency": frequency } });
    let json = serde_json::to_vec(&header).unwrap();
    let mut bytes = (json.len() as u64).to_le_bytes().to_vec();
    bytes.extend_from_slice(&json);
    std::fs::write(dir.join(name), bytes).unwrap();
}

#[test]
fn wildcard_selection_is_reproducible() {
    let resolver = resolver();
    let first = resolver.select("$colors$", 1);
    assert!(COLORS.lines().any(|line| line == first), "{first}");
    for _ in 0..5 {
        assert_eq!(resolver.select("$colors$", 1), first);
    }
}

#[test]
fn offset_is_stable_across_preceding_tokens() {
    let resolver = resolver();
    for seed in 0..20 {
        let alone = resolver.select("$colors+1$", seed);
        let after = resolver.select("$animals$ $animals$ $colors$ | $colors+1$", seed);
        let last = after.rsplit(" | ").next().unwrap();
        assert_eq!(last, alone);
    }
}

#[test]
fn add_with_default() {
    let source = "$add(a, b=1) = { <=a+b=> }\n$add(5)";
    assert_eq!(bare().select(source, 0), "6");
}

#[test]
fn plain_text_is_only_trimmed() {
    let text = "  masterpiece, a cat (sitting:1.2), [day:night:0.5]  \n";
    assert_eq!(resolver().select(text, 3), text.trim());
}

#[test]
fn bundled_preamble_is_available() {
    assert_eq!(resolver().select("$weight(cat, 1.3), $and(a, b)", 0), "(cat:1.3), a AND b");
}

#[test]
fn wildcards_feed_the_macro_stage() {
    let resolver = resolver();
    for seed in 0..10 {
        let out = resolver.select("$styles$", seed);
        assert!(out == "(oil painting:1.2)" || out == "(sketch:0.8)", "{out}");
    }
}

#[test]
fn wildcard_inside_call_argument() {
    let resolver = resolver();
    let color = resolver.select("$colors$", 7);
    assert_eq!(resolver.select("$emph($colors$ hair)", 7), format!("({color} hair:1.2)"));
}

#[test]
fn syntax_error_returns_input() {
    let text = "a cat ) sitting";
    let resolution = resolver().resolve(text, 0);
    assert_eq!(resolution.text, text);
    let Outcome::SyntaxError(err) = &resolution.outcome else {
        panic!("expected a syntax error, got {:?}", resolution.outcome);
    };
    assert_eq!(err.code(), ErrorCode::E1001);
}

#[test]
fn evaluation_error_keeps_partial_output() {
    let resolution = resolver().resolve("a cat, $nowhere, sitting", 0);
    assert_eq!(resolution.text, "a cat,");
    assert!(matches!(
        &resolution.outcome,
        Outcome::Aborted(err) if err.code() == ErrorCode::E2001
    ));
}

#[test]
fn recursion_empties_only_the_node() {
    let resolution = bare().resolve("$a = $b; $b = $a;\nx $a y", 0);
    assert_eq!(resolution.text, "x  y");
    assert!(matches!(resolution.outcome, Outcome::Complete { recovered: 1 }));
}

#[test]
fn missing_word_list_leaves_nothing() {
    assert_eq!(resolver().select("a $missing$ b", 0), "a  b");
}

#[test]
fn tags_from_model_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_model(
        dir.path(),
        "style.safetensors",
        &serde_json::json!({ "b": { "soft_light": 9, "film_grain": 4, "bokeh": 6 } }),
    );
    let resolver = Resolver::new(bundled(), words(), dir.path());
    assert_eq!(
        resolver.select("photo, TAG<style, 2>", 0),
        "photo, soft light, bokeh"
    );
    assert_eq!(resolver.select("$emph(TAG<style, 1>)", 0), "(soft light:1.2)");
}

#[test]
fn tag_models_outside_the_model_directory_expand_to_nothing() {
    let root = tempfile::tempdir().unwrap();
    let models = root.path().join("models");
    std::fs::create_dir(&models).unwrap();
    write_model(
        root.path(),
        "outside.safetensors",
        &serde_json::json!({ "b": { "secret_tag": 5 } }),
    );
    let resolver = Resolver::new(Preamble::new(), words(), &models);
    assert_eq!(resolver.select("a TAG<../outside> b", 0), "a  b");
}

#[test]
fn stray_quote_is_literal_text() {
    assert_eq!(bare().select("$x = tall; 5\" $x", 0), "5\" tall");
    assert!(bare().resolve("a \"b $x = c; $x", 0).is_complete());
}

#[test]
fn resolver_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let lists = dir.path().join("lists");
    std::fs::create_dir(&lists).unwrap();
    std::fs::write(lists.join("subject.txt"), "a lighthouse\n").unwrap();
    let extra = dir.path().join("extra.mu");
    std::fs::write(&extra, "# mine\n$scene(x) = {$x at dusk}\n").unwrap();

    let config = MuConfig {
        wildcard_dir: lists,
        model_dir: dir.path().join("models"),
        preamble: vec![PreambleSource::Bundled, PreambleSource::File(extra)],
    };
    let resolver = Resolver::from_config(&config).unwrap();
    assert_eq!(
        resolver.select("$emph($scene($subject$))", 0),
        "(a lighthouse at dusk:1.2)"
    );
}

#[test]
fn broken_preamble_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.mu");
    std::fs::write(&bad, "$oops = (").unwrap();
    let config = MuConfig {
        preamble: vec![PreambleSource::File(bad)],
        ..MuConfig::default()
    };
    let err = Resolver::from_config(&config).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5002);
}

#[test]
fn resolver_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}
    let resolver = resolver();
    assert_send_sync(&resolver);

    let expected = resolver.select("$colors$ $animals$", 11);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolver.select("$colors$ $animals$", 11)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

proptest! {
    #[test]
    fn select_is_deterministic(seed in any::<u64>(), picks in 0usize..5) {
        let resolver = resolver();
        let text = "$colors$ $animals+2$ ".repeat(picks);
        prop_assert_eq!(resolver.select(&text, seed), resolver.select(&text, seed));
    }
}
