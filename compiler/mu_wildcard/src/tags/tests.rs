use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::WildcardRng;

fn write_model(dir: &Path, file: &str, header: &serde_json::Value) {
    let json = serde_json::to_vec(header).unwrap();
    let mut bytes = (json.len() as u64).to_le_bytes().to_vec();
    bytes.extend_from_slice(&json);
    bytes.extend_from_slice(&[0u8; 16]);
    std::fs::write(dir.join(file), bytes).unwrap();
}

fn frequency_header(frequency: serde_json::Value) -> serde_json::Value {
    json!({
        "__metadata__": { "ss_tag_frequency": frequency },
        "weight": { "dtype": "F16", "shape": [1], "data_offsets": [0, 2] }
    })
}

fn sample() -> serde_json::Value {
    frequency_header(json!({
        "1_style": { "red_hair": 5, "smile": 2, " blue eyes ": "4" },
        "2_extra": { "smile": 4, "red hair": 1, "hat": 3.0 }
    }))
}

fn names(records: &[TagRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn aggregates_and_ranks() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "style.safetensors", &sample());
    let tags = extract_tags(&dir.path().join("style.safetensors")).unwrap();
    assert_eq!(
        tags,
        vec![
            TagRecord { name: "red hair".into(), count: 6 },
            TagRecord { name: "smile".into(), count: 6 },
            TagRecord { name: "blue eyes".into(), count: 4 },
            TagRecord { name: "hat".into(), count: 3 },
        ]
    );
}

#[test]
fn encoded_frequency_string() {
    let encoded = json!({ "b": { "a_b": 2, "c": 7 } }).to_string();
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "enc.safetensors", &frequency_header(json!(encoded)));
    let tags = extract_tags(&dir.path().join("enc.safetensors")).unwrap();
    assert_eq!(names(&tags), vec!["c", "a b"]);
}

#[test]
fn ties_keep_first_seen_order() {
    let metadata = json!({ "ss_tag_frequency": { "b": { "z": 1, "y": 1, "x": 2 } } });
    let metadata = metadata.as_object().unwrap();
    let tags = tag_frequencies(metadata, Path::new("m")).unwrap();
    assert_eq!(names(&tags), vec!["x", "z", "y"]);
}

#[test]
fn skips_unusable_counts() {
    let metadata = json!({ "ss_tag_frequency": {
        "b": { "ok": 1, "neg": -3, "word": "many", "null": null },
        "flat": 4
    } });
    let tags = tag_frequencies(metadata.as_object().unwrap(), Path::new("m")).unwrap();
    assert_eq!(names(&tags), vec!["ok"]);
}

#[test]
fn missing_metadata() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "plain.safetensors", &json!({ "w": {} }));
    let err = extract_tags(&dir.path().join("plain.safetensors")).unwrap_err();
    assert!(matches!(err, TagError::NoTagMetadata { .. }));
    assert_eq!(err.code(), mu_diagnostic::ErrorCode::E4006);
}

#[test]
fn unreadable_and_malformed_headers() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_tags(&dir.path().join("absent.safetensors")).unwrap_err();
    assert!(matches!(err, TagError::Unreadable { .. }));

    let short = dir.path().join("short.safetensors");
    std::fs::write(&short, [1u8, 2, 3]).unwrap();
    assert!(matches!(
        read_header(&short),
        Err(TagError::MalformedHeader { .. })
    ));

    let huge = dir.path().join("huge.safetensors");
    std::fs::write(&huge, (MAX_HEADER_LEN + 1).to_le_bytes()).unwrap();
    assert!(matches!(
        read_header(&huge),
        Err(TagError::MalformedHeader { .. })
    ));

    let truncated = dir.path().join("truncated.safetensors");
    let mut bytes = 100u64.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"{}");
    std::fs::write(&truncated, bytes).unwrap();
    assert!(matches!(
        read_header(&truncated),
        Err(TagError::MalformedHeader { .. })
    ));

    let garbage = dir.path().join("garbage.safetensors");
    let mut bytes = 4u64.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"nope");
    std::fs::write(&garbage, bytes).unwrap();
    let err = read_header(&garbage).unwrap_err();
    assert_eq!(err.code(), mu_diagnostic::ErrorCode::E4005);
}

#[test]
fn model_paths() {
    let dir = Path::new("/models");
    assert_eq!(
        model_path(dir, "style").unwrap(),
        Path::new("/models/style.safetensors")
    );
    assert_eq!(model_path(dir, "style.pt").unwrap(), Path::new("/models/style.pt"));
    assert_eq!(
        model_path(dir, "people/alice").unwrap(),
        Path::new("/models/people/alice.safetensors")
    );
}

#[test]
fn model_names_must_stay_in_the_model_directory() {
    let dir = Path::new("/models");
    for name in ["../outside", "a/../../b", "/etc/passwd", "./style", ""] {
        let err = model_path(dir, name).unwrap_err();
        assert!(matches!(err, TagError::InvalidModelName { .. }), "{name}");
        assert_eq!(err.code(), mu_diagnostic::ErrorCode::E4007);
    }
}

#[test]
fn expand_refuses_models_outside_the_directory() {
    let root = tempfile::tempdir().unwrap();
    let models = root.path().join("models");
    std::fs::create_dir(&models).unwrap();
    write_model(root.path(), "outside.safetensors", &sample());
    assert_eq!(expand_tags("[TAG<../outside, 2>]", 0, &models), "[]");
    let absolute = root.path().join("outside");
    let token = format!("[TAG<{}, 2>]", absolute.display());
    assert_eq!(expand_tags(&token, 0, &models), "[]");
}

#[test]
fn mode_parsing() {
    assert_eq!("top".parse::<TagMode>(), Ok(TagMode::Top));
    assert_eq!("Weighted".parse::<TagMode>(), Ok(TagMode::Weighted));
    assert!("best".parse::<TagMode>().is_err());
}

fn ranked() -> Vec<TagRecord> {
    (0..20u64)
        .map(|i| TagRecord {
            name: format!("t{i}"),
            count: 20 - i,
        })
        .collect()
}

#[test]
fn select_top() {
    let mut rng = WildcardRng::new(0);
    assert_eq!(
        select_tags(&ranked(), 3, TagMode::Top, &mut rng),
        vec!["t0", "t1", "t2"]
    );
    assert_eq!(select_tags(&ranked()[..2], 5, TagMode::Top, &mut rng).len(), 2);
}

#[test]
fn select_random_is_seeded_and_distinct() {
    let a = select_tags(&ranked(), 5, TagMode::Random, &mut WildcardRng::new(9));
    let b = select_tags(&ranked(), 5, TagMode::Random, &mut WildcardRng::new(9));
    assert_eq!(a, b);
    let unique: std::collections::HashSet<_> = a.iter().collect();
    assert_eq!(unique.len(), 5);
}

#[test]
fn select_weighted_is_seeded_and_distinct() {
    let a = select_tags(&ranked(), 4, TagMode::Weighted, &mut WildcardRng::new(1));
    let b = select_tags(&ranked(), 4, TagMode::Weighted, &mut WildcardRng::new(1));
    assert_eq!(a, b);
    let unique: std::collections::HashSet<_> = a.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn expand_tag_tokens() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "style.safetensors", &sample());
    assert_eq!(
        expand_tags("a, TAG<style, 2>, b", 0, dir.path()),
        "a, red hair, smile, b"
    );
    assert_eq!(
        expand_tags("TAG<style>", 0, dir.path()),
        "red hair, smile, blue eyes, hat"
    );
    assert_eq!(expand_tags("TAG< style , 1, top >", 0, dir.path()), "red hair");
}

#[test]
fn expand_is_reproducible_per_seed() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "style.safetensors", &sample());
    let text = "TAG<style, 2, random> | TAG<style, 2, weighted>";
    assert_eq!(expand_tags(text, 5, dir.path()), expand_tags(text, 5, dir.path()));
}

#[test]
fn expand_failures_leave_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "style.safetensors", &sample());
    assert_eq!(expand_tags("[TAG<missing, 3>]", 0, dir.path()), "[]");
    assert_eq!(expand_tags("[TAG<style, 3, best>]", 0, dir.path()), "[]");
    assert_eq!(expand_tags("no tags here", 0, dir.path()), "no tags here");
}

#[test]
fn expander_reads_each_model_once() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), "style.safetensors", &sample());
    let mut expander = TagExpander::new(dir.path(), 0);
    assert_eq!(expander.expand("TAG<style, 1>"), "red hair");
    std::fs::remove_file(dir.path().join("style.safetensors")).unwrap();
    assert_eq!(expander.expand("TAG<style, 1>"), "red hair");
}
