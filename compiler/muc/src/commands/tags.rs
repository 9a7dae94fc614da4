//! The `tags` command: show the ranked tags of a model.

use std::path::PathBuf;

use mu_wildcard::tags::{model_path, select_tags, DEFAULT_TAG_COUNT};
use mu_wildcard::{extract_tags, TagMode, TagRecord, WildcardRng};

use super::{single_positional, CliOptions};

/// `mu tags <model>`: an existing path is read directly, anything else is
/// looked up in the model directory like `TAG<model>`.
pub fn list_tags(options: &CliOptions) {
    let model = single_positional(
        options,
        "mu tags <model> [--count=N] [--mode=top|random|weighted] [--seed=N] [--json]",
    );
    let direct = PathBuf::from(model);
    let path = if direct.is_file() {
        direct
    } else {
        match model_path(&options.config().model_dir, model) {
            Ok(path) => path,
            Err(err) => {
                eprintln!("{}", err.to_diagnostic());
                std::process::exit(1);
            }
        }
    };

    let records = match extract_tags(&path) {
        Ok(records) => records,
        Err(err) => {
            eprintln!("{}", err.to_diagnostic());
            std::process::exit(1);
        }
    };

    let count = options.count.unwrap_or(DEFAULT_TAG_COUNT);
    let mode = options.mode.unwrap_or_default();
    let picked: Vec<TagRecord> = match mode {
        TagMode::Top => records.into_iter().take(count).collect(),
        TagMode::Random | TagMode::Weighted => {
            let mut rng = WildcardRng::new(options.seed);
            let names = select_tags(&records, count, mode, &mut rng);
            names
                .into_iter()
                .filter_map(|name| records.iter().find(|r| r.name == name).cloned())
                .collect()
        }
    };

    if options.json {
        match serde_json::to_string_pretty(&picked) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error serializing tags: {e}");
                std::process::exit(1);
            }
        }
    } else {
        for record in &picked {
            println!("{:>8}  {}", record.count, record.name);
        }
    }
}
