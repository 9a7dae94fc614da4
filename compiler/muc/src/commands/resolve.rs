//! The `resolve` command: run the full pipeline on a prompt file.

use crate::pipeline::{Outcome, Resolver};

use super::{read_input, single_positional, CliOptions};

/// Resolve a prompt and print the result. Exits non-zero when the prompt
/// could not be fully resolved, after printing what was produced.
pub fn resolve_file(options: &CliOptions) {
    let path = single_positional(options, "mu resolve <file|-> [--seed=N] [options]");
    let text = read_input(path);

    let resolver = match Resolver::from_config(&options.config()) {
        Ok(resolver) => resolver,
        Err(err) => {
            eprintln!("error[{}]: {err}", err.code());
            std::process::exit(1);
        }
    };

    let resolution = resolver.resolve(&text, options.seed);
    println!("{}", resolution.text);

    match &resolution.outcome {
        Outcome::Complete { recovered: 0 } => {}
        Outcome::Complete { recovered } => {
            eprintln!("warning: {recovered} recursive reference(s) left empty");
        }
        Outcome::SyntaxError(err) => {
            eprint!("{}", err.to_diagnostic().render(&resolution.expanded));
            std::process::exit(1);
        }
        Outcome::Aborted(err) => {
            eprint!("{}", err.to_diagnostic().render(&resolution.expanded));
            std::process::exit(1);
        }
    }
}
