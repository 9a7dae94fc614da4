//! Command handlers for the `mu` CLI.
//!
//! Each submodule implements one subcommand. Shared input handling lives
//! here.

mod debug;
mod explain;
mod options;
mod resolve;
mod tags;

pub use debug::{eval_expression, list_functions, parse_file};
pub use explain::explain_error;
pub use options::CliOptions;
pub use resolve::resolve_file;
pub use tags::list_tags;

use std::io::Read;

/// Read a file, or stdin for `-`, exiting with a readable message on failure.
pub(crate) fn read_input(path: &str) -> String {
    if path == "-" {
        let mut text = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut text) {
            eprintln!("error reading stdin: {e}");
            std::process::exit(1);
        }
        return text;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// The single positional argument of a subcommand, or exit with `usage`.
pub(crate) fn single_positional<'a>(options: &'a CliOptions, usage: &str) -> &'a str {
    match options.positional.as_slice() {
        [one] => one,
        _ => {
            eprintln!("Usage: {usage}");
            std::process::exit(1);
        }
    }
}
