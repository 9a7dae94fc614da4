//! Inspection commands: `parse`, `expr` and `functions`.

use mu_expr::NoVariables;

use crate::preamble::Preamble;

use super::{read_input, CliOptions};

/// Parse a prompt and print its tree.
pub fn parse_file(path: &str) {
    let text = read_input(path);
    match mu_parse::parse(&text) {
        Ok(tree) => println!("{tree:#?}"),
        Err(err) => {
            eprint!("{}", err.to_diagnostic().render(&text));
            std::process::exit(1);
        }
    }
}

/// Evaluate a single expression with no variables.
pub fn eval_expression(source: &str) {
    match mu_expr::evaluate_expression(source, &mut NoVariables) {
        Ok(value) => println!("{value}"),
        Err(err) => {
            eprintln!("{}", err.to_diagnostic());
            std::process::exit(1);
        }
    }
}

/// Print the signatures the configured preamble defines.
pub fn list_functions(options: &CliOptions) {
    let config = options.config();
    let functions = Preamble::load(&config.preamble).and_then(|p| p.functions());
    match functions {
        Ok(functions) => {
            for signature in functions {
                println!("{signature}");
            }
        }
        Err(err) => {
            eprintln!("error[{}]: {err}", err.code());
            std::process::exit(1);
        }
    }
}
