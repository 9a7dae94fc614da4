//! The `explain` command: describe a diagnostic code.

use mu_diagnostic::ErrorCode;

pub fn explain_error(code_str: &str) {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E1001, E2010, E4001");
        std::process::exit(1);
    };
    println!("{code}: {}", code.description());
}
