//! Mu prompt macro CLI.

use muc::commands::{
    eval_expression, explain_error, list_functions, list_tags, parse_file, resolve_file,
    CliOptions,
};

fn main() {
    muc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let options = || match CliOptions::parse(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    };

    match command.as_str() {
        "resolve" => resolve_file(&options()),
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: mu parse <file|->");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "expr" => {
            if args.len() < 3 {
                eprintln!("Usage: mu expr <source>");
                eprintln!("Example: mu expr 'clamp(7, 0, 5) * 2'");
                std::process::exit(1);
            }
            eval_expression(&args[2..].join(" "));
        }
        "tags" => list_tags(&options()),
        "functions" => list_functions(&options()),
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: mu explain <ERROR_CODE>");
                eprintln!("Example: mu explain E2010");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("mu {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Mu prompt macros");
    println!();
    println!("Usage: mu <command> [options]");
    println!();
    println!("Commands:");
    println!("  resolve <file|->     Expand wildcards, tags and macros in a prompt");
    println!("  parse <file|->       Print the macro parse tree");
    println!("  expr <source>        Evaluate one expression");
    println!("  tags <model>         List a model's tags by frequency");
    println!("  functions            List the preamble's functions");
    println!("  explain <code>       Explain a diagnostic code (e.g., E2010)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --seed=<n>           Seed for wildcards and tag sampling (default: 0)");
    println!("  --wildcards=<dir>    Word list directory (env: MU_WILDCARD_BASEDIR)");
    println!("  --models=<dir>       Model directory for TAG<...> (env: MU_TAG_MODEL_DIR)");
    println!("  --preamble=<list>    `;`-separated preamble files, `default` for the");
    println!("                       bundled one (env: MU_PREAMBLE)");
    println!();
    println!("Tag options:");
    println!("  --count=<n>          Number of tags (default: 10)");
    println!("  --mode=<mode>        top, random or weighted (default: top)");
    println!("  --json               Print JSON instead of a table");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=info        Show selected wildcards and results");
    println!("  MU_LOG_TREE=1        Render log spans as a tree");
    println!();
    println!("Examples:");
    println!("  mu resolve prompt.txt --seed=42");
    println!("  echo '$weight(cat)' | mu resolve -");
    println!("  mu expr 'steps(0, 1, 0.25)'");
    println!("  mu tags my_style --mode=weighted --count=5 --seed=3");
}
