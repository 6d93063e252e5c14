//! Polish — normalize a story draft from a file or stdin.
//!
//! Usage: polish [--rules <file.ron>] [<input-file>]
//!
//! Reads the input file (or stdin when no file is given), runs the
//! normalization pipeline, and prints the result. `--rules` swaps the
//! standard pipeline for one loaded from a RON rule file.

use std::io::Read;
use std::path::Path;

use storycraft::core::normalize::RuleSet;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut rules_path: Option<String> = None;
    let mut input_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--rules" if i + 1 < args.len() => {
                i += 1;
                rules_path = Some(args[i].clone());
            }
            arg if arg.starts_with("--") => {
                eprintln!("Unknown argument: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            arg => {
                input_path = Some(arg.to_string());
            }
        }
        i += 1;
    }

    let rules = match rules_path {
        Some(ref path) => match RuleSet::load_from_ron(Path::new(path)) {
            Ok(rules) => {
                eprintln!("Loaded {} rules from {}", rules.len(), path);
                rules
            }
            Err(e) => {
                eprintln!("ERROR loading rules {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => RuleSet::default(),
    };

    let text = match input_path {
        Some(ref path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("ERROR reading {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buf = String::new();
            if std::io::stdin().read_to_string(&mut buf).is_err() {
                eprintln!("ERROR reading stdin");
                std::process::exit(1);
            }
            buf
        }
    };

    print!("{}", rules.normalize(&text));
}

fn print_usage() {
    println!("Polish — normalize a story draft from a file or stdin.");
    println!();
    println!("Usage: polish [--rules <file.ron>] [<input-file>]");
    println!();
    println!("  --rules <file.ron>  Use a custom RON rule pipeline");
    println!("  <input-file>        Draft to normalize (stdin when omitted)");
}
