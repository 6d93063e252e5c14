//! Ruleset linter — validate a RON rule file before shipping it.
//!
//! Usage: ruleset_linter <file.ron>
//!
//! Parses and compiles the rule file, reports the pipeline order, and
//! smoke-runs the compiled set against a known-messy sample. Exits nonzero
//! on any failure.

use std::path::Path;

use storycraft::core::normalize::RuleSet;

const SMOKE_SAMPLE: &str = "once upon a time   i dont know\nits the truth";

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Ruleset linter — validate a RON rule file.");
        println!();
        println!("Usage: ruleset_linter <file.ron>");
        std::process::exit(if args.len() == 2 { 0 } else { 1 });
    }

    let path = Path::new(&args[1]);
    let rules = match RuleSet::load_from_ron(path) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("FAIL: {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    if rules.is_empty() {
        eprintln!("FAIL: {}: rule list is empty", path.display());
        std::process::exit(1);
    }

    println!("{}: {} rules", path.display(), rules.len());
    for (i, config) in rules.configs().iter().enumerate() {
        println!("  {}. {}", i + 1, config.name());
    }

    // Smoke run: the pipeline must be total and idempotent.
    let once = rules.normalize(SMOKE_SAMPLE);
    let twice = rules.normalize(&once);
    if once != twice {
        eprintln!("FAIL: pipeline is not idempotent");
        eprintln!("  once:  {:?}", once);
        eprintln!("  twice: {:?}", twice);
        std::process::exit(1);
    }

    println!("Smoke sample: {:?}", once);
    println!("OK");
}
