//! Dumps discovered module records as JSON.
//!
//! Small helper for external tooling and fixtures: runs the discovery layer
//! only (no validation, no resolution) so the raw record set can be
//! inspected or diffed.

use anyhow::Result;
use modplan::discover_modules;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let root = parse_root();
    let records = discover_modules(&root)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn parse_root() -> PathBuf {
    let mut args = env::args().skip(1);
    let Some(first) = args.next() else {
        usage();
    };
    if matches!(first.as_str(), "-h" | "--help") {
        usage();
    }
    if args.next().is_some() {
        usage();
    }
    PathBuf::from(first)
}

fn usage() -> ! {
    eprintln!("Usage: list-modules MODULES_DIR");
    std::process::exit(1);
}
