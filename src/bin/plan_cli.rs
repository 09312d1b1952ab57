//! Top-level CLI for the activation planner.
//!
//! Runs the full pipeline over a modules root: discover candidate modules
//! (through the record cache unless disabled), validate the records, resolve
//! the activation order, and print the plan as text or JSON. Unsatisfiable
//! modules are reported, not treated as a failure; the process only exits
//! non-zero for malformed input or I/O problems.

use anyhow::{Result, bail};
use modplan::{
    ModuleRecord, build_report, cache_disabled, default_cache_path, discover_modules,
    load_cached_records, render_text, resolve, store_records, validate_records,
};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let records = gather_records(&cli)?;

    let errors = validate_records(&records);
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{error}");
        }
        bail!("{} module record problem(s); refusing to resolve", errors.len());
    }

    let resolution = resolve(&records)?;
    let report = build_report(&records, &resolution);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

struct Cli {
    modules_root: PathBuf,
    cache_path: Option<PathBuf>,
    json: bool,
    no_cache: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut modules_root = None;
        let mut cache_path = None;
        let mut json = false;
        let mut no_cache = false;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => usage(0),
                "--json" => json = true,
                "--no-cache" => no_cache = true,
                "--cache" => {
                    let Some(value) = args.next() else {
                        bail!("--cache requires a file path");
                    };
                    cache_path = Some(PathBuf::from(value));
                }
                other if other.starts_with('-') => {
                    eprintln!("Unknown flag: {other}");
                    usage(1);
                }
                other => {
                    if modules_root.is_some() {
                        eprintln!("Unexpected extra argument: {other}");
                        usage(1);
                    }
                    modules_root = Some(PathBuf::from(other));
                }
            }
        }

        let Some(modules_root) = modules_root else {
            usage(1);
        };
        Ok(Self {
            modules_root,
            cache_path,
            json,
            no_cache,
        })
    }
}

/// Fetch records through the cache when permitted, falling back to a fresh
/// discovery pass. A failed cache write never fails the run.
fn gather_records(cli: &Cli) -> Result<Vec<ModuleRecord>> {
    let cache_path = cli
        .cache_path
        .clone()
        .unwrap_or_else(|| default_cache_path(&cli.modules_root));
    let use_cache = !cli.no_cache && !cache_disabled();

    if use_cache {
        if let Some(records) = load_cached_records(&cache_path) {
            return Ok(records);
        }
    }

    let records = discover_modules(&cli.modules_root)?;
    if use_cache {
        if let Err(err) = store_records(&cache_path, &records) {
            tracing::debug!("unable to write cache: {err:#}");
        }
    }
    Ok(records)
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: plan [--json] [--no-cache] [--cache FILE] MODULES_DIR\n\nOptions:\n  --json          Emit the activation plan as pretty-printed JSON.\n  --no-cache      Skip reading and writing the record cache.\n  --cache FILE    Cache location (default: MODULES_DIR/.modplan-cache.json).\n\nThe MODPLAN_NOCACHE environment variable disables the cache as well.\nLog verbosity follows RUST_LOG (default: warn)."
    );
    std::process::exit(code);
}
