//! roster-cli entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use roster_cli::{commands, config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    init_logging();

    let (config_path, args) = split_config_flag(std::env::args().skip(1).collect());
    if wants_help(&args) {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let outcome = config::load(config_path).and_then(|config| commands::run(&config, &args));
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("roster-cli: {e}");
            ExitCode::FAILURE
        }
    }
}

fn wants_help(args: &[String]) -> bool {
    matches!(
        args.first().map(String::as_str),
        None | Some("help") | Some("--help") | Some("-h")
    )
}

/// Pull `--config <path>` out of the argument list, leaving the command
/// and its positional arguments behind.
fn split_config_flag(args: Vec<String>) -> (Option<PathBuf>, Vec<String>) {
    let mut config_path = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            config_path = iter.next().map(PathBuf::from);
        } else {
            rest.push(arg);
        }
    }
    (config_path, rest)
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn print_usage() {
    println!("roster-cli - inspect the roster identity cache");
    println!();
    println!("Usage: roster-cli [--config <path>] <command>");
    println!();
    println!("Commands:");
    println!("  status                       Cache file, TTL, and record counts");
    println!("  lookup user <name-or-uid>    Print a cached user as JSON");
    println!("  lookup group <name-or-gid>   Print a cached group as JSON");
    println!("  map <name>                   Print the deterministic id for a name");
    println!("  check-config                 Validate the configuration and exit");
    println!();
    println!("The configuration path may also come from ROSTER_CONFIG.");
}
