// zhseg-cli: shared utilities for the CLI tools.

use std::process;

/// Default shared data root; dictionaries and rule files are looked up
/// under `<root>/tsearch_data/`.
pub const DEFAULT_DATA_DIR: &str = "/usr/share/zhseg";

/// Install the tracing subscriber. Dictionary-load warnings and other
/// diagnostics go to stderr; `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Extract a `--name=VALUE` or `--name VALUE` flag from the args.
///
/// Returns `(value, remaining_args)`.
pub fn parse_value_flag(args: &[String], name: &str) -> (Option<String>, Vec<String>) {
    let long_eq = format!("{name}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(v) = arg.strip_prefix(&long_eq) {
            value = Some(v.to_string());
        } else if arg == name {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                eprintln!("error: {arg} requires a value");
                process::exit(1);
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Extract a boolean flag from the args. Returns `(present, remaining_args)`.
pub fn parse_bool_flag(args: &[String], name: &str) -> (bool, Vec<String>) {
    let present = args.iter().any(|a| a == name);
    let remaining = args.iter().filter(|a| *a != name).cloned().collect();
    (present, remaining)
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
