//! Tracing subscriber setup for the binary.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Install the global subscriber: `RUST_LOG` filtering (default `info`),
/// human-readable output on stderr so stdout stays free for JSON.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if let Err(err) = tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init() {
        eprintln!("Warning: tracing subscriber already installed: {}", err);
    }
}
