//! Tracing subscriber bootstrap for the CLI.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber.
///
/// With `verbose` the default level is `debug`, otherwise `info`. `RUST_LOG`
/// overrides both. Repeated calls are no-ops.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}
