//! Logging infrastructure for revstamp.
//!
//! Structured logging via `tracing`, with a compact human format by default
//! and a more detailed format in verbose mode. The record-by-record trace of
//! the status fold is emitted at debug level and only becomes visible when
//! verbose mode (or an explicit `RUST_LOG` filter) enables it.

use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Check if colored output should be used.
///
/// Returns true only if:
/// - stderr is a terminal (TTY)
/// - NO_COLOR environment variable is not set
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Initialize the tracing subscriber.
///
/// The `RUST_LOG` environment variable takes precedence; otherwise verbose
/// mode enables `revstamp=debug`, and the default is `revstamp=info,warn`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("revstamp=debug,info")
            } else {
                EnvFilter::try_new("revstamp=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .with_ansi(use_color())
                .compact(),
        )
        .try_init()?;

    Ok(())
}
