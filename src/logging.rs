//! Tracing subscriber setup for binaries and tests built on mlest.

use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["mlest", "mlest_linalg", "mlest_poisson", "mlest_gaussian"];

/// Maps a verbosity count to a level name.
///
/// Mapping:
/// - 0      -> warn
/// - 1      -> info
/// - 2      -> debug
/// - 3+     -> trace
fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the default filter directive string, one entry per crate target.
fn default_directives(verbosity: u8) -> String {
    let level = level(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing based on a verbosity level.
///
/// `RUST_LOG` overrides the verbosity if set. Calling this more than once is
/// harmless: later calls leave the first subscriber in place.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
