//! Logging setup shared by all binaries
//!
//! Level defaults to INFO and is overridden with RUST_LOG
//! (e.g. `RUST_LOG=debug` to see ignored repeated statuses).

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();
}

/// Version string with the git hash captured at build time
pub fn version() -> String {
    format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"))
}
