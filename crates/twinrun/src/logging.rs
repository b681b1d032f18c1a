//! Tracing setup for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// `twinrun=info`. Does nothing if a global subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("twinrun=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
