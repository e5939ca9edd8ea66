//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events; embedding applications
//! (or tests) that want them printed call [`init`] once. The filter reads
//! `WORKLENS_LOG` and defaults to `warn`.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_env("WORKLENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // Ignore the error when a subscriber is already installed.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
