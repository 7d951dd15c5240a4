//! Logging and tracing initialization for Folio.
//!
//! Call one of these once at startup, before building the [`App`](crate::App).
//! The level is controlled by `RUST_LOG`:
//!
//! ```bash
//! # Everything including request traces
//! RUST_LOG=debug folio
//!
//! # Fine-grained control
//! RUST_LOG=folio_core=debug,tower_http=debug,sqlx=warn folio
//! ```
//!
//! Throttling and spam decisions are logged under the `folio_core::guard`
//! target, so `RUST_LOG=folio_core::guard=debug` isolates them.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with `info` as the default level.
///
/// # Panics
///
/// Panics if a global subscriber was already installed.
pub fn init_logging() {
    init_logging_with_level("info");
}

/// Initialize logging with a specific fallback level.
///
/// `RUST_LOG` still wins when it is set.
///
/// # Panics
///
/// Panics if a global subscriber was already installed.
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize JSON-formatted logging (recommended for production).
///
/// # Panics
///
/// Panics if a global subscriber was already installed.
pub fn init_logging_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
