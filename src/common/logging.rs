//! Tracing setup
//!
//! Diagnostics go to stderr. stdout is program output here: probe progress
//! lines and the artifact path, which comparison scripts scrape. Wire
//! traffic is logged at DEBUG, so `RUST_LOG=rs4j_compare=debug` shows every
//! request/reply line pair.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the stderr subscriber. `RUST_LOG` overrides the default
/// filter (INFO for this crate, WARN for dependencies).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rs4j_compare=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
