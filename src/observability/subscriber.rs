//! Process-wide `tracing` subscriber setup.
//!
//! # Design Decisions
//! - `RUST_LOG` wins when set, otherwise the filter is derived from `v`
//! - Output goes to stderr so stdout stays reserved for response bodies

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a given maximum verbosity.
pub fn default_directive(max_v: u32) -> String {
    let level = crate::observability::TracingLogger::level_for(max_v);
    format!("wirelog={}", level.to_string().to_lowercase())
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(max_v: u32) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(max_v)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
