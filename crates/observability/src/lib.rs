//! Process-wide tracing setup shared by the stockdesk binaries and tests.

pub mod subscriber;

pub use subscriber::{LogFormat, TracingConfig};

/// Initialize tracing from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init(&TracingConfig::from_env());
}
