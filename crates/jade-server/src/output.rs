//! Logging initialization
//!
//! Events from this binary go through `tracing`; records emitted by
//! `jade-core` through the `log` facade are bridged into the same subscriber.

use tracing_subscriber::EnvFilter;

/// Output level for controlling what gets logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Requests and lifecycle events
    Normal,
    /// Only warnings and errors
    Quiet,
    /// Everything, including completion bodies
    Verbose,
}

impl OutputLevel {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: OutputLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
