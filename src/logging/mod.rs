//! Logging setup
//!
//! The engine only emits `tracing` events. Hosts that do not install their
//! own subscriber can call [`init_logging`]; `RUST_LOG` overrides the
//! default filter.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "bezy_edit_behavior=info";

/// Install a formatted stderr subscriber
///
/// Fails if a global subscriber is already set.
pub fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init_logging(DEFAULT_FILTER);
        assert!(init_logging(DEFAULT_FILTER).is_err());
    }
}
