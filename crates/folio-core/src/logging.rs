#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! host's decision. Native hosts and tests call [`init`] once at startup.
//!
//! The filter comes from `RUST_LOG` when set and falls back to
//! [`DEFAULT_FILTER`]. Engine targets are `folio.gallery`, `folio.pan`,
//! `folio.player`, and `folio.web`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one event per line.
    #[default]
    Pretty,
    /// Newline-delimited JSON.
    #[cfg(feature = "tracing-json")]
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init(format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => builder.json().try_init(),
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_noop() {
        // The first call may lose to another test in this binary; either way
        // the second call must report that a subscriber is already present.
        let _ = init(LogFormat::Pretty);
        assert!(!init(LogFormat::Pretty));
    }

    #[test]
    fn default_format_is_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
