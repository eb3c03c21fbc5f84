//! Subscriber setup for the `runrecord` binary and tests
//!
//! Events always go to stderr: stdout carries the per-snippet report lines
//! of `runrecord run` and the registry listing of `runrecord languages`.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// How build events are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines, `runrecord=debug` unless `RUST_LOG` says otherwise
    Development,
    /// One JSON object per event, `runrecord=info` by default
    Production,
    /// Bare registry; assertions go through `init_test_capture`
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Filter directive used when `RUST_LOG` is unset
fn default_directive(profile: Profile) -> Option<&'static str> {
    match profile {
        Profile::Development => Some("runrecord=debug"),
        Profile::Production => Some("runrecord=info"),
        Profile::Test => None,
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has any effect.
///
/// ```
/// use runrecord_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let Some(default) = default_directive(profile) else {
            tracing_subscriber::registry().init();
            return;
        };
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter(default));
        if profile == Profile::Production {
            builder.json().init();
        } else {
            builder.init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_a_no_op() {
        init(Profile::Test);
        init(Profile::Development);
        init(Profile::Production);
    }

    #[test]
    fn test_default_directives_per_profile() {
        assert_eq!(default_directive(Profile::Development), Some("runrecord=debug"));
        assert_eq!(default_directive(Profile::Production), Some("runrecord=info"));
        assert_eq!(default_directive(Profile::Test), None);
    }
}
