//! Diagnostic logging via `tracing`.
//!
//! Logging is off unless `DDEV_LOG` holds an `EnvFilter` directive such as
//! `debug` or `ddev_config::config=trace`. Output goes to stderr so it never
//! mixes with command output on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DDEV_LOG";

const DEFAULT_FILTER: &str = "off";

/// Build the filter from a directive string, or the default when unset.
fn build_filter(directive: Option<&str>) -> Result<EnvFilter, String> {
    match directive.map(str::trim) {
        None | Some("") => Ok(EnvFilter::new(DEFAULT_FILTER)),
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| format!("Invalid {} directive '{}': {}", LOG_ENV, directive, e)),
    }
}

/// Install the global subscriber.
///
/// An invalid directive leaves logging off and is reported as an error so
/// the caller can warn about it. Calling this more than once is harmless.
pub fn init_logging() -> Result<(), String> {
    let directive = std::env::var(LOG_ENV).ok();
    let (filter, result) = match build_filter(directive.as_deref()) {
        Ok(filter) => (filter, Ok(())),
        Err(e) => (EnvFilter::new(DEFAULT_FILTER), Err(e)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    result
}
