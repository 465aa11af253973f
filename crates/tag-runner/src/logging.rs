//! Diagnostic log setup for the `tagrun` binary.

use std::error::Error;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV_VAR: &str = "TAGRUN_LOG";
/// Directive used when the environment variable is unset or invalid.
pub const DEFAULT_LOG_DIRECTIVE: &str = "warn";
const VERBOSE_LOG_DIRECTIVE: &str = "debug";

/// Builds the log filter; `verbose` wins over `env_value`.
#[must_use]
pub fn log_filter(verbose: bool, env_value: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_LOG_DIRECTIVE);
    }
    env_value
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

/// Installs a stderr `fmt` subscriber filtered by [`log_filter`].
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, env_value.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
}
