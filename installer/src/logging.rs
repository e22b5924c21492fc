//! Log initialisation for the CLI.
//!
//! Messages go to stderr through `env_logger`. The level comes from the
//! verbosity flags unless `RUST_LOG` is set, in which case the environment
//! filter wins.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Environment variable consulted for filter directives.
pub const LOG_ENV: &str = "RUST_LOG";

/// Map `-v`/`-q` flags to a level filter.
///
/// # Examples
///
/// ```
/// use log::LevelFilter;
/// use unaar::logging::level_filter;
///
/// assert_eq!(level_filter(0, false), LevelFilter::Info);
/// assert_eq!(level_filter(2, false), LevelFilter::Trace);
/// assert_eq!(level_filter(0, true), LevelFilter::Error);
/// ```
#[must_use]
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Build a logger honouring `RUST_LOG` and falling back to `default`.
#[must_use]
pub fn builder(default: LevelFilter) -> Builder {
    let env = Env::new().filter_or(LOG_ENV, default.as_str());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None).format_target(false);
    builder
}

/// Install the global logger.
///
/// A second call is ignored so tests and embedders can initialise freely.
pub fn init(verbose: u8, quiet: bool) {
    if builder(level_filter(verbose, quiet)).try_init().is_err() {
        // Already initialised.
    }
}
