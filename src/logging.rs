//! Tracing initialization
//!
//! Diagnostics go to stderr so that stdout only carries the report.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Environment variable holding an `EnvFilter` directive, e.g. `localizer=debug`
pub const LOG_ENV: &str = "LOCALIZER_LOG";

/// Install the global subscriber.
///
/// `LOCALIZER_LOG` wins when set; otherwise `verbose` selects `debug` and the
/// default is `warn`. Calling this more than once has no effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let default_level = if verbose { "localizer=debug" } else { "localizer=warn" };
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
