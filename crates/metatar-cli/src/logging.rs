//! Tracing subscriber setup.

use console::Term;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "METATAR_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber filtered by `METATAR_LOG` (default `warn`).
///
/// Logs are for troubleshooting only; diagnostics about the manifest are
/// printed separately and never depend on the filter.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(Term::stderr().is_term())
                .with_writer(std::io::stderr),
        )
        .try_init();
}
