use tracing_subscriber::EnvFilter;

use crate::version::LOG_TARGET;

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// `verbose`. Output goes to stderr so stdout stays clean for `--json`.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{LOG_TARGET}={level},warn")));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
