//! Log output setup for the binary

use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output for this crate when `verbose` is on. Logs go to stderr so stdout
/// carries only the snapshot.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "solprice=debug" } else { "solprice=warn" };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
