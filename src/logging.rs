use tracing_subscriber::EnvFilter;

/// Log level when `RUST_LOG` is not set
pub fn default_level(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags. Safe to call more
/// than once; later calls are ignored.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
