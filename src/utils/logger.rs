use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match (verbose, level) {
        (true, _) => EnvFilter::new("crystalline=debug,info"),
        (false, Some(level)) => EnvFilter::new(format!("crystalline={}", level)),
        (false, None) => EnvFilter::new("crystalline=info"),
    })
}

/// `level` comes from the policy file and yields to `--verbose` and `RUST_LOG`.
pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Installs a JSON logger for hosts embedding the C library.
///
/// Returns `false` when the host already owns a global subscriber.
pub fn try_init_library_logger() -> bool {
    tracing_subscriber::registry()
        .with(default_filter(false, None))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json(),
        )
        .try_init()
        .is_ok()
}
