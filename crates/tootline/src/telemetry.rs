//! Console tracing setup for binaries and examples.

/// Initialize a console tracing subscriber.
///
/// Respects `RUST_LOG`, defaulting to `info`. Call once at startup; a second
/// call is ignored so tests can initialize freely.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
