pub mod actuators;
pub mod config;
pub mod service;
pub mod utf8;

#[cfg(feature = "chat-in")]
pub mod infer;

#[cfg(feature = "chat-in")]
pub mod prompts;

/// Installs the `tracing` subscriber used by the binaries.
///
/// Honors `RUST_LOG`, falling back to `info`. Logs go to stderr so the
/// terminal front-end can own stdout.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
