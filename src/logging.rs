use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the JSON tracing subscriber.
/// This should be called once by the embedding application at startup.
pub fn init_logging() {
    try_init_logging().expect("Failed to set global tracing subscriber");
}

/// Like [`init_logging`], but reports an already-installed subscriber
/// instead of panicking.
pub fn try_init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .json()
        );

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::info!("Structured logging initialized");
    Ok(())
}
