pub mod downloader;

use tracing_subscriber::{fmt, EnvFilter};

pub use downloader::{
    derive_filename, validate_reel_url, validate_youtube_url, ClientConfig, ContentType,
    DownloadOutcome, DownloadState, FileSaver, HttpResolver, MediaInfo, Orchestrator,
    ResolveError, StatusKind, StatusMessage, ValidationError, WorkflowState,
};

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and falls back to `info`. Safe to call more
/// than once: later calls leave the first subscriber in place.
pub fn init_tracing() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_names(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
        return;
    }

    tracing::info!("TubeFetch core starting...");
}
