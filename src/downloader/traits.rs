// Seams between the orchestrator and its collaborators

use std::path::PathBuf;

use async_trait::async_trait;

use super::errors::{ResolveError, SaveError};
use super::models::{BinaryPayload, BinaryRequest, MediaInfo, MediaRequest};

/// Backend that resolves page URLs into metadata and media bytes
#[async_trait]
pub trait ResolverBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Resolve metadata and format variants. Single attempt, no retry.
    async fn fetch_info(&self, request: &MediaRequest) -> Result<MediaInfo, ResolveError>;

    /// Fetch the raw bytes of one variant
    async fn fetch_binary(&self, request: &BinaryRequest) -> Result<BinaryPayload, ResolveError>;
}

/// Host save-as-file mechanism
#[async_trait]
pub trait SaveTarget: Send + Sync {
    /// Hand `payload` to the host under `filename`, returning where it went.
    /// Any transient resource must be released on every exit path.
    async fn save(&self, payload: &BinaryPayload, filename: &str) -> Result<PathBuf, SaveError>;
}
