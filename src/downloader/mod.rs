// Downloader module - media resolution and download orchestration

pub mod config;
pub mod errors;
pub mod filename;
pub mod models;
pub mod orchestrator;
pub mod resolver;
pub mod status;
pub mod traits;
pub mod trigger;
pub mod utils;
pub mod validator;

pub use config::ClientConfig;
pub use errors::{ConfigError, Operation, ResolveError, SaveError, ValidationError};
pub use filename::derive_filename;
pub use utils::{build_http_client, format_size_label};
pub use models::{
    BinaryPayload, BinaryRequest, ContentType, FormatVariant, MediaInfo, MediaKind, MediaRequest,
};
pub use orchestrator::{DownloadOutcome, DownloadState, Orchestrator, OrchestratorEvent, WorkflowState};
pub use resolver::HttpResolver;
pub use status::{StatusBoard, StatusKind, StatusMessage};
pub use traits::{ResolverBackend, SaveTarget};
pub use trigger::FileSaver;
pub use validator::{extract_video_id, validate_reel_url, validate_youtube_url};
