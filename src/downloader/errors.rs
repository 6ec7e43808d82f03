// Error types for validation, resolution and saving

use thiserror::Error;

use super::models::ContentType;

/// Local URL check failure. Never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing but whitespace was entered
    #[error("empty URL")]
    Empty,

    /// Input does not look like a supported page URL
    #[error("unrecognized URL format")]
    BadFormat,
}

impl ValidationError {
    /// Message shown to the user for this content type
    pub fn user_message(&self, content_type: ContentType) -> &'static str {
        match (self, content_type) {
            (Self::Empty, ContentType::VideoPage) => "Please enter a YouTube URL.",
            (Self::Empty, ContentType::ReelPage) => "Please enter an Instagram Reel URL.",
            (Self::BadFormat, ContentType::VideoPage) => {
                "Invalid YouTube URL format. Please use a valid video link."
            }
            (Self::BadFormat, ContentType::ReelPage) => "Invalid Instagram Reel URL format.",
        }
    }
}

/// Which backend call failed, for user-facing wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchInfo,
    FetchBinary,
}

/// Failure talking to the resolver backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The backend answered with a non-2xx status
    #[error("remote error {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Remote { status: u16, detail: Option<String> },

    /// No usable response: connect failure, timeout, broken body
    #[error("transport error: {reason}")]
    Transport { reason: String },
}

impl ResolveError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Text for the error panel or status toast.
    ///
    /// Remote `detail` is passed through verbatim; transport failures get a
    /// generic message naming the operation.
    pub fn user_message(&self, content_type: ContentType, operation: Operation) -> String {
        match self {
            Self::Remote {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Remote { status, .. } => format!("Request failed with status {}", status),
            Self::Transport { .. } => generic_failure(content_type, operation).to_string(),
        }
    }
}

fn generic_failure(content_type: ContentType, operation: Operation) -> &'static str {
    match (content_type, operation) {
        (ContentType::VideoPage, Operation::FetchInfo) => {
            "Failed to fetch YouTube video information"
        }
        (ContentType::VideoPage, Operation::FetchBinary) => "Failed to download YouTube media",
        (ContentType::ReelPage, Operation::FetchInfo) => {
            "Failed to fetch Instagram reel information"
        }
        (ContentType::ReelPage, Operation::FetchBinary) => "Failed to download Instagram reel",
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::transport("request timed out");
        }
        if err.is_connect() {
            return Self::transport(format!("connection failed: {}", err));
        }
        if err.is_decode() {
            return Self::transport(format!("invalid response body: {}", err));
        }
        if let Some(status) = err.status() {
            return Self::Remote {
                status: status.as_u16(),
                detail: None,
            };
        }
        Self::transport(err.to_string())
    }
}

/// Failure handing a payload to the host's save mechanism
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no download directory available")]
    NoTargetDirectory,

    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed configuration value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
