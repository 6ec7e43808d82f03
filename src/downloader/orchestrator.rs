// Fetch/download orchestrator
//
// One instance per content type. Two independent state axes: the workflow
// (validate -> fetch info -> formats) and the download slot. Every submit
// takes a new sequence number; a fetch result is applied only if its number
// is still the latest.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex};

use super::config::ClientConfig;
use super::errors::{Operation, ResolveError};
use super::filename::derive_filename;
use super::models::{BinaryRequest, ContentType, FormatVariant, MediaInfo, MediaKind, MediaRequest};
use super::resolver::HttpResolver;
use super::status::{StatusBoard, StatusKind, StatusMessage};
use super::traits::{ResolverBackend, SaveTarget};
use super::trigger::FileSaver;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data")]
pub enum WorkflowState {
    Idle,
    ValidatingFailed(String),
    FetchingInfo,
    InfoReady(MediaInfo),
    InfoFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data")]
pub enum DownloadState {
    Idle,
    /// Format being fetched; `None` for the implicit reel variant
    Downloading(Option<String>),
    Failed(String),
}

/// Result of a single `download` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    Failed(String),
    /// Same format already has a request outstanding
    AlreadyInFlight,
    /// No info loaded yet, or the format id is unknown
    Rejected(String),
}

/// Change notifications for a host UI
#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    Workflow(WorkflowState),
    Download(DownloadState),
    Status(StatusMessage),
}

struct Inner {
    workflow: WorkflowState,
    download: DownloadState,
    sequence: u64,
    in_flight: HashSet<String>,
}

pub struct Orchestrator {
    content_type: ContentType,
    resolver: Arc<dyn ResolverBackend>,
    saver: Arc<dyn SaveTarget>,
    state: Mutex<Inner>,
    status: StatusBoard,
    events: broadcast::Sender<OrchestratorEvent>,
}

impl Orchestrator {
    pub fn new(
        content_type: ContentType,
        resolver: Arc<dyn ResolverBackend>,
        saver: Arc<dyn SaveTarget>,
        status_clear_delay: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            content_type,
            resolver,
            saver,
            state: Mutex::new(Inner {
                workflow: WorkflowState::Idle,
                download: DownloadState::Idle,
                sequence: 0,
                in_flight: HashSet::new(),
            }),
            status: StatusBoard::new(status_clear_delay),
            events,
        }
    }

    /// Orchestrator backed by the HTTP resolver and the download directory
    pub fn from_config(content_type: ContentType, config: &ClientConfig) -> Result<Self, ResolveError> {
        let resolver = HttpResolver::from_config(config)?;
        let saver = FileSaver::from_config(config);
        tracing::info!(
            "[Orchestrator] {} flow using backend {} at {}, saving to {}",
            content_type.label(),
            resolver.name(),
            config.api_base_url,
            saver.dir().display()
        );
        Ok(Self::new(
            content_type,
            Arc::new(resolver),
            Arc::new(saver),
            config.status_clear_delay,
        ))
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Validate `raw` and resolve its info.
    ///
    /// Returns the workflow state after this call. If a newer submit started
    /// while the fetch was outstanding, its result is dropped and the current
    /// state is returned instead.
    pub async fn submit(&self, raw: &str) -> WorkflowState {
        let (token, url) = {
            let mut inner = self.state.lock().await;
            inner.sequence += 1;
            let token = inner.sequence;

            match self.content_type.validate(raw) {
                Ok(url) => {
                    self.set_workflow(&mut inner, WorkflowState::FetchingInfo);
                    (token, url)
                }
                Err(e) => {
                    tracing::debug!("[Orchestrator] Rejected input {:?}: {}", raw, e);
                    let failed =
                        WorkflowState::ValidatingFailed(e.user_message(self.content_type).to_string());
                    self.set_workflow(&mut inner, failed.clone());
                    return failed;
                }
            }
        };

        tracing::info!(
            "[Orchestrator] #{} Fetching {} info via {}",
            token,
            self.content_type.label(),
            self.resolver.name()
        );
        let request = MediaRequest {
            url,
            content_type: self.content_type,
        };
        let result = self.resolver.fetch_info(&request).await;

        let mut inner = self.state.lock().await;
        if inner.sequence != token {
            tracing::debug!(
                "[Orchestrator] Dropping stale info result #{} (latest is #{})",
                token,
                inner.sequence
            );
            return inner.workflow.clone();
        }

        let next = match result {
            Ok(info) => {
                tracing::info!(
                    "[Orchestrator] ✓ #{} Info ready: {} video, {} audio formats",
                    token,
                    info.video_formats.len(),
                    info.audio_formats.len()
                );
                WorkflowState::InfoReady(info)
            }
            Err(e) => {
                tracing::warn!("[Orchestrator] ✗ #{} Info fetch failed: {}", token, e);
                WorkflowState::InfoFailed(e.user_message(self.content_type, Operation::FetchInfo))
            }
        };
        self.set_workflow(&mut inner, next.clone());
        next
    }

    /// Download a variant under its derived filename
    pub async fn download(&self, format_id: Option<&str>) -> DownloadOutcome {
        self.run_download(format_id, None).await
    }

    /// Download a variant under a caller-chosen filename
    pub async fn download_as(&self, format_id: Option<&str>, filename: &str) -> DownloadOutcome {
        self.run_download(format_id, Some(filename.to_string())).await
    }

    /// Filename `download` would use for this variant
    pub async fn suggested_filename(&self, format_id: Option<&str>) -> Option<String> {
        let inner = self.state.lock().await;
        match &inner.workflow {
            WorkflowState::InfoReady(info) => {
                let variant = info.variant(format_id)?;
                Some(filename_for(info, &variant))
            }
            _ => None,
        }
    }

    pub async fn workflow_state(&self) -> WorkflowState {
        self.state.lock().await.workflow.clone()
    }

    pub async fn download_state(&self) -> DownloadState {
        self.state.lock().await.download.clone()
    }

    /// Whether the control for this format should be disabled
    pub async fn is_downloading(&self, format_id: &str) -> bool {
        self.state.lock().await.in_flight.contains(format_id)
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.status.current()
    }

    /// Status slot including auto-clears
    pub fn status_updates(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.status.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    async fn run_download(&self, format_id: Option<&str>, filename: Option<String>) -> DownloadOutcome {
        let (request, key) = {
            let mut guard = self.state.lock().await;
            let inner: &mut Inner = &mut guard;

            let info = match &inner.workflow {
                WorkflowState::InfoReady(info) => info,
                _ => return self.reject("Fetch the media information before downloading."),
            };
            let variant = match info.variant(format_id) {
                Some(v) => v,
                None => {
                    let message = match format_id {
                        Some(id) => format!("Unknown format: {}", id),
                        None => "Select a format to download.".to_string(),
                    };
                    return self.reject(&message);
                }
            };

            let key = variant.format_id.clone();
            if !inner.in_flight.insert(key.clone()) {
                tracing::debug!("[Orchestrator] Download of {} already in flight", key);
                return DownloadOutcome::AlreadyInFlight;
            }

            let request = BinaryRequest {
                content_type: self.content_type,
                url: info.original_url.clone(),
                format_id: match variant.kind {
                    MediaKind::Reel => None,
                    MediaKind::Video | MediaKind::Audio => Some(variant.format_id.clone()),
                },
                kind: variant.kind,
                filename: filename.unwrap_or_else(|| filename_for(info, &variant)),
            };

            let downloading = DownloadState::Downloading(format_id.map(str::to_string));
            self.set_download(inner, downloading);
            (request, key)
        };

        self.post_status(StatusKind::Success, "Preparing download...");
        tracing::info!(
            "[Orchestrator] Downloading {} as {}",
            key,
            request.filename
        );

        let result = match self.resolver.fetch_binary(&request).await {
            Ok(payload) => self
                .saver
                .save(&payload, &request.filename)
                .await
                .map_err(|e| format!("Failed to save {}: {}", request.filename, e)),
            Err(e) => Err(e.user_message(self.content_type, Operation::FetchBinary)),
        };

        let mut inner = self.state.lock().await;
        inner.in_flight.remove(&key);

        match result {
            Ok(path) => {
                tracing::info!("[Orchestrator] ✓ {} saved to {}", key, path.display());
                self.set_download(&mut inner, DownloadState::Idle);
                drop(inner);
                self.post_status(
                    StatusKind::Success,
                    format!("{} download started!", request.filename),
                );
                DownloadOutcome::Saved(path)
            }
            Err(message) => {
                tracing::warn!("[Orchestrator] ✗ {} failed: {}", key, message);
                self.set_download(&mut inner, DownloadState::Failed(message.clone()));
                self.set_download(&mut inner, DownloadState::Idle);
                drop(inner);
                self.post_status(StatusKind::Error, message.clone());
                DownloadOutcome::Failed(message)
            }
        }
    }

    fn reject(&self, message: &str) -> DownloadOutcome {
        self.post_status(StatusKind::Error, message);
        DownloadOutcome::Rejected(message.to_string())
    }

    fn set_workflow(&self, inner: &mut Inner, state: WorkflowState) {
        inner.workflow = state.clone();
        let _ = self.events.send(OrchestratorEvent::Workflow(state));
    }

    fn set_download(&self, inner: &mut Inner, state: DownloadState) {
        inner.download = state.clone();
        let _ = self.events.send(OrchestratorEvent::Download(state));
    }

    fn post_status(&self, kind: StatusKind, text: impl Into<String>) {
        let message = self.status.post(kind, text);
        let _ = self.events.send(OrchestratorEvent::Status(message));
    }
}

fn filename_for(info: &MediaInfo, variant: &FormatVariant) -> String {
    derive_filename(
        info.filename_base().as_deref(),
        variant.file_extension.as_deref(),
        variant.kind.default_extension(),
    )
}
