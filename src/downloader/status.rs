// Ephemeral user-facing status message with auto-clear
//
// One slot, last write wins. Every post cancels the pending clear timer of
// the message it replaces.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub id: u64,
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Instant,
}

pub struct StatusBoard {
    slot: Arc<watch::Sender<Option<StatusMessage>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
    delay: Duration,
}

impl StatusBoard {
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            slot: Arc::new(tx),
            timer: Mutex::new(None),
            next_id: AtomicU64::new(1),
            delay,
        }
    }

    /// Replace the current message and schedule its removal.
    /// Must be called from within a tokio runtime.
    pub fn post(&self, kind: StatusKind, text: impl Into<String>) -> StatusMessage {
        let message = StatusMessage {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            text: text.into(),
            kind,
            expires_at: Instant::now() + self.delay,
        };

        match kind {
            StatusKind::Success => tracing::info!("[Status] {}", message.text),
            StatusKind::Error => tracing::warn!("[Status] {}", message.text),
        }

        self.slot.send_replace(Some(message.clone()));

        let slot = Arc::clone(&self.slot);
        let id = message.id;
        let deadline = message.expires_at;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            slot.send_if_modified(|current| match current {
                Some(m) if m.id == id => {
                    *current = None;
                    true
                }
                _ => false,
            });
        });

        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = timer.replace(handle) {
            previous.abort();
        }

        message
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.slot.subscribe()
    }
}

impl Drop for StatusBoard {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}
