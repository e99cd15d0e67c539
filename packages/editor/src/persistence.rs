//! # Persistence
//!
//! The save collaborator the editor hands documents to. It always receives
//! a deep copy, never the live document.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::document::ContentDocument;
use crate::errors::{EditorError, PersistenceError};
use crate::view::{from_text, to_text};

/// Acknowledgement of a completed save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveAck {
    /// Milliseconds since the Unix epoch
    pub saved_at: i64,
}

impl SaveAck {
    pub fn now() -> Self {
        Self {
            saved_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[async_trait]
pub trait Persistence: Send + Sync {
    async fn save(&self, document: &ContentDocument) -> Result<SaveAck, PersistenceError>;
}

/// In-memory store that records every saved document
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saves: Mutex<Vec<ContentDocument>>,

    /// Errors handed out by the next saves, in order
    failures: Mutex<VecDeque<String>>,

    /// Simulated latency per save
    latency: Option<Duration>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Make the next save fail with `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(message.into());
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn saves(&self) -> Vec<ContentDocument> {
        self.saves.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_saved(&self) -> Option<ContentDocument> {
        self.saves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn save(&self, document: &ContentDocument) -> Result<SaveAck, PersistenceError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(message) = failure {
            return Err(PersistenceError::Rejected(message));
        }

        self.saves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(document.clone());
        Ok(SaveAck::now())
    }
}

/// Writes the canonical text form to a file
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the document at this path
    pub async fn load(&self) -> Result<ContentDocument, EditorError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(PersistenceError::from)?;
        Ok(from_text(&text)?)
    }
}

#[async_trait]
impl Persistence for FilePersistence {
    async fn save(&self, document: &ContentDocument) -> Result<SaveAck, PersistenceError> {
        let mut text = to_text(document);
        text.push('\n');
        tokio::fs::write(&self.path, text).await?;

        tracing::info!(path = %self.path.display(), blocks = document.len(), "saved page");
        Ok(SaveAck::now())
    }
}
