//! # Undo/Redo History
//!
//! Bounded undo and redo stacks of full-document snapshots.
//!
//! ## Design
//!
//! - A snapshot is an independent deep copy of the document, labelled with
//!   the action it undoes
//! - Undo pops a snapshot, parks the live document on the redo stack and
//!   hands the snapshot back for restoring
//! - Redo is the mirror image
//! - New snapshots clear the redo stack
//! - Field edits are batched: the first edit opens a batch holding the
//!   pre-edit document, and the batch becomes one undo step when it is
//!   closed (explicitly or by the next action)
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = HistoryManager::new();
//!
//! history.save_snapshot("Add block", &before);
//! let restored = history.undo(current).unwrap();
//! ```

use std::collections::VecDeque;

use crate::document::ContentDocument;

pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Label used when an edit batch is closed implicitly
pub const EDIT_BATCH_LABEL: &str = "Edit block";

/// Immutable copy of the document at a snapshot boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub label: String,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    pub document: ContentDocument,
}

impl Snapshot {
    pub fn new(label: impl Into<String>, document: ContentDocument) -> Self {
        Self {
            label: label.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            document,
        }
    }
}

/// Undo/redo stacks for one editing session
#[derive(Debug)]
pub struct HistoryManager {
    /// Most recent last
    undo_stack: VecDeque<Snapshot>,

    /// Most recent last
    redo_stack: VecDeque<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Pre-edit document of the open edit batch
    open_batch: Option<ContentDocument>,
}

impl HistoryManager {
    /// History with the default depth (50)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_levels,
            open_batch: None,
        }
    }

    /// Record a snapshot boundary
    ///
    /// Closes an open edit batch under `label`; with no batch open, records
    /// `current` as the checkpoint.
    pub fn save_snapshot(&mut self, label: &str, current: &ContentDocument) {
        match self.open_batch.take() {
            Some(base) => self.push_undo(Snapshot::new(label, base)),
            None => self.push_undo(Snapshot::new(label, current.clone())),
        }
        self.redo_stack.clear();
    }

    /// Record the state a discrete action is about to leave
    ///
    /// An open edit batch is closed first so it stays its own undo step.
    pub fn checkpoint(&mut self, label: &str, before: &ContentDocument) {
        self.close_batch();
        self.push_undo(Snapshot::new(label, before.clone()));
        self.redo_stack.clear();
    }

    /// Note a field edit made on top of `before`
    ///
    /// The first edit after a boundary opens a batch and invalidates redo.
    pub fn note_edit(&mut self, before: &ContentDocument) {
        if self.open_batch.is_none() {
            self.open_batch = Some(before.clone());
            self.redo_stack.clear();
        }
    }

    /// Close an open edit batch under the default label
    pub fn close_batch(&mut self) {
        if let Some(base) = self.open_batch.take() {
            self.push_undo(Snapshot::new(EDIT_BATCH_LABEL, base));
        }
    }

    /// True while field edits are waiting for a snapshot boundary
    pub fn is_dirty(&self) -> bool {
        self.open_batch.is_some()
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        // Same state as the top entry: keep one entry under the newest label
        if let Some(top) = self.undo_stack.back_mut() {
            if top.document == snapshot.document {
                top.label = snapshot.label;
                top.timestamp = snapshot.timestamp;
                return;
            }
        }

        self.undo_stack.push_back(snapshot);

        if self.max_levels > 0 {
            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Step back; returns the document to restore
    ///
    /// `current` is parked on the redo stack. Entries equal to `current`
    /// would restore nothing and are dropped on the way. Returns `None` when
    /// no entry differs from `current`.
    pub fn undo(&mut self, current: ContentDocument) -> Option<ContentDocument> {
        self.close_batch();

        let snapshot = pop_differing(&mut self.undo_stack, &current)?;
        tracing::debug!(label = %snapshot.label, "undo");

        self.redo_stack
            .push_back(Snapshot::new(snapshot.label.clone(), current));
        Some(snapshot.document)
    }

    /// Step forward; returns the document to restore
    pub fn redo(&mut self, current: ContentDocument) -> Option<ContentDocument> {
        if self.open_batch.is_some() {
            // Edits after an undo already cleared the redo future
            return None;
        }

        let snapshot = pop_differing(&mut self.redo_stack, &current)?;
        tracing::debug!(label = %snapshot.label, "redo");

        self.undo_stack
            .push_back(Snapshot::new(snapshot.label.clone(), current));
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.pop_front();
        }
        Some(snapshot.document)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.open_batch.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty() && self.open_batch.is_none()
    }

    /// True if an undo from `current` would change the document
    pub fn can_undo_from(&self, current: &ContentDocument) -> bool {
        self.open_batch.is_some() || has_differing(&self.undo_stack, current)
    }

    /// True if a redo from `current` would change the document
    pub fn can_redo_from(&self, current: &ContentDocument) -> bool {
        self.open_batch.is_none() && has_differing(&self.redo_stack, current)
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_batch = None;
    }

    /// Label of the next undo step
    pub fn undo_label(&self) -> Option<&str> {
        if self.open_batch.is_some() {
            return Some(EDIT_BATCH_LABEL);
        }
        self.undo_stack.back().map(|s| s.label.as_str())
    }

    /// Label of the next redo step
    pub fn redo_label(&self) -> Option<&str> {
        if self.open_batch.is_some() {
            return None;
        }
        self.redo_stack.back().map(|s| s.label.as_str())
    }
}

fn pop_differing(stack: &mut VecDeque<Snapshot>, current: &ContentDocument) -> Option<Snapshot> {
    while let Some(snapshot) = stack.pop_back() {
        if snapshot.document != *current {
            return Some(snapshot);
        }
        tracing::debug!(label = %snapshot.label, "dropped snapshot equal to live document");
    }
    None
}

fn has_differing(stack: &VecDeque<Snapshot>, current: &ContentDocument) -> bool {
    stack.iter().rev().any(|snapshot| snapshot.document != *current)
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
