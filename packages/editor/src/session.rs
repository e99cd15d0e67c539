//! # Edit Session State
//!
//! Transient UI state for one editing session. Kept apart from
//! [`ContentDocument`](crate::ContentDocument) so history snapshots never
//! capture selection or panel state.

use serde::{Deserialize, Serialize};

/// Which editing surface is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Structured,
    Text,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorSessionState {
    /// Currently selected block
    pub selected_block_id: Option<String>,

    /// Whether the settings panel for the selection is open
    pub settings_open: bool,

    pub view_mode: ViewMode,
}

impl EditorSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update selection; returns true if it changed
    pub fn select(&mut self, id: Option<String>) -> bool {
        if self.selected_block_id == id {
            return false;
        }
        if id.is_none() {
            self.settings_open = false;
        }
        self.selected_block_id = id;
        true
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_block_id.as_deref() == Some(id)
    }

    /// Drop the selection if it points at `id`
    pub fn clear_if_selected(&mut self, id: &str) {
        if self.is_selected(id) {
            self.select(None);
        }
    }

    pub fn open_settings(&mut self) -> bool {
        if self.selected_block_id.is_none() {
            return false;
        }
        self.settings_open = true;
        true
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }
}
