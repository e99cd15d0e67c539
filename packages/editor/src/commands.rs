//! # Editor Commands
//!
//! The host-facing command surface as data, so a UI bridge or a script can
//! drive an [`Editor`](crate::Editor) without calling methods directly.
//!
//! ```json
//! [
//!   { "command": "addBlock", "blockType": "button" },
//!   { "command": "reorderBlock", "from": 0, "to": 2 },
//!   { "command": "undo" }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{BlockPatch, BlockType};
use crate::document::LayoutSettings;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum EditCommand {
    #[serde(rename_all = "camelCase")]
    AddBlock {
        block_type: BlockType,
        #[serde(default)]
        position: Option<usize>,
    },

    RemoveBlock {
        id: String,
    },

    DuplicateBlock {
        id: String,
    },

    UpdateBlock {
        id: String,
        patch: BlockPatch,
    },

    ReorderBlock {
        from: usize,
        to: usize,
    },

    MoveBlockUp {
        id: String,
    },

    MoveBlockDown {
        id: String,
    },

    ToggleVisibility {
        id: String,
    },

    Select {
        #[serde(default)]
        id: Option<String>,
    },

    SetLayout {
        layout: LayoutSettings,
    },

    SetGlobal {
        key: String,
        value: Value,
    },

    RemoveGlobal {
        key: String,
    },

    StartDrag {
        index: usize,
    },

    DragOver {
        index: usize,
    },

    Drop {
        index: usize,
    },

    CancelDrag,

    Undo,

    Redo,

    SaveSnapshot {
        label: String,
    },

    SetTextView {
        text: String,
    },

    SaveNow,
}

/// What a command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A block was created with this id
    Created(String),

    Changed,

    Unchanged,

    Saved,
}

impl CommandOutcome {
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            CommandOutcome::Changed
        } else {
            CommandOutcome::Unchanged
        }
    }
}
