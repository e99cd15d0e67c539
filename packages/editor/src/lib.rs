//! # Pagecraft Editor
//!
//! Block-based page editing engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host UI / script: EditCommand               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Editor facade                       │
//! │  - BlockStore mutations + selection         │
//! │  - History checkpoints and edit batching    │
//! │  - Drag state, text view sync               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ autosave: debounced SaveJob → Persistence   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is source of truth**: the JSON text is a derived view
//! 2. **Positions follow order**: every structural change renumbers blocks
//! 3. **Undo restores whole documents**: snapshots are deep copies
//! 4. **Saves never block editing**: persistence receives its own copy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{BlockType, ContentDocument, Editor, MemoryPersistence};
//! use pagecraft_common::EditorConfig;
//! use std::sync::Arc;
//!
//! let persistence = Arc::new(MemoryPersistence::new());
//! let mut editor = Editor::new(ContentDocument::new(), persistence, &EditorConfig::default());
//!
//! editor.save_snapshot("init");
//! let id = editor.add_block(BlockType::Button, None);
//! editor.undo();
//!
//! // Host loop: sleep until the quiet period passes, then save
//! editor.autosave_idle().await;
//! ```

mod autosave;
mod block;
mod commands;
mod document;
mod drag;
mod editor;
mod errors;
mod factory;
mod history;
mod persistence;
mod session;
mod store;
mod view;

pub use autosave::AutosaveScheduler;
pub use block::{
    AccessibilitySettings, AnimationKind, AnimationSettings, BlockData, BlockPatch, BlockType,
    ButtonData, ButtonSize, ButtonStyle, ContentBlock, DividerData, DividerStyle, ImageData,
    LinkData, QuoteData, ResponsiveSettings, SpacerData, TextAlign, TextData, VideoData,
};
pub use commands::{CommandOutcome, EditCommand};
pub use document::{ContentDocument, LayoutAlignment, LayoutSettings, MaxWidth, VerticalSpacing};
pub use drag::{DragController, DragOutcome, DragState};
pub use editor::{Editor, SaveJob, SaveReport};
pub use errors::{BlockError, EditorError, PersistenceError, ViewError};
pub use factory::{create_default, new_block};
pub use history::{HistoryManager, Snapshot, DEFAULT_HISTORY_DEPTH, EDIT_BATCH_LABEL};
pub use persistence::{FilePersistence, MemoryPersistence, Persistence, SaveAck};
pub use session::{EditorSessionState, ViewMode};
pub use store::BlockStore;
pub use view::{from_text, to_text, TextView};

// Re-export common types for convenience
pub use pagecraft_common::{AutosaveConfig, EditorConfig, IdGenerator};
