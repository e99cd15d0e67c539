//! # Editor
//!
//! The surface a host UI talks to. Wires the block store to history, drag
//! handling, the text view and autosave:
//!
//! ```text
//! command → BlockStore mutation → history checkpoint → text view invalidated
//!                                                    → autosave re-armed
//! ```
//!
//! Discrete actions (add, remove, duplicate, reorder, visibility, layout,
//! accepted text) record the document they leave as an undo step. Field
//! edits through [`Editor::update_block`] are batched until
//! [`Editor::save_snapshot`] or the next discrete action.

use pagecraft_common::{EditorConfig, IdGenerator};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;

use crate::autosave::AutosaveScheduler;
use crate::block::{BlockPatch, BlockType};
use crate::commands::{CommandOutcome, EditCommand};
use crate::document::{ContentDocument, LayoutSettings};
use crate::drag::{DragController, DragOutcome};
use crate::errors::{BlockError, EditorError, PersistenceError, ViewError};
use crate::history::HistoryManager;
use crate::persistence::{Persistence, SaveAck};
use crate::session::{EditorSessionState, ViewMode};
use crate::store::BlockStore;
use crate::view::TextView;

/// A save handed out to the host; holds its own copy of the document
pub struct SaveJob {
    pub document: ContentDocument,

    /// Store version the copy was taken at
    pub version: u64,

    persistence: Arc<dyn Persistence>,
}

impl SaveJob {
    pub async fn run(self) -> SaveReport {
        let result = self.persistence.save(&self.document).await;
        SaveReport {
            version: self.version,
            result,
        }
    }
}

impl std::fmt::Debug for SaveJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveJob")
            .field("version", &self.version)
            .field("blocks", &self.document.len())
            .finish()
    }
}

/// Outcome of a [`SaveJob`], fed back through [`Editor::finish_save`]
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub version: u64,
    pub result: Result<SaveAck, PersistenceError>,
}

pub struct Editor {
    store: BlockStore,
    history: HistoryManager,
    drag: DragController,
    text_view: TextView,
    autosave: AutosaveScheduler,
    persistence: Arc<dyn Persistence>,

    /// Store version known to be persisted
    saved_version: u64,

    save_error: Option<PersistenceError>,
}

impl Editor {
    pub fn new(
        document: ContentDocument,
        persistence: Arc<dyn Persistence>,
        config: &EditorConfig,
    ) -> Self {
        let ids = IdGenerator::new(config.id_prefix.clone());
        Self::with_ids(document, persistence, config, ids)
    }

    pub fn with_ids(
        document: ContentDocument,
        persistence: Arc<dyn Persistence>,
        config: &EditorConfig,
        ids: IdGenerator,
    ) -> Self {
        tracing::debug!(blocks = document.len(), "opening editor");
        Self {
            store: BlockStore::new(document, ids),
            history: HistoryManager::with_max_levels(config.history_depth),
            drag: DragController::new(),
            text_view: TextView::new(),
            autosave: AutosaveScheduler::new(&config.autosave),
            persistence,
            saved_version: 0,
            save_error: None,
        }
    }

    // ---- observable state ----

    pub fn document(&self) -> &ContentDocument {
        self.store.document()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn session(&self) -> &EditorSessionState {
        self.store.session()
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.store.selected_block_id()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo_from(self.store.document())
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo_from(self.store.document())
    }

    pub fn is_saving(&self) -> bool {
        self.autosave.is_saving()
    }

    pub fn just_saved(&self) -> bool {
        self.autosave.just_saved(Instant::now())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.version() != self.saved_version
    }

    pub fn save_error(&self) -> Option<&PersistenceError> {
        self.save_error.as_ref()
    }

    /// Text for the JSON surface: the pending draft, else canonical text
    pub fn json_text(&mut self) -> &str {
        let version = self.store.version();
        self.text_view.text(self.store.document(), version)
    }

    pub fn json_error(&self) -> Option<&ViewError> {
        self.text_view.error()
    }

    // ---- mutation plumbing ----

    fn document_changed(&mut self) {
        self.text_view.invalidate();
        self.text_view.discard_draft();
        self.autosave.notify_changed(Instant::now());
    }

    /// Run a discrete action; checkpoints the prior document if it changed
    fn discrete<T>(&mut self, label: &str, op: impl FnOnce(&mut BlockStore) -> T) -> T {
        let before = self.store.document().clone();
        let version = self.store.version();

        let result = op(&mut self.store);

        if self.store.version() != version {
            self.history.checkpoint(label, &before);
            self.document_changed();
        }
        result
    }

    // ---- block commands ----

    pub fn add_block(&mut self, block_type: BlockType, position: Option<usize>) -> String {
        self.discrete("Add block", |store| store.add_block(block_type, position))
    }

    pub fn remove_block(&mut self, id: &str) -> bool {
        self.discrete("Remove block", |store| store.remove_block(id))
    }

    pub fn duplicate_block(&mut self, id: &str) -> Option<String> {
        self.discrete("Duplicate block", |store| store.duplicate_block(id))
    }

    /// Field edit; joins the open edit batch
    pub fn update_block(&mut self, id: &str, patch: &BlockPatch) -> Result<bool, BlockError> {
        let before = (!self.history.is_dirty()).then(|| self.store.document().clone());

        let changed = self.store.update_block(id, patch)?;
        if changed {
            if let Some(before) = before {
                self.history.note_edit(&before);
            }
            self.document_changed();
        }
        Ok(changed)
    }

    pub fn reorder_block(&mut self, from: usize, to: usize) -> bool {
        self.discrete("Reorder blocks", |store| store.reorder_block(from, to))
    }

    pub fn move_block_up(&mut self, id: &str) -> bool {
        self.discrete("Reorder blocks", |store| store.move_block_up(id))
    }

    pub fn move_block_down(&mut self, id: &str) -> bool {
        self.discrete("Reorder blocks", |store| store.move_block_down(id))
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.discrete("Toggle visibility", |store| store.toggle_visibility(id))
    }

    pub fn set_selected(&mut self, id: Option<&str>) -> bool {
        self.store.set_selected(id)
    }

    pub fn open_settings(&mut self) -> bool {
        self.store.session_mut().open_settings()
    }

    pub fn close_settings(&mut self) {
        self.store.session_mut().close_settings();
    }

    pub fn set_layout(&mut self, layout: LayoutSettings) -> bool {
        self.discrete("Change layout", |store| store.set_layout(layout))
    }

    pub fn set_global(&mut self, key: &str, value: Value) -> bool {
        self.discrete("Change global settings", |store| store.set_global(key, value))
    }

    pub fn remove_global(&mut self, key: &str) -> bool {
        self.discrete("Change global settings", |store| store.remove_global(key))
    }

    // ---- history ----

    pub fn save_snapshot(&mut self, label: &str) {
        self.history.save_snapshot(label, self.store.document());
    }

    pub fn undo(&mut self) -> bool {
        let current = self.store.document().clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.store.replace_document(previous);
                self.document_changed();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.store.document().clone();
        match self.history.redo(current) {
            Some(next) => {
                self.store.replace_document(next);
                self.document_changed();
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ---- drag and drop ----

    pub fn start_drag(&mut self, index: usize) {
        self.drag.start_drag(index);
    }

    pub fn drag_over(&mut self, index: usize) -> bool {
        self.drag.drag_over(index)
    }

    /// Finish a drag; returns true if the order changed
    pub fn drop_drag(&mut self, index: usize) -> bool {
        match self.drag.drop(index) {
            DragOutcome::Dropped { from, to } => self.reorder_block(from, to),
            DragOutcome::Cancelled | DragOutcome::Ignored => false,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // ---- text view ----

    /// Submit text from the JSON surface
    ///
    /// Accepted text replaces the document as one undo step. Rejected text
    /// stays as a draft with its error; the document is untouched.
    pub fn set_text_view(&mut self, text: &str) -> Result<(), ViewError> {
        let document = self.text_view.submit(text)?;
        if document != *self.store.document() {
            self.discrete("Edit JSON", |store| {
                store.replace_document(document);
            });
        }
        Ok(())
    }

    pub fn show_text_view(&mut self) {
        self.store.session_mut().view_mode = ViewMode::Text;
    }

    /// Back to the structured surface; unaccepted text is dropped
    pub fn show_structured_view(&mut self) {
        self.text_view.discard_draft();
        self.store.session_mut().view_mode = ViewMode::Structured;
    }

    // ---- saving ----

    pub fn autosave_enabled(&self) -> bool {
        self.autosave.is_enabled()
    }

    /// Re-enabling with unsaved edits starts a fresh countdown
    pub fn set_autosave_enabled(&mut self, enabled: bool) {
        let was_enabled = self.autosave.is_enabled();
        self.autosave.set_enabled(enabled);
        if enabled && !was_enabled && self.has_unsaved_changes() {
            self.autosave.notify_changed(Instant::now());
        }
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    fn begin_save(&mut self) -> SaveJob {
        self.autosave.begin_save();
        SaveJob {
            document: self.store.document().clone(),
            version: self.store.version(),
            persistence: Arc::clone(&self.persistence),
        }
    }

    /// Hand out a save if the quiet period has elapsed
    ///
    /// The editor stays usable while the job runs; report back through
    /// [`Editor::finish_save`].
    pub fn poll_autosave(&mut self) -> Option<SaveJob> {
        if !self.autosave.is_due(Instant::now()) {
            return None;
        }
        if !self.has_unsaved_changes() {
            self.autosave.cancel();
            return None;
        }
        Some(self.begin_save())
    }

    pub fn finish_save(&mut self, report: SaveReport) -> Result<SaveAck, PersistenceError> {
        let succeeded = report.result.is_ok();
        self.autosave.finish_save(succeeded, Instant::now());

        match &report.result {
            Ok(_) => {
                self.saved_version = self.saved_version.max(report.version);
                self.save_error = None;
                tracing::info!(version = report.version, "document saved");
            }
            Err(error) => {
                self.save_error = Some(error.clone());
                tracing::warn!(%error, version = report.version, "save failed");
            }
        }
        report.result
    }

    /// Run a due autosave to completion; `None` when nothing was due
    pub async fn run_due_autosave(&mut self) -> Option<Result<SaveAck, PersistenceError>> {
        let job = self.poll_autosave()?;
        let report = job.run().await;
        Some(self.finish_save(report))
    }

    /// Sleep until the pending deadline, then save
    pub async fn autosave_idle(&mut self) -> Option<Result<SaveAck, PersistenceError>> {
        let deadline = self.autosave.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.run_due_autosave().await
    }

    /// Explicit save; runs even with autosave disabled
    pub async fn save_now(&mut self) -> Result<SaveAck, PersistenceError> {
        let job = self.begin_save();
        let report = job.run().await;
        self.finish_save(report)
    }

    /// Flush unsaved edits before the editor goes away
    pub async fn close(&mut self) -> Result<(), PersistenceError> {
        self.history.close_batch();
        self.drag.cancel();
        if self.has_unsaved_changes() {
            self.save_now().await?;
        }
        Ok(())
    }

    // ---- command dispatch ----

    pub async fn apply(&mut self, command: EditCommand) -> Result<CommandOutcome, EditorError> {
        let outcome = match command {
            EditCommand::AddBlock {
                block_type,
                position,
            } => CommandOutcome::Created(self.add_block(block_type, position)),
            EditCommand::RemoveBlock { id } => CommandOutcome::from_changed(self.remove_block(&id)),
            EditCommand::DuplicateBlock { id } => match self.duplicate_block(&id) {
                Some(new_id) => CommandOutcome::Created(new_id),
                None => CommandOutcome::Unchanged,
            },
            EditCommand::UpdateBlock { id, patch } => {
                CommandOutcome::from_changed(self.update_block(&id, &patch)?)
            }
            EditCommand::ReorderBlock { from, to } => {
                CommandOutcome::from_changed(self.reorder_block(from, to))
            }
            EditCommand::MoveBlockUp { id } => CommandOutcome::from_changed(self.move_block_up(&id)),
            EditCommand::MoveBlockDown { id } => {
                CommandOutcome::from_changed(self.move_block_down(&id))
            }
            EditCommand::ToggleVisibility { id } => {
                CommandOutcome::from_changed(self.toggle_visibility(&id))
            }
            EditCommand::Select { id } => {
                CommandOutcome::from_changed(self.set_selected(id.as_deref()))
            }
            EditCommand::SetLayout { layout } => {
                CommandOutcome::from_changed(self.set_layout(layout))
            }
            EditCommand::SetGlobal { key, value } => {
                CommandOutcome::from_changed(self.set_global(&key, value))
            }
            EditCommand::RemoveGlobal { key } => {
                CommandOutcome::from_changed(self.remove_global(&key))
            }
            EditCommand::StartDrag { index } => {
                self.start_drag(index);
                CommandOutcome::Unchanged
            }
            EditCommand::DragOver { index } => {
                self.drag_over(index);
                CommandOutcome::Unchanged
            }
            EditCommand::Drop { index } => CommandOutcome::from_changed(self.drop_drag(index)),
            EditCommand::CancelDrag => {
                self.cancel_drag();
                CommandOutcome::Unchanged
            }
            EditCommand::Undo => CommandOutcome::from_changed(self.undo()),
            EditCommand::Redo => CommandOutcome::from_changed(self.redo()),
            EditCommand::SaveSnapshot { label } => {
                self.save_snapshot(&label);
                CommandOutcome::Unchanged
            }
            EditCommand::SetTextView { text } => {
                let version = self.version();
                self.set_text_view(&text)?;
                CommandOutcome::from_changed(self.version() != version)
            }
            EditCommand::SaveNow => {
                self.save_now().await?;
                CommandOutcome::Saved
            }
        };

        Ok(outcome)
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("store", &self.store)
            .field("history", &self.history)
            .field("drag", &self.drag)
            .field("autosave", &self.autosave)
            .field("saved_version", &self.saved_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPersistence;
    use serde_json::{json, Map};

    fn editor_with(ids: &[&str]) -> (Editor, Arc<MemoryPersistence>) {
        let blocks = ids
            .iter()
            .map(|id| crate::factory::new_block(*id, BlockType::Text))
            .collect();
        let persistence = Arc::new(MemoryPersistence::new());
        let editor = Editor::with_ids(
            ContentDocument::from_blocks(blocks),
            persistence.clone(),
            &EditorConfig::default(),
            IdGenerator::from_seed("block", "t"),
        );
        (editor, persistence)
    }

    fn content_patch(text: &str) -> BlockPatch {
        let mut fields = Map::new();
        fields.insert("content".to_string(), json!(text));
        BlockPatch::data(fields)
    }

    #[test]
    fn test_snapshot_add_undo_redo_scenario() {
        let (mut editor, _) = editor_with(&["a"]);

        editor.save_snapshot("init");
        editor.add_block(BlockType::Image, None);
        assert_eq!(editor.document().len(), 2);

        assert!(editor.undo());
        assert_eq!(editor.document().len(), 1);

        assert!(editor.redo());
        assert_eq!(editor.document().len(), 2);
    }

    #[test]
    fn test_snapshot_after_each_action_keeps_undo_inverse() {
        let (mut editor, _) = editor_with(&["a"]);
        let s0 = editor.document().clone();

        editor.add_block(BlockType::Button, None);
        editor.save_snapshot("Add block");
        let s1 = editor.document().clone();

        editor.toggle_visibility("a");
        editor.save_snapshot("Toggle visibility");

        assert!(editor.undo());
        assert_eq!(editor.document(), &s1);
        assert!(editor.undo());
        assert_eq!(editor.document(), &s0);
        assert!(!editor.can_undo());
        assert!(!editor.undo());
    }

    #[test]
    fn test_undo_right_after_init_snapshot_does_nothing() {
        let (mut editor, _) = editor_with(&["a"]);

        editor.save_snapshot("init");

        assert!(!editor.can_undo());
        assert!(!editor.undo());
        assert_eq!(editor.version(), 0);
        assert!(!editor.has_unsaved_changes());
        assert_eq!(editor.autosave_deadline(), None);
    }

    #[test]
    fn test_init_snapshot_label_gives_way_to_action() {
        let (mut editor, _) = editor_with(&["a"]);

        editor.save_snapshot("init");
        editor.add_block(BlockType::Image, None);

        assert_eq!(editor.history().undo_levels(), 1);
        assert_eq!(editor.history().undo_label(), Some("Add block"));
    }

    #[test]
    fn test_reenabling_autosave_arms_unsaved_edits() {
        let (mut editor, _) = editor_with(&["a"]);

        editor.set_autosave_enabled(false);
        editor.add_block(BlockType::Spacer, None);
        assert_eq!(editor.autosave_deadline(), None);

        editor.set_autosave_enabled(true);
        assert!(editor.autosave_deadline().is_some());
    }

    #[test]
    fn test_reenabling_autosave_without_edits_stays_idle() {
        let (mut editor, _) = editor_with(&["a"]);

        editor.set_autosave_enabled(false);
        editor.set_autosave_enabled(true);
        assert_eq!(editor.autosave_deadline(), None);
    }

    #[test]
    fn test_noop_commands_leave_history_alone() {
        let (mut editor, _) = editor_with(&["a"]);

        assert!(!editor.remove_block("ghost"));
        assert!(!editor.reorder_block(0, 0));
        assert!(!editor.can_undo());
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_field_edits_batch_into_one_step() {
        let (mut editor, _) = editor_with(&["a"]);
        let original = editor.document().clone();

        editor.update_block("a", &content_patch("<p>H</p>")).unwrap();
        editor.update_block("a", &content_patch("<p>He</p>")).unwrap();
        editor.update_block("a", &content_patch("<p>Hey</p>")).unwrap();
        editor.save_snapshot("Edit text");

        assert_eq!(editor.history().undo_levels(), 1);
        assert_eq!(editor.history().undo_label(), Some("Edit text"));

        editor.undo();
        assert_eq!(editor.document(), &original);
    }

    #[test]
    fn test_discrete_action_closes_edit_batch() {
        let (mut editor, _) = editor_with(&["a"]);
        let original = editor.document().clone();

        editor.update_block("a", &content_patch("<p>x</p>")).unwrap();
        let edited = editor.document().clone();
        editor.add_block(BlockType::Divider, None);

        editor.undo();
        assert_eq!(editor.document(), &edited);
        editor.undo();
        assert_eq!(editor.document(), &original);
    }

    #[test]
    fn test_rejected_update_changes_nothing() {
        let (mut editor, _) = editor_with(&["a"]);
        let mut fields = Map::new();
        fields.insert("height".to_string(), json!(10));

        assert!(editor.update_block("a", &BlockPatch::data(fields)).is_err());
        assert!(!editor.can_undo());
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_drop_reorders_and_checkpoints() {
        let (mut editor, _) = editor_with(&["A", "B", "C"]);

        editor.start_drag(0);
        editor.drag_over(1);
        assert_eq!(editor.version(), 0);
        assert!(editor.drop_drag(2));

        assert_eq!(editor.document().block_ids(), vec!["B", "C", "A"]);
        assert_eq!(editor.history().undo_label(), Some("Reorder blocks"));
        assert!(!editor.drag().is_dragging());
    }

    #[test]
    fn test_drop_on_same_index_skips_snapshot() {
        let (mut editor, _) = editor_with(&["A", "B"]);

        editor.start_drag(1);
        assert!(!editor.drop_drag(1));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_cancelled_drag_leaves_document() {
        let (mut editor, _) = editor_with(&["A", "B"]);

        editor.start_drag(0);
        editor.drag_over(1);
        editor.cancel_drag();

        assert!(!editor.drop_drag(1));
        assert_eq!(editor.document().block_ids(), vec!["A", "B"]);
    }

    #[test]
    fn test_invalid_text_keeps_document() {
        let (mut editor, _) = editor_with(&["a", "b"]);
        let before = editor.document().clone();

        assert!(editor.set_text_view("{\"blocks\": [}").is_err());
        assert!(editor.json_error().is_some());
        assert_eq!(editor.document(), &before);
        assert_eq!(editor.json_text(), "{\"blocks\": [}");

        editor.show_structured_view();
        assert!(editor.json_error().is_none());
        assert_eq!(editor.json_text(), crate::view::to_text(&before));
    }

    #[test]
    fn test_accepted_text_is_undoable() {
        let (mut editor, _) = editor_with(&["a"]);
        let before = editor.document().clone();

        let mut edited = before.clone();
        edited.blocks.clear();
        editor
            .set_text_view(&crate::view::to_text(&edited))
            .unwrap();

        assert!(editor.document().is_empty());
        assert_eq!(editor.history().undo_label(), Some("Edit JSON"));

        editor.undo();
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_undo_prunes_selection_of_vanished_block() {
        let (mut editor, _) = editor_with(&["a"]);

        let id = editor.add_block(BlockType::Button, None);
        editor.set_selected(Some(id.as_str()));
        editor.undo();

        assert_eq!(editor.selected_block_id(), None);
    }

    #[tokio::test]
    async fn test_apply_dispatches_commands() {
        let (mut editor, persistence) = editor_with(&["a"]);

        let outcome = editor
            .apply(EditCommand::AddBlock {
                block_type: BlockType::Quote,
                position: Some(0),
            })
            .await
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::Created(_)));

        let outcome = editor
            .apply(EditCommand::RemoveBlock {
                id: "ghost".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Unchanged);

        let outcome = editor.apply(EditCommand::SaveNow).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Saved);
        assert_eq!(persistence.save_count(), 1);
    }

    #[tokio::test]
    async fn test_apply_surfaces_view_errors() {
        let (mut editor, _) = editor_with(&["a"]);

        let result = editor
            .apply(EditCommand::SetTextView {
                text: "nope".to_string(),
            })
            .await;
        assert!(matches!(result, Err(EditorError::View(_))));
    }
}
