//! # Block Store
//!
//! Owns the live [`ContentDocument`] for an editing session and applies
//! block operations to it.
//!
//! ## Operation Semantics
//!
//! - Insertion, deletion, duplication and reordering renumber positions.
//! - Operations on an absent id are no-ops, not errors. UI events can race a
//!   prior deletion.
//! - Indices passed to reorder are clamped into range.
//! - Every operation reports whether the document actually changed; only
//!   real changes bump [`BlockStore::version`].

use pagecraft_common::IdGenerator;
use serde_json::Value;

use crate::block::{BlockPatch, BlockType, ContentBlock};
use crate::document::{ContentDocument, LayoutSettings};
use crate::errors::BlockError;
use crate::factory::new_block;
use crate::session::EditorSessionState;

#[derive(Debug)]
pub struct BlockStore {
    document: ContentDocument,

    session: EditorSessionState,

    ids: IdGenerator,

    /// Increments on each document change
    version: u64,
}

impl BlockStore {
    pub fn new(mut document: ContentDocument, ids: IdGenerator) -> Self {
        document.renumber();
        Self {
            document,
            session: EditorSessionState::new(),
            ids,
            version: 0,
        }
    }

    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    pub fn session(&self) -> &EditorSessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSessionState {
        &mut self.session
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.session.selected_block_id.as_deref()
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    fn fresh_id(&mut self) -> String {
        let document = &self.document;
        self.ids.new_id_avoiding(|candidate| document.contains(candidate))
    }

    /// Insert a default block of `block_type` at `at` (end when `None`)
    ///
    /// Returns the new block's id.
    pub fn add_block(&mut self, block_type: BlockType, at: Option<usize>) -> String {
        let id = self.fresh_id();
        let index = at
            .unwrap_or(self.document.blocks.len())
            .min(self.document.blocks.len());

        self.document
            .blocks
            .insert(index, new_block(id.clone(), block_type));
        self.document.renumber();
        self.touch();

        tracing::debug!(block_id = %id, %block_type, index, "added block");
        id
    }

    pub fn remove_block(&mut self, id: &str) -> bool {
        let Some(index) = self.document.index_of(id) else {
            tracing::debug!(block_id = id, "remove ignored: block not found");
            return false;
        };

        self.document.blocks.remove(index);
        self.document.renumber();
        self.session.clear_if_selected(id);
        self.touch();

        tracing::debug!(block_id = id, index, "removed block");
        true
    }

    /// Deep-copy a block with a fresh id, right after the source
    pub fn duplicate_block(&mut self, id: &str) -> Option<String> {
        let Some(index) = self.document.index_of(id) else {
            tracing::debug!(block_id = id, "duplicate ignored: block not found");
            return None;
        };

        let new_id = self.fresh_id();
        let mut copy: ContentBlock = self.document.blocks[index].clone();
        copy.id = new_id.clone();

        self.document.blocks.insert(index + 1, copy);
        self.document.renumber();
        self.touch();

        tracing::debug!(source = id, block_id = %new_id, "duplicated block");
        Some(new_id)
    }

    /// Shallow-merge a patch into a block; the block type never changes
    pub fn update_block(&mut self, id: &str, patch: &BlockPatch) -> Result<bool, BlockError> {
        let Some(block) = self.document.find_block_mut(id) else {
            tracing::debug!(block_id = id, "update ignored: block not found");
            return Ok(false);
        };

        let changed = patch.apply_to(block)?;
        if changed {
            self.touch();
            tracing::debug!(block_id = id, "updated block");
        }
        Ok(changed)
    }

    /// Move the block at `from` to `to`; both indices are clamped
    pub fn reorder_block(&mut self, from: usize, to: usize) -> bool {
        let len = self.document.blocks.len();
        if len == 0 {
            return false;
        }

        let from = from.min(len - 1);
        let to = to.min(len - 1);
        if from == to {
            return false;
        }

        let block = self.document.blocks.remove(from);
        self.document.blocks.insert(to, block);
        self.document.renumber();
        self.touch();

        tracing::debug!(from, to, "reordered blocks");
        true
    }

    pub fn move_block_up(&mut self, id: &str) -> bool {
        match self.document.index_of(id) {
            Some(index) if index > 0 => self.reorder_block(index, index - 1),
            _ => false,
        }
    }

    pub fn move_block_down(&mut self, id: &str) -> bool {
        match self.document.index_of(id) {
            Some(index) => self.reorder_block(index, index + 1),
            None => false,
        }
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        let Some(block) = self.document.find_block_mut(id) else {
            return false;
        };

        block.is_visible = !block.is_visible;
        let visible = block.is_visible;
        self.touch();

        tracing::debug!(block_id = id, visible, "toggled visibility");
        true
    }

    /// Select a block; unknown ids clear the selection
    pub fn set_selected(&mut self, id: Option<&str>) -> bool {
        let id = id.filter(|id| self.document.contains(id)).map(str::to_string);
        self.session.select(id)
    }

    pub fn set_layout(&mut self, layout: LayoutSettings) -> bool {
        if self.document.layout == layout {
            return false;
        }
        self.document.layout = layout;
        self.touch();
        true
    }

    pub fn set_global(&mut self, key: &str, value: Value) -> bool {
        if self.document.global.get(key) == Some(&value) {
            return false;
        }
        self.document.global.insert(key.to_string(), value);
        self.touch();
        true
    }

    pub fn remove_global(&mut self, key: &str) -> bool {
        if self.document.global.remove(key).is_none() {
            return false;
        }
        self.touch();
        true
    }

    /// Swap in a whole document (undo/redo, accepted text view)
    ///
    /// Returns the document that was live before.
    pub fn replace_document(&mut self, mut document: ContentDocument) -> ContentDocument {
        document.renumber();
        let previous = std::mem::replace(&mut self.document, document);

        if let Some(selected) = self.session.selected_block_id.clone() {
            if !self.document.contains(&selected) {
                self.session.select(None);
            }
        }
        self.touch();
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn store_with(ids: &[&str]) -> BlockStore {
        let blocks = ids
            .iter()
            .map(|id| new_block(*id, BlockType::Text))
            .collect();
        BlockStore::new(
            ContentDocument::from_blocks(blocks),
            IdGenerator::from_seed("block", "test"),
        )
    }

    fn order(store: &BlockStore) -> Vec<&str> {
        store.document().block_ids()
    }

    fn assert_contiguous(store: &BlockStore) {
        for (i, block) in store.document().blocks.iter().enumerate() {
            assert_eq!(block.position, i);
        }
    }

    #[test]
    fn test_add_then_remove_scenario() {
        let mut store = store_with(&["b1"]);

        let new_id = store.add_block(BlockType::Button, None);
        assert_eq!(store.document().len(), 2);
        assert_eq!(store.document().find_block(&new_id).unwrap().position, 1);

        assert!(store.remove_block("b1"));
        assert_eq!(store.document().len(), 1);
        assert_eq!(store.document().blocks[0].id, new_id);
        assert_eq!(store.document().blocks[0].position, 0);
    }

    #[test]
    fn test_add_at_position_clamps() {
        let mut store = store_with(&["a", "b"]);

        let first = store.add_block(BlockType::Divider, Some(0));
        let last = store.add_block(BlockType::Spacer, Some(99));

        assert_eq!(order(&store), vec![first.as_str(), "a", "b", last.as_str()]);
        assert_contiguous(&store);
    }

    #[test]
    fn test_reorder_front_to_back() {
        let mut store = store_with(&["A", "B", "C"]);

        assert!(store.reorder_block(0, 2));
        assert_eq!(order(&store), vec!["B", "C", "A"]);
        assert_contiguous(&store);
    }

    #[test]
    fn test_reorder_clamps_out_of_range() {
        let mut store = store_with(&["A", "B", "C"]);

        assert!(store.reorder_block(10, 0));
        assert_eq!(order(&store), vec!["C", "A", "B"]);

        assert!(!store.reorder_block(1, 1));
        assert!(!store_with(&[]).reorder_block(0, 3));
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut store = store_with(&["a"]);
        let before = store.document().clone();
        let version = store.version();

        assert!(!store.remove_block("nope"));
        assert!(store.duplicate_block("nope").is_none());
        assert!(!store
            .update_block("nope", &BlockPatch::default())
            .unwrap());
        assert!(!store.toggle_visibility("nope"));

        assert_eq!(store.document(), &before);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_duplicate_inserts_after_source() {
        let mut store = store_with(&["a", "b"]);

        let copy = store.duplicate_block("a").unwrap();
        assert_eq!(order(&store), vec!["a", copy.as_str(), "b"]);
        assert_ne!(copy, "a");
        assert_eq!(
            store.document().blocks[0].data,
            store.document().blocks[1].data
        );
        assert_contiguous(&store);
    }

    #[test]
    fn test_generated_ids_skip_loaded_ids() {
        let mut store = store_with(&["block-test-1"]);
        let id = store.add_block(BlockType::Text, None);
        assert_eq!(id, "block-test-2");
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = store_with(&["a", "b"]);
        assert!(store.set_selected(Some("a")));

        store.remove_block("b");
        assert_eq!(store.selected_block_id(), Some("a"));

        store.remove_block("a");
        assert_eq!(store.selected_block_id(), None);
    }

    #[test]
    fn test_select_unknown_clears() {
        let mut store = store_with(&["a"]);
        store.set_selected(Some("a"));
        assert!(store.set_selected(Some("ghost")));
        assert_eq!(store.selected_block_id(), None);
    }

    #[test]
    fn test_update_merges_data() {
        let mut store = store_with(&["a"]);
        let mut fields = Map::new();
        fields.insert("content".to_string(), json!("<p>Hello</p>"));

        assert!(store.update_block("a", &BlockPatch::data(fields)).unwrap());
        assert_eq!(
            store.document().blocks[0].data.to_value()["content"],
            "<p>Hello</p>"
        );
    }

    #[test]
    fn test_move_helpers_stop_at_edges() {
        let mut store = store_with(&["a", "b"]);

        assert!(!store.move_block_up("a"));
        assert!(!store.move_block_down("b"));
        assert!(store.move_block_down("a"));
        assert_eq!(order(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_selection_does_not_bump_version() {
        let mut store = store_with(&["a"]);
        let version = store.version();
        store.set_selected(Some("a"));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_replace_document_prunes_selection() {
        let mut store = store_with(&["a"]);
        store.set_selected(Some("a"));

        let previous = store.replace_document(ContentDocument::new());
        assert_eq!(previous.len(), 1);
        assert_eq!(store.selected_block_id(), None);
    }

    #[test]
    fn test_global_settings() {
        let mut store = store_with(&[]);

        assert!(store.set_global("theme", json!("dark")));
        assert!(!store.set_global("theme", json!("dark")));
        assert!(store.remove_global("theme"));
        assert!(!store.remove_global("theme"));
    }
}
