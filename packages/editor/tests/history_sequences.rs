//! Tests for longer undo/redo sequences
//!
//! This tests:
//! - Inverse law across mixed discrete actions
//! - Redo invalidation
//! - Edit batching around discrete actions
//! - History depth limits

use pagecraft_editor::{
    new_block, BlockPatch, BlockType, ContentDocument, Editor, EditorConfig, IdGenerator,
    MemoryPersistence, EDIT_BATCH_LABEL,
};
use serde_json::{json, Map};
use std::sync::Arc;

fn editor(depth: usize) -> Editor {
    let blocks = vec![
        new_block("A", BlockType::Text),
        new_block("B", BlockType::Button),
        new_block("C", BlockType::Spacer),
    ];
    let config = EditorConfig {
        history_depth: depth,
        ..EditorConfig::default()
    };
    Editor::with_ids(
        ContentDocument::from_blocks(blocks),
        Arc::new(MemoryPersistence::new()),
        &config,
        IdGenerator::from_seed("block", "seq"),
    )
}

fn label_patch(label: &str) -> BlockPatch {
    let mut fields = Map::new();
    fields.insert("label".to_string(), json!(label));
    BlockPatch::data(fields)
}

#[test]
fn test_mixed_actions_unwind_in_order() {
    let mut editor = editor(50);
    let mut states = vec![editor.document().clone()];

    editor.add_block(BlockType::Video, Some(1));
    states.push(editor.document().clone());

    editor.reorder_block(0, 3);
    states.push(editor.document().clone());

    editor.toggle_visibility("B");
    states.push(editor.document().clone());

    editor.duplicate_block("C");
    states.push(editor.document().clone());

    editor.remove_block("A");
    states.push(editor.document().clone());

    // Walk all the way back
    for expected in states.iter().rev().skip(1) {
        assert!(editor.undo());
        assert_eq!(editor.document(), expected);
    }
    assert!(!editor.undo());

    // And forward again
    for expected in states.iter().skip(1) {
        assert!(editor.redo());
        assert_eq!(editor.document(), expected);
    }
    assert!(!editor.redo());
}

#[test]
fn test_new_action_after_undo_clears_redo() {
    let mut editor = editor(50);

    editor.add_block(BlockType::Link, None);
    editor.add_block(BlockType::Quote, None);
    editor.undo();
    assert!(editor.can_redo());

    editor.move_block_down("A");
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

#[test]
fn test_field_edit_after_undo_clears_redo() {
    let mut editor = editor(50);

    editor.add_block(BlockType::Link, None);
    editor.undo();
    assert!(editor.can_redo());

    editor.update_block("B", &label_patch("Go")).unwrap();
    assert!(!editor.can_redo());
}

#[test]
fn test_undo_closes_open_batch() {
    let mut editor = editor(50);
    let original = editor.document().clone();

    editor.update_block("B", &label_patch("S")).unwrap();
    editor.update_block("B", &label_patch("Sign")).unwrap();
    editor.update_block("B", &label_patch("Sign up")).unwrap();
    let edited = editor.document().clone();

    assert!(editor.can_undo());
    assert!(editor.undo());
    assert_eq!(editor.document(), &original);
    assert_eq!(editor.history().redo_label(), Some(EDIT_BATCH_LABEL));

    assert!(editor.redo());
    assert_eq!(editor.document(), &edited);
}

#[test]
fn test_repeated_snapshot_is_single_entry() {
    let mut editor = editor(50);

    editor.save_snapshot("init");
    editor.save_snapshot("init again");
    editor.add_block(BlockType::Image, None);

    // The pre-add checkpoint equals "init" and is folded into it
    assert_eq!(editor.history().undo_levels(), 1);
}

#[test]
fn test_depth_limit_drops_oldest() {
    let mut editor = editor(3);

    for _ in 0..5 {
        editor.add_block(BlockType::Divider, None);
    }
    assert_eq!(editor.history().undo_levels(), 3);

    let mut undone = 0;
    while editor.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(editor.document().len(), 5);
}

#[test]
fn test_zero_depth_is_unlimited() {
    let mut editor = editor(0);

    for _ in 0..80 {
        editor.add_block(BlockType::Spacer, None);
    }
    assert_eq!(editor.history().undo_levels(), 80);
}

#[test]
fn test_labels_follow_actions() {
    let mut editor = editor(50);

    editor.add_block(BlockType::Text, None);
    assert_eq!(editor.history().undo_label(), Some("Add block"));

    editor.toggle_visibility("A");
    assert_eq!(editor.history().undo_label(), Some("Toggle visibility"));

    editor.undo();
    assert_eq!(editor.history().redo_label(), Some("Toggle visibility"));
    assert_eq!(editor.history().undo_label(), Some("Add block"));
}

#[test]
fn test_clear_history() {
    let mut editor = editor(50);

    editor.add_block(BlockType::Text, None);
    editor.add_block(BlockType::Text, None);
    editor.undo();
    editor.clear_history();

    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
    assert_eq!(editor.document().len(), 4);
}
