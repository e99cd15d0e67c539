//! # Content Document
//!
//! Root aggregate for one page: the ordered blocks plus document-level
//! layout and global settings.
//!
//! Invariants (checked by [`ContentDocument::check_invariants`]):
//! - block ids are unique
//! - `blocks[i].position == i`
//! - each block's payload matches its type (enforced by [`BlockData`])

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::block::{BlockData, ContentBlock};
use crate::errors::ViewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxWidth {
    Sm,
    Md,
    #[default]
    Lg,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAlignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalSpacing {
    Sm,
    #[default]
    Md,
    Lg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    #[serde(default)]
    pub max_width: MaxWidth,
    #[serde(default)]
    pub alignment: LayoutAlignment,
    #[serde(default)]
    pub vertical_spacing: VerticalSpacing,
    #[serde(default = "default_responsive_gaps")]
    pub responsive_gaps: bool,
}

fn default_responsive_gaps() -> bool {
    true
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            max_width: MaxWidth::Lg,
            alignment: LayoutAlignment::Center,
            vertical_spacing: VerticalSpacing::Md,
            responsive_gaps: true,
        }
    }
}

/// Editable page content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub global: Map<String, Value>,
}

impl ContentDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        let mut doc = Self {
            blocks,
            ..Self::default()
        };
        doc.renumber();
        doc
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn find_block(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn find_block_mut(&mut self, id: &str) -> Option<&mut ContentBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_block(id).is_some()
    }

    pub fn block_ids(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.id.as_str()).collect()
    }

    /// Reset positions to match array order
    pub fn renumber(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.position = index;
        }
    }

    /// Check the structural invariants
    pub fn check_invariants(&self) -> Result<(), ViewError> {
        let mut seen = HashSet::new();

        for (index, block) in self.blocks.iter().enumerate() {
            if block.id.is_empty() {
                return Err(ViewError::Invariant(format!(
                    "block at index {} has an empty id",
                    index
                )));
            }
            if !seen.insert(block.id.as_str()) {
                return Err(ViewError::Invariant(format!(
                    "duplicate block id: {}",
                    block.id
                )));
            }
            if block.position != index {
                return Err(ViewError::Invariant(format!(
                    "block {} has position {} but sits at index {}",
                    block.id, block.position, index
                )));
            }
        }

        Ok(())
    }

    /// Payload of a block, by id
    pub fn block_data(&self, id: &str) -> Option<&BlockData> {
        self.find_block(id).map(|b| &b.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::new_block;
    use crate::block::BlockType;

    #[test]
    fn test_from_blocks_renumbers() {
        let mut a = new_block("a", BlockType::Text);
        a.position = 7;
        let mut b = new_block("b", BlockType::Spacer);
        b.position = 7;

        let doc = ContentDocument::from_blocks(vec![a, b]);
        assert_eq!(doc.blocks[0].position, 0);
        assert_eq!(doc.blocks[1].position, 1);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn test_duplicate_ids_violate_invariants() {
        let doc = ContentDocument::from_blocks(vec![
            new_block("a", BlockType::Text),
            new_block("a", BlockType::Quote),
        ]);

        assert!(matches!(doc.check_invariants(), Err(ViewError::Invariant(_))));
    }

    #[test]
    fn test_position_gap_violates_invariants() {
        let mut doc = ContentDocument::from_blocks(vec![
            new_block("a", BlockType::Text),
            new_block("b", BlockType::Text),
        ]);
        doc.blocks[1].position = 2;

        assert!(doc.check_invariants().is_err());
    }

    #[test]
    fn test_default_layout_shape() {
        let value = serde_json::to_value(LayoutSettings::default()).unwrap();
        assert_eq!(value["maxWidth"], "lg");
        assert_eq!(value["alignment"], "center");
        assert_eq!(value["verticalSpacing"], "md");
        assert_eq!(value["responsiveGaps"], true);
    }
}
