//! # Content Blocks
//!
//! One block is one content unit on a page. The `type` discriminant and the
//! `data` payload travel together as [`BlockData`], so a block can never
//! carry a payload shaped for a different type.
//!
//! ## Wire shape
//!
//! ```text
//! { "id": "...", "type": "button", "data": { "label": "...", ... },
//!   "position": 0, "isVisible": true,
//!   "responsiveSettings": {...}, "animationSettings": {...},
//!   "accessibilitySettings": {...} }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::errors::BlockError;

/// Block discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Image,
    Button,
    Divider,
    Video,
    Link,
    Quote,
    Spacer,
}

impl BlockType {
    pub const ALL: [BlockType; 8] = [
        BlockType::Text,
        BlockType::Image,
        BlockType::Button,
        BlockType::Divider,
        BlockType::Video,
        BlockType::Link,
        BlockType::Quote,
        BlockType::Spacer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Button => "button",
            BlockType::Divider => "divider",
            BlockType::Video => "video",
            BlockType::Link => "link",
            BlockType::Quote => "quote",
            BlockType::Spacer => "spacer",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlockError::UnknownType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextData {
    /// Rich-text markup; opaque to the engine
    pub content: String,
    #[serde(default)]
    pub alignment: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageData {
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonSize {
    Sm,
    #[default]
    Md,
    Lg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ButtonData {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub style: ButtonStyle,
    #[serde(default)]
    pub size: ButtonSize,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DividerData {
    #[serde(default)]
    pub style: DividerStyle,
    pub thickness: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoData {
    pub url: String,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default = "default_true")]
    pub controls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkData {
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteData {
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpacerData {
    pub height: u32,
}

fn default_true() -> bool {
    true
}

/// Type-tagged block payload
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Text(TextData),
    Image(ImageData),
    Button(ButtonData),
    Divider(DividerData),
    Video(VideoData),
    Link(LinkData),
    Quote(QuoteData),
    Spacer(SpacerData),
}

impl BlockData {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockData::Text(_) => BlockType::Text,
            BlockData::Image(_) => BlockType::Image,
            BlockData::Button(_) => BlockType::Button,
            BlockData::Divider(_) => BlockType::Divider,
            BlockData::Video(_) => BlockType::Video,
            BlockData::Link(_) => BlockType::Link,
            BlockData::Quote(_) => BlockType::Quote,
            BlockData::Spacer(_) => BlockType::Spacer,
        }
    }

    /// Decode a raw `data` object for the given type
    ///
    /// Unknown keys are rejected, so a payload carrying another variant's
    /// fields never decodes.
    pub fn from_value(block_type: BlockType, value: Value) -> Result<Self, BlockError> {
        let mismatch = |source: serde_json::Error| BlockError::DataMismatch {
            block_type,
            message: source.to_string(),
        };

        let data = match block_type {
            BlockType::Text => BlockData::Text(serde_json::from_value(value).map_err(mismatch)?),
            BlockType::Image => BlockData::Image(serde_json::from_value(value).map_err(mismatch)?),
            BlockType::Button => {
                BlockData::Button(serde_json::from_value(value).map_err(mismatch)?)
            }
            BlockType::Divider => {
                BlockData::Divider(serde_json::from_value(value).map_err(mismatch)?)
            }
            BlockType::Video => BlockData::Video(serde_json::from_value(value).map_err(mismatch)?),
            BlockType::Link => BlockData::Link(serde_json::from_value(value).map_err(mismatch)?),
            BlockType::Quote => BlockData::Quote(serde_json::from_value(value).map_err(mismatch)?),
            BlockType::Spacer => {
                BlockData::Spacer(serde_json::from_value(value).map_err(mismatch)?)
            }
        };

        Ok(data)
    }

    /// Encode the payload as a JSON value (always an object)
    pub fn to_value(&self) -> Value {
        let encoded = match self {
            BlockData::Text(d) => serde_json::to_value(d),
            BlockData::Image(d) => serde_json::to_value(d),
            BlockData::Button(d) => serde_json::to_value(d),
            BlockData::Divider(d) => serde_json::to_value(d),
            BlockData::Video(d) => serde_json::to_value(d),
            BlockData::Link(d) => serde_json::to_value(d),
            BlockData::Quote(d) => serde_json::to_value(d),
            BlockData::Spacer(d) => serde_json::to_value(d),
        };
        // Plain structs with string keys always encode
        encoded.unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Shallow-merge `partial` into this payload, keeping the block type
    ///
    /// On failure the payload is left untouched.
    pub fn merge(&mut self, partial: &Map<String, Value>) -> Result<bool, BlockError> {
        if partial.is_empty() {
            return Ok(false);
        }

        let mut merged = match self.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in partial {
            merged.insert(key.clone(), value.clone());
        }

        let updated = BlockData::from_value(self.block_type(), Value::Object(merged))?;
        if updated == *self {
            return Ok(false);
        }
        *self = updated;
        Ok(true)
    }
}

/// Per-breakpoint overrides; keys are opaque to the engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveSettings {
    #[serde(default)]
    pub desktop: Map<String, Value>,
    #[serde(default)]
    pub tablet: Map<String, Value>,
    #[serde(default)]
    pub mobile: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    #[default]
    Fade,
    Slide,
    Zoom,
    Bounce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub kind: AnimationKind,
    /// Milliseconds
    #[serde(default)]
    pub delay: u32,
    /// Milliseconds
    #[serde(default = "default_animation_duration")]
    pub duration: u32,
}

fn default_animation_duration() -> u32 {
    500
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: AnimationKind::Fade,
            delay: 0,
            duration: default_animation_duration(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub aria_label: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub screen_reader_text: String,
}

/// One content unit in a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawBlock", try_from = "RawBlock")]
pub struct ContentBlock {
    pub id: String,
    pub data: BlockData,
    pub position: usize,
    pub is_visible: bool,
    pub responsive_settings: ResponsiveSettings,
    pub animation_settings: AnimationSettings,
    pub accessibility_settings: AccessibilitySettings,
}

impl ContentBlock {
    pub fn block_type(&self) -> BlockType {
        self.data.block_type()
    }
}

/// Wire form of a block: discriminant and payload as separate keys
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub data: Value,
    #[serde(default)]
    pub position: usize,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub responsive_settings: ResponsiveSettings,
    #[serde(default)]
    pub animation_settings: AnimationSettings,
    #[serde(default)]
    pub accessibility_settings: AccessibilitySettings,
}

impl From<ContentBlock> for RawBlock {
    fn from(block: ContentBlock) -> Self {
        RawBlock {
            block_type: block.block_type(),
            data: block.data.to_value(),
            id: block.id,
            position: block.position,
            is_visible: block.is_visible,
            responsive_settings: block.responsive_settings,
            animation_settings: block.animation_settings,
            accessibility_settings: block.accessibility_settings,
        }
    }
}

impl TryFrom<RawBlock> for ContentBlock {
    type Error = BlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let data = BlockData::from_value(raw.block_type, raw.data).map_err(|e| match e {
            BlockError::DataMismatch { block_type, message } => BlockError::DataMismatch {
                block_type,
                message: format!("block {}: {}", raw.id, message),
            },
            other => other,
        })?;

        Ok(ContentBlock {
            id: raw.id,
            data,
            position: raw.position,
            is_visible: raw.is_visible,
            responsive_settings: raw.responsive_settings,
            animation_settings: raw.animation_settings,
            accessibility_settings: raw.accessibility_settings,
        })
    }
}

/// Partial block update emitted by renderers and the settings panel
///
/// Every field is optional; `data` is shallow-merged into the payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive_settings: Option<ResponsiveSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_settings: Option<AnimationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_settings: Option<AccessibilitySettings>,
}

impl BlockPatch {
    /// Patch that only merges payload fields
    pub fn data(fields: Map<String, Value>) -> Self {
        Self {
            data: Some(fields),
            ..Self::default()
        }
    }

    /// Apply to a block; all-or-nothing
    pub fn apply_to(&self, block: &mut ContentBlock) -> Result<bool, BlockError> {
        let mut data = block.data.clone();
        let mut changed = match &self.data {
            Some(fields) => data.merge(fields)?,
            None => false,
        };
        block.data = data;

        if let Some(visible) = self.is_visible {
            changed |= block.is_visible != visible;
            block.is_visible = visible;
        }
        if let Some(responsive) = &self.responsive_settings {
            changed |= block.responsive_settings != *responsive;
            block.responsive_settings = responsive.clone();
        }
        if let Some(animation) = &self.animation_settings {
            changed |= block.animation_settings != *animation;
            block.animation_settings = animation.clone();
        }
        if let Some(accessibility) = &self.accessibility_settings {
            changed |= block.accessibility_settings != *accessibility;
            block.accessibility_settings = accessibility.clone();
        }

        Ok(changed)
    }
}
