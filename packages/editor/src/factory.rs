//! Default payloads for freshly inserted blocks.

use crate::block::{
    AccessibilitySettings, AnimationSettings, BlockData, BlockType, ButtonData, ButtonSize,
    ButtonStyle, ContentBlock, DividerData, DividerStyle, ImageData, LinkData, QuoteData,
    ResponsiveSettings, SpacerData, TextAlign, TextData, VideoData,
};

/// Minimal valid payload for each block type
pub fn create_default(block_type: BlockType) -> BlockData {
    match block_type {
        BlockType::Text => BlockData::Text(TextData {
            content: "<p>Enter your text here...</p>".to_string(),
            alignment: TextAlign::Left,
        }),
        BlockType::Image => BlockData::Image(ImageData {
            src: String::new(),
            alt: "Image description".to_string(),
            caption: None,
            link: None,
            width: None,
        }),
        BlockType::Button => BlockData::Button(ButtonData {
            label: "Click me".to_string(),
            url: "#".to_string(),
            style: ButtonStyle::Primary,
            size: ButtonSize::Md,
            open_in_new_tab: false,
        }),
        BlockType::Divider => BlockData::Divider(DividerData {
            style: DividerStyle::Solid,
            thickness: 1,
            color: "#e5e7eb".to_string(),
        }),
        BlockType::Video => BlockData::Video(VideoData {
            url: String::new(),
            autoplay: false,
            controls: true,
            poster: None,
        }),
        BlockType::Link => BlockData::Link(LinkData {
            text: "Learn more".to_string(),
            url: "#".to_string(),
            open_in_new_tab: false,
        }),
        BlockType::Quote => BlockData::Quote(QuoteData {
            text: "Enter a quote...".to_string(),
            author: String::new(),
            citation: None,
        }),
        BlockType::Spacer => BlockData::Spacer(SpacerData { height: 40 }),
    }
}

/// A block with default payload and settings; position is fixed up on insert
pub fn new_block(id: impl Into<String>, block_type: BlockType) -> ContentBlock {
    ContentBlock {
        id: id.into(),
        data: create_default(block_type),
        position: 0,
        is_visible: true,
        responsive_settings: ResponsiveSettings::default(),
        animation_settings: AnimationSettings::default(),
        accessibility_settings: AccessibilitySettings::default(),
    }
}
