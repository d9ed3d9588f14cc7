// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use super::RgbaColor;

/// Who produced an overlay item.
///
/// The annotator only ever replaces items carrying its own origins, so
/// re-annotating a frame never stacks duplicate summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayOrigin {
    /// Per-frame aggregate text.
    Summary,
    /// Per-object label text.
    ObjectLabel,
    /// Added by something other than the annotator.
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontParams {
    pub name: String,
    pub size: u32,
    pub color: RgbaColor,
}

impl Default for FontParams {
    fn default() -> Self {
        Self {
            name: "Serif".to_string(),
            size: 10,
            color: RgbaColor::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParams {
    pub text: String,
    pub font: FontParams,
    /// Background box behind the text; `None` draws the text only.
    pub background: Option<RgbaColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectParams {
    pub width: u32,
    pub height: u32,
    pub border_color: RgbaColor,
    pub border_width: u32,
    pub fill: Option<RgbaColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayContent {
    Text(TextParams),
    Rect(RectParams),
}

/// Renderable annotation placed at `(x_offset, y_offset)` in frame pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayItem {
    pub origin: OverlayOrigin,
    pub x_offset: u32,
    pub y_offset: u32,
    pub content: OverlayContent,
}

impl OverlayItem {
    pub fn text(origin: OverlayOrigin, x_offset: u32, y_offset: u32, params: TextParams) -> Self {
        Self {
            origin,
            x_offset,
            y_offset,
            content: OverlayContent::Text(params),
        }
    }

    pub fn rect(origin: OverlayOrigin, x_offset: u32, y_offset: u32, params: RectParams) -> Self {
        Self {
            origin,
            x_offset,
            y_offset,
            content: OverlayContent::Rect(params),
        }
    }

    /// Text payload, if this is a text item.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            OverlayContent::Text(params) => Some(&params.text),
            OverlayContent::Rect(_) => None,
        }
    }
}
