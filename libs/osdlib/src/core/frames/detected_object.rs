// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use super::{BoundingBox, RgbaColor};

/// Raw class identifier as produced by the inference stage.
///
/// Whether an id is known is decided by the configured
/// [`LabelSet`](crate::core::config::LabelSet), not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u32);

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ClassId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Border style drawn around a detection by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub border_color: RgbaColor,
    pub border_width: u32,
}

/// One inference result attached to a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Track identity; stable across frames when upstream tracking is enabled.
    pub object_id: u64,
    pub class_id: ClassId,
    pub bounding_box: BoundingBox,
    #[serde(default = "full_confidence")]
    pub confidence: f32,
    /// Display state; the only field the annotator writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BoxStyle>,
}

fn full_confidence() -> f32 {
    1.0
}

impl DetectedObject {
    pub fn new(object_id: u64, class_id: impl Into<ClassId>, bounding_box: BoundingBox) -> Self {
        Self {
            object_id,
            class_id: class_id.into(),
            bounding_box,
            confidence: 1.0,
            style: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}
