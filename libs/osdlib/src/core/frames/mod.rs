// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Per-frame and per-object metadata carried alongside each video frame.
//!
//! A [`BatchMeta`] owns its frames, a [`FrameMeta`] owns its detections and
//! overlays. Nothing here outlives one traversal of the pipeline.

mod batch_meta;
mod bounding_box;
mod class_counts;
mod color;
mod detected_object;
mod frame_meta;
mod overlay;

pub use batch_meta::{BatchMeta, MediaBuffer};
pub use bounding_box::BoundingBox;
pub use class_counts::ClassCounts;
pub use color::RgbaColor;
pub use detected_object::{BoxStyle, ClassId, DetectedObject};
pub use frame_meta::FrameMeta;
pub use overlay::{FontParams, OverlayContent, OverlayItem, OverlayOrigin, RectParams, TextParams};
