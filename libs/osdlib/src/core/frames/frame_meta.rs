// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use super::{BoxStyle, ClassCounts, DetectedObject, OverlayItem, OverlayOrigin};

/// Metadata for one decoded frame: its detections and the overlays derived
/// from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMeta {
    /// Sequence number within the stream session; strictly increasing.
    pub frame_number: u64,
    #[serde(default)]
    pub source_id: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Presentation timestamp in nanoseconds, when known.
    #[serde(default)]
    pub pts: Option<u64>,
    #[serde(default)]
    objects: Vec<DetectedObject>,
    #[serde(default)]
    overlays: Vec<OverlayItem>,
    /// Set by the annotator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_counts: Option<ClassCounts>,
}

impl FrameMeta {
    pub fn new(frame_number: u64, objects: Vec<DetectedObject>) -> Self {
        Self {
            frame_number,
            source_id: 0,
            width: 0,
            height: 0,
            pts: None,
            objects,
            overlays: Vec::new(),
            class_counts: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn objects(&self) -> &[DetectedObject] {
        &self.objects
    }

    /// Crate-internal mutable access for the annotator.
    pub(crate) fn objects_mut(&mut self) -> &mut [DetectedObject] {
        &mut self.objects
    }

    /// Set the display style of the detection at `index`. Identity, class and
    /// box stay as inference produced them. Returns `false` if out of range.
    pub fn set_style(&mut self, index: usize, style: BoxStyle) -> bool {
        match self.objects.get_mut(index) {
            Some(object) => {
                object.style = Some(style);
                true
            }
            None => false,
        }
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn overlays(&self) -> &[OverlayItem] {
        &self.overlays
    }

    pub fn push_overlay(&mut self, item: OverlayItem) {
        self.overlays.push(item);
    }

    /// Drop every overlay with the given origin, keeping the rest in order.
    pub fn clear_overlays_from(&mut self, origin: OverlayOrigin) {
        self.overlays.retain(|item| item.origin != origin);
    }

    /// Overlays produced by `origin`, in insertion order.
    pub fn overlays_from(&self, origin: OverlayOrigin) -> impl Iterator<Item = &OverlayItem> {
        self.overlays.iter().filter(move |item| item.origin == origin)
    }

    /// Detections whose box does not fit the frame. Frames with unknown
    /// dimensions (zero) report none.
    pub fn out_of_bounds_objects(&self) -> impl Iterator<Item = &DetectedObject> {
        let (w, h) = (self.width, self.height);
        self.objects
            .iter()
            .filter(move |o| w > 0 && h > 0 && !o.bounding_box.fits_within(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frames::{BoundingBox, FontParams, TextParams};

    fn label(origin: OverlayOrigin, text: &str) -> OverlayItem {
        OverlayItem::text(
            origin,
            0,
            0,
            TextParams {
                text: text.to_string(),
                font: FontParams::default(),
                background: None,
            },
        )
    }

    #[test]
    fn test_clear_overlays_keeps_other_origins() {
        let mut frame = FrameMeta::new(1, Vec::new());
        frame.push_overlay(label(OverlayOrigin::External, "logo"));
        frame.push_overlay(label(OverlayOrigin::Summary, "summary"));
        frame.push_overlay(label(OverlayOrigin::External, "clock"));

        frame.clear_overlays_from(OverlayOrigin::Summary);

        let texts: Vec<_> = frame.overlays().iter().filter_map(|o| o.as_text()).collect();
        assert_eq!(texts, vec!["logo", "clock"]);
    }

    #[test]
    fn test_out_of_bounds_objects() {
        let frame = FrameMeta::new(
            1,
            vec![
                DetectedObject::new(1, 0, BoundingBox::new(0, 0, 100, 100)),
                DetectedObject::new(2, 0, BoundingBox::new(600, 0, 100, 100)),
            ],
        )
        .with_dimensions(640, 480);

        let ids: Vec<_> = frame.out_of_bounds_objects().map(|o| o.object_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_set_style_touches_only_display_state() {
        let bbox = BoundingBox::new(4, 8, 16, 32);
        let mut frame = FrameMeta::new(1, vec![DetectedObject::new(7, 2, bbox)]);
        let style = BoxStyle {
            border_color: crate::core::frames::RgbaColor::new(1.0, 0.0, 0.0, 1.0),
            border_width: 2,
        };

        assert!(frame.set_style(0, style));
        assert!(!frame.set_style(1, style));

        let object = &frame.objects()[0];
        assert_eq!(object.style, Some(style));
        assert_eq!(object.object_id, 7);
        assert_eq!(object.class_id.0, 2);
        assert_eq!(object.bounding_box, bbox);
    }
}
