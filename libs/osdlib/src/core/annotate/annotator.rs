// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use super::summary::summary_text;
use crate::core::config::OsdConfig;
use crate::core::frames::{
    BatchMeta, ClassCounts, ClassId, FrameMeta, OverlayItem, OverlayOrigin, TextParams,
};
use crate::core::probe::{ProbeHandler, ProbeReturn};
use crate::core::{Result, StreamError};

/// Derives per-class counts and overlay content for each frame of a batch.
///
/// Holds no state besides the shared, read-only configuration, so one
/// instance can serve frames delivered from several worker threads.
/// Counting is local to each call.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: Arc<OsdConfig>,
}

impl Annotator {
    pub fn new(config: Arc<OsdConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OsdConfig {
        &self.config
    }

    /// Count detections per configured class.
    ///
    /// Returns the counts and the distinct unconfigured class ids seen, in
    /// order of first appearance.
    pub fn count_classes(&self, frame: &FrameMeta) -> (ClassCounts, Vec<ClassId>) {
        let mut counts = ClassCounts::zeroed(self.config.labels.ids());
        let mut unknown = Vec::new();
        for object in frame.objects() {
            if !counts.record(object.class_id) && !unknown.contains(&object.class_id) {
                unknown.push(object.class_id);
            }
        }
        (counts, unknown)
    }

    /// Annotate one frame in place.
    ///
    /// The frame is always fully annotated. If any detection carried an
    /// unconfigured class the call then fails with
    /// [`StreamError::UnknownClass`]; those detections are counted under
    /// `other`.
    pub fn annotate_frame(&self, frame: &mut FrameMeta) -> Result<()> {
        let (counts, unknown) = self.count_classes(frame);

        for object in frame.objects_mut() {
            object.style = Some(self.config.objects.style_for(object.class_id));
        }
        for object in frame.objects() {
            let ((left, top), (right, bottom)) = object.bounding_box.corners();
            tracing::debug!(
                "Frame={}, Object={}, Class={}, Bounding Box=({},{}),({},{})",
                frame.frame_number,
                object.object_id,
                object.class_id,
                left,
                top,
                right,
                bottom
            );
        }
        for object in frame.out_of_bounds_objects() {
            tracing::warn!(
                "Frame {}: object {} box {:?} exceeds {}x{} frame",
                frame.frame_number,
                object.object_id,
                object.bounding_box,
                frame.width,
                frame.height
            );
        }

        let summary = &self.config.summary;
        let text = summary_text(
            frame.frame_number,
            frame.num_objects(),
            &counts,
            &self.config.labels,
            &summary.classes,
        );
        tracing::debug!(target: "osdlib::summary", "{}", text);

        frame.clear_overlays_from(OverlayOrigin::Summary);
        frame.push_overlay(OverlayItem::text(
            OverlayOrigin::Summary,
            summary.x_offset,
            summary.y_offset,
            TextParams {
                text,
                font: summary.font.clone(),
                background: summary.background_color,
            },
        ));

        frame.clear_overlays_from(OverlayOrigin::ObjectLabel);
        if self.config.objects.label_objects {
            let labels: Vec<OverlayItem> = frame
                .objects()
                .iter()
                .map(|object| {
                    let name = self.config.labels.name(object.class_id).unwrap_or("other");
                    OverlayItem::text(
                        OverlayOrigin::ObjectLabel,
                        object.bounding_box.left,
                        object.bounding_box.top,
                        TextParams {
                            text: format!("{} {}", name, object.object_id),
                            font: summary.font.clone(),
                            background: summary.background_color,
                        },
                    )
                })
                .collect();
            for label in labels {
                frame.push_overlay(label);
            }
        }

        frame.class_counts = Some(counts);

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(StreamError::UnknownClass {
                frame_number: frame.frame_number,
                class_ids: unknown,
            })
        }
    }

    /// Annotate every frame of a batch.
    ///
    /// Frames after a failing one are still annotated; the first error is
    /// returned once the whole batch is done and reporting it is left to the
    /// caller. Later errors in the same batch are logged here.
    pub fn annotate_batch(&self, batch: &mut BatchMeta) -> Result<()> {
        let mut first_error = None;
        for frame in &mut batch.frames {
            if let Err(e) = self.annotate_frame(frame) {
                match first_error {
                    None => first_error = Some(e),
                    Some(_) => tracing::warn!("{}", e),
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ProbeHandler for Annotator {
    fn name(&self) -> &str {
        "annotator"
    }

    fn on_batch(&self, batch: &mut BatchMeta) -> Result<ProbeReturn> {
        self.annotate_batch(batch)?;
        Ok(ProbeReturn::Continue)
    }
}
