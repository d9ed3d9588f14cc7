// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

use super::FrameMeta;

/// Frames delivered together in one processing tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchMeta {
    pub frames: Vec<FrameMeta>,
}

impl BatchMeta {
    pub fn new(frames: Vec<FrameMeta>) -> Self {
        Self { frames }
    }

    pub fn single(frame: FrameMeta) -> Self {
        Self {
            frames: vec![frame],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Buffer handle crossing a probe point.
///
/// A buffer without attached batch metadata is structurally invalid for
/// annotation; the probe dispatcher lets it through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaBuffer {
    pub pts: Option<u64>,
    pub batch: Option<BatchMeta>,
}

impl MediaBuffer {
    pub fn with_batch(batch: BatchMeta) -> Self {
        Self {
            pts: None,
            batch: Some(batch),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
