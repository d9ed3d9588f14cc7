// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

/// Axis-aligned box in frame-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// `((left, top), (right, bottom))`
    pub fn corners(&self) -> ((u32, u32), (u32, u32)) {
        ((self.left, self.top), (self.right(), self.bottom()))
    }

    /// Whether the box lies entirely inside a `frame_width` x `frame_height` frame.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.right() <= frame_width && self.bottom() <= frame_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let bbox = BoundingBox::new(10, 20, 30, 40);
        assert_eq!(bbox.corners(), ((10, 20), (40, 60)));
    }

    #[test]
    fn test_fits_within_frame() {
        assert!(BoundingBox::new(0, 0, 1920, 1080).fits_within(1920, 1080));
        assert!(!BoundingBox::new(1900, 0, 21, 10).fits_within(1920, 1080));
        assert!(!BoundingBox::new(0, 1079, 1, 2).fits_within(1920, 1080));
    }
}
