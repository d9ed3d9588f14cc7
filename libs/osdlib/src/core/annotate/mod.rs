// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Turns a batch of detections into per-class aggregates and overlay content.

mod annotator;
mod summary;

pub use crate::core::frames::ClassCounts;
pub use annotator::Annotator;
pub use summary::summary_text;
