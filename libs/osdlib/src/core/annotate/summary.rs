// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt::Write;

use crate::core::config::LabelSet;
use crate::core::frames::{ClassCounts, ClassId};

/// `Frame Number=42 Number of Objects=3 Vehicle_count=1 Person_count=2`
///
/// `classes` selects which counts appear and in what order. Classes missing
/// from `labels` are skipped.
pub fn summary_text(
    frame_number: u64,
    num_objects: usize,
    counts: &ClassCounts,
    labels: &LabelSet,
    classes: &[ClassId],
) -> String {
    let mut text = format!(
        "Frame Number={} Number of Objects={}",
        frame_number, num_objects
    );
    for &id in classes {
        let Some(name) = labels.name(id) else {
            continue;
        };
        let count = counts.get(id).unwrap_or(0);
        // Infallible for String.
        let _ = write!(text, " {}_count={}", capitalize(name), count);
    }
    text
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
